mod app;
mod document;
mod renderer;
mod smooth_scroll;

use std::fs::OpenOptions;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::Portfolio;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;

/// Browse a developer portfolio in the terminal.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Portfolio content as JSON; the built-in catalog when omitted.
    #[arg(long, value_name = "FILE")]
    content: Option<PathBuf>,

    /// Controller tunables as JSON.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Append logs to this file. Logging is off otherwise, since the
    /// terminal is taken by the UI. Filter with `RUST_LOG`.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Frame interval in milliseconds.
    #[arg(
        long = "tick-ms",
        value_name = "MS",
        default_value_t = 16,
        value_parser = clap::value_parser!(u64).range(1..=1000)
    )]
    tick_ms: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    let portfolio = load(&cli)?;
    run(portfolio, Duration::from_millis(cli.tick_ms))
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("folio_core=debug,folio_tui=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn read(path: Option<&Path>) -> Result<Option<Vec<u8>>> {
    path.map(|path| std::fs::read(path).with_context(|| format!("reading {}", path.display())))
        .transpose()
}

fn load(cli: &Cli) -> Result<Portfolio> {
    let content = read(cli.content.as_deref())?;
    let config = read(cli.config.as_deref())?;
    let portfolio = Portfolio::from_json(content.as_deref(), config.as_deref())
        .context("loading portfolio")?;
    info!(
        owner = %portfolio.catalog().owner.name,
        projects = portfolio.catalog().projects.len(),
        skills = portfolio.catalog().skills.len(),
        "portfolio loaded"
    );
    Ok(portfolio)
}

/// Raw mode, alternate screen and mouse capture for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
    }
}

fn run(portfolio: Portfolio, frame_time: Duration) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let started = Instant::now();
    let now = || u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let size = terminal.size()?;
    let mut app = App::new(portfolio, Rect::new(0, 0, size.width, size.height));
    app.mount(now());

    while !app.should_quit() {
        let now_ms = now();
        app.frame(now_ms);
        terminal.draw(|frame| renderer::draw(frame, &app, now_ms))?;

        if event::poll(frame_time)? {
            app.on_event(&event::read()?, now());
            while event::poll(Duration::ZERO)? {
                app.on_event(&event::read()?, now());
            }
        }
    }

    app.teardown();
    info!("bye");
    Ok(())
}
