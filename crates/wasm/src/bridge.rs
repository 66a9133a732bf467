//! Handle-based JSON bridge, independent of any JS type so it can be
//! exercised natively. `lib.rs` wraps each function for `wasm-bindgen`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use folio_core::{Portfolio, PortfolioError, ProjectId};
use folio_protocol::{
    DismissSource, HostCommand, HostEvent, IntersectionEntry, ScrollMetrics, Section,
    UnknownDismissSource, UnknownSection,
};
use thiserror::Error;

static PORTFOLIOS: Mutex<Vec<Option<Portfolio>>> = Mutex::new(Vec::new());

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Section(#[from] UnknownSection),
    #[error(transparent)]
    Dismiss(#[from] UnknownDismissSource),
    #[error("invalid portfolio handle {0}")]
    Handle(usize),
    #[error("portfolio registry poisoned")]
    Poisoned,
}

fn registry() -> Result<MutexGuard<'static, Vec<Option<Portfolio>>>, BridgeError> {
    PORTFOLIOS.lock().map_err(|_| BridgeError::Poisoned)
}

fn with_portfolio<T>(
    handle: usize,
    f: impl FnOnce(&mut Portfolio) -> Result<T, BridgeError>,
) -> Result<T, BridgeError> {
    let mut portfolios = registry()?;
    let portfolio = portfolios
        .get_mut(handle)
        .and_then(Option::as_mut)
        .ok_or(BridgeError::Handle(handle))?;
    f(portfolio)
}

/// Bring the portfolio's clock up to the host time, then run `f`. Commands
/// from timers that came due go first.
fn clocked(
    handle: usize,
    now_ms: f64,
    f: impl FnOnce(&mut Portfolio) -> Result<Vec<HostCommand>, BridgeError>,
) -> Result<String, BridgeError> {
    with_portfolio(handle, |portfolio| {
        let mut commands = portfolio.handle(HostEvent::Tick {
            now_ms: to_millis(now_ms),
        });
        commands.extend(f(portfolio)?);
        Ok(serde_json::to_string(&commands)?)
    })
}

fn to_millis(now_ms: f64) -> u64 {
    if now_ms.is_finite() { now_ms.max(0.0) as u64 } else { 0 }
}

/// Register a portfolio and return its handle.
pub fn create(content_json: Option<&str>, config_json: Option<&str>) -> Result<usize, BridgeError> {
    let portfolio = Portfolio::from_json(
        content_json.map(str::as_bytes),
        config_json.map(str::as_bytes),
    )?;
    let mut portfolios = registry()?;
    portfolios.push(Some(portfolio));
    Ok(portfolios.len() - 1)
}

/// Tear down and forget a portfolio, returning its release commands.
pub fn destroy(handle: usize) -> Result<String, BridgeError> {
    let mut portfolios = registry()?;
    let mut portfolio = portfolios
        .get_mut(handle)
        .and_then(Option::take)
        .ok_or(BridgeError::Handle(handle))?;
    Ok(serde_json::to_string(&portfolio.teardown())?)
}

pub fn mount(handle: usize, now_ms: f64) -> Result<String, BridgeError> {
    clocked(handle, now_ms, |p| Ok(p.mount()))
}

pub fn teardown(handle: usize) -> Result<String, BridgeError> {
    with_portfolio(handle, |p| Ok(serde_json::to_string(&p.teardown())?))
}

/// Feed any `HostEvent` given as JSON.
pub fn dispatch(handle: usize, event_json: &str, now_ms: f64) -> Result<String, BridgeError> {
    let event: HostEvent = serde_json::from_str(event_json)?;
    clocked(handle, now_ms, |p| Ok(p.handle(event)))
}

pub fn pointer_move(handle: usize, x: f64, y: f64) -> Result<(), BridgeError> {
    with_portfolio(handle, |p| {
        p.handle(HostEvent::PointerMoved { x, y });
        Ok(())
    })
}

pub fn scroll(handle: usize, offset: f64) -> Result<(), BridgeError> {
    with_portfolio(handle, |p| {
        p.handle(HostEvent::Scrolled { offset });
        Ok(())
    })
}

pub fn intersections(handle: usize, entries_json: &str) -> Result<(), BridgeError> {
    let entries: Vec<IntersectionEntry> = serde_json::from_str(entries_json)?;
    with_portfolio(handle, |p| {
        p.handle(HostEvent::Intersections { entries });
        Ok(())
    })
}

pub fn key_down(handle: usize, key: &str, now_ms: f64) -> Result<String, BridgeError> {
    clocked(handle, now_ms, |p| {
        Ok(p.handle(HostEvent::KeyDown {
            key: key.to_owned(),
        }))
    })
}

pub fn tick(handle: usize, now_ms: f64) -> Result<String, BridgeError> {
    clocked(handle, now_ms, |_| Ok(Vec::new()))
}

/// `offsets_json` maps section names to measured tops, e.g.
/// `{"work": 960, "skills": null}`. Names parse like `section`, ignoring
/// case. Missing or null entries are unmeasurable.
pub fn navigate(
    handle: usize,
    section: &str,
    offsets_json: &str,
    now_ms: f64,
) -> Result<String, BridgeError> {
    let section: Section = section.parse()?;
    let measured: BTreeMap<String, Option<f64>> = serde_json::from_str(offsets_json)?;
    let mut offsets = BTreeMap::new();
    for (name, top) in measured {
        let key: Section = name.parse()?;
        if let Some(top) = top {
            offsets.insert(key, top);
        }
    }
    clocked(handle, now_ms, |p| Ok(p.navigate(section, &offsets)))
}

pub fn open_preview(handle: usize, index: usize, now_ms: f64) -> Result<String, BridgeError> {
    clocked(handle, now_ms, |p| Ok(p.open_preview(ProjectId(index))?))
}

pub fn dismiss_preview(handle: usize, source: &str, now_ms: f64) -> Result<String, BridgeError> {
    let source: DismissSource = source.parse()?;
    clocked(handle, now_ms, |p| Ok(p.dismiss(source)))
}

pub fn snapshot(
    handle: usize,
    scroll_height: f64,
    viewport_height: f64,
) -> Result<String, BridgeError> {
    with_portfolio(handle, |p| {
        let metrics = ScrollMetrics::new(scroll_height, viewport_height);
        Ok(serde_json::to_string(&p.snapshot(metrics))?)
    })
}

pub fn catalog(handle: usize) -> Result<String, BridgeError> {
    with_portfolio(handle, |p| Ok(serde_json::to_string(p.catalog())?))
}
