use std::collections::{BTreeSet, HashMap};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use folio_core::{Portfolio, ProjectId, presentation};
use folio_protocol::{
    Capability, DismissSource, HostCommand, HostEvent, ObserverOptions, RegionId, ScrollBehavior,
    ScrollMetrics, Section, Snapshot,
};
use ratatui::layout::{Position, Rect};
use tracing::{debug, warn};

use crate::document::{Document, ROW_HEIGHT};
use crate::renderer;
use crate::smooth_scroll::SmoothScroll;

const SCROLL_SPEED: f64 = 0.25;
const SCROLL_SETTLE: f64 = 2.0;
const WHEEL_ROWS: f64 = 3.0;

/// Terminal host state around a [`Portfolio`].
///
/// Executes the portfolio's commands against the terminal: subscriptions
/// become flags that gate which input is delivered, observation becomes a
/// per-frame geometric measurement, and `WakeAt` becomes a deadline checked
/// each frame.
pub struct App {
    portfolio: Portfolio,
    document: Document,
    scroll: SmoothScroll,
    screen: Rect,
    listening: BTreeSet<Capability>,
    observed: Vec<RegionId>,
    observer: Option<ObserverOptions>,
    wake_at: Option<u64>,
    delivered_offset: f64,
    revealed_at: HashMap<RegionId, u64>,
    mounted_at: u64,
    selected: usize,
    close_focused: bool,
    quit: bool,
}

impl App {
    pub fn new(portfolio: Portfolio, screen: Rect) -> Self {
        let document = Document::layout(portfolio.catalog(), screen.width);
        Self {
            portfolio,
            document,
            scroll: SmoothScroll::new(SCROLL_SPEED, SCROLL_SETTLE),
            screen,
            listening: BTreeSet::new(),
            observed: Vec::new(),
            observer: None,
            wake_at: None,
            delivered_offset: 0.0,
            revealed_at: HashMap::new(),
            mounted_at: 0,
            selected: 0,
            close_focused: false,
            quit: false,
        }
    }

    pub fn mount(&mut self, now_ms: u64) {
        self.mounted_at = now_ms;
        self.run(now_ms, |portfolio, _| portfolio.mount());
    }

    pub fn teardown(&mut self) {
        let commands = self.portfolio.teardown();
        self.apply(commands);
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn close_focused(&self) -> bool {
        self.close_focused
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll.position()
    }

    pub fn mounted_at(&self) -> u64 {
        self.mounted_at
    }

    pub fn is_listening(&self, capability: Capability) -> bool {
        self.listening.contains(&capability)
    }

    /// Rows available to the document pane.
    pub fn viewport_rows(&self) -> u16 {
        renderer::panes(self.screen).document.height
    }

    pub fn snapshot(&self) -> Snapshot {
        let metrics = ScrollMetrics::new(
            self.document.height(),
            f64::from(self.viewport_rows()) * ROW_HEIGHT,
        );
        self.portfolio.snapshot(metrics)
    }

    /// Whether `id` has been revealed long enough ago to have finished its
    /// staggered entrance.
    pub fn entrance_done(&self, id: &RegionId, now_ms: u64) -> bool {
        let Some(&at) = self.revealed_at.get(id) else {
            return false;
        };
        let delay = presentation::entrance_delay(id.as_str());
        now_ms.saturating_sub(at) >= u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
    }

    /// Per-frame work: due timers, scroll animation and visibility.
    pub fn frame(&mut self, now_ms: u64) {
        if self.wake_at.is_some_and(|at| at <= now_ms) {
            self.wake_at = None;
            self.run(now_ms, |_, _| Vec::new());
        }
        self.scroll.tick();
        self.deliver_scroll();
        self.measure(now_ms);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = Rect::new(0, 0, width, height);
        if width != self.document.width() {
            self.document = Document::layout(self.portfolio.catalog(), width);
        }
        self.scroll.clamp(self.max_offset());
    }

    pub fn on_event(&mut self, event: &Event, now_ms: u64) {
        match event {
            Event::Key(key) => self.on_key(*key, now_ms),
            Event::Mouse(mouse) => self.on_mouse(*mouse, now_ms),
            Event::Resize(width, height) => self.resize(*width, *height),
            _ => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent, now_ms: u64) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let page = f64::from(self.viewport_rows().saturating_sub(2).max(1)) * ROW_HEIGHT;
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
            }
            KeyCode::Esc => self.deliver_key("Escape", now_ms),
            code if self.portfolio.preview().is_some() => self.on_preview_key(code, now_ms),
            KeyCode::Char('1' | 'h') => self.navigate(Section::Home, now_ms),
            KeyCode::Char('2' | 'w') => self.navigate(Section::Work, now_ms),
            KeyCode::Char('3' | 's') => self.navigate(Section::Skills, now_ms),
            KeyCode::Char('4' | 'c') => self.navigate(Section::Contact, now_ms),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(ROW_HEIGHT),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-ROW_HEIGHT),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(page),
            KeyCode::PageUp => self.scroll_by(-page),
            KeyCode::Home | KeyCode::Char('g') => self.scroll.jump(0.0),
            KeyCode::End | KeyCode::Char('G') => self.scroll.jump(self.max_offset()),
            KeyCode::Tab => self.select(1),
            KeyCode::BackTab => self.select(-1),
            KeyCode::Enter | KeyCode::Char('p') => self.open_selected(now_ms),
            _ => {}
        }
    }

    fn on_preview_key(&mut self, code: KeyCode, now_ms: u64) {
        match code {
            KeyCode::Char('x') => self.dismiss(DismissSource::CloseControl, now_ms),
            KeyCode::Enter => self.dismiss(DismissSource::FooterButton, now_ms),
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, now_ms: u64) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                if self.is_listening(Capability::PointerMove) {
                    let (x, y) = (f64::from(mouse.column), f64::from(mouse.row));
                    self.run(now_ms, |portfolio, _| {
                        portfolio.handle(HostEvent::PointerMoved { x, y })
                    });
                }
            }
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_ROWS * ROW_HEIGHT),
            MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_ROWS * ROW_HEIGHT),
            MouseEventKind::Down(MouseButton::Left) if self.portfolio.preview().is_some() => {
                let popup = renderer::popup_area(self.screen);
                if !popup.contains(Position::new(mouse.column, mouse.row)) {
                    self.dismiss(DismissSource::Overlay, now_ms);
                }
            }
            _ => {}
        }
    }

    fn deliver_key(&mut self, key: &str, now_ms: u64) {
        if !self.is_listening(Capability::CancelKey) {
            return;
        }
        let key = key.to_owned();
        self.run(now_ms, |portfolio, _| {
            portfolio.handle(HostEvent::KeyDown { key })
        });
    }

    fn navigate(&mut self, section: Section, now_ms: u64) {
        self.run(now_ms, |portfolio, document| {
            portfolio.navigate(section, document)
        });
    }

    fn dismiss(&mut self, source: DismissSource, now_ms: u64) {
        self.run(now_ms, |portfolio, _| portfolio.dismiss(source));
    }

    fn open_selected(&mut self, now_ms: u64) {
        let project = ProjectId(self.selected);
        self.run(now_ms, |portfolio, _| {
            portfolio.open_preview(project).unwrap_or_else(|err| {
                warn!(%err, "cannot open preview");
                Vec::new()
            })
        });
    }

    fn select(&mut self, step: isize) {
        let count = self.portfolio.catalog().projects.len();
        if count == 0 {
            return;
        }
        self.selected = (self.selected as isize + step).rem_euclid(count as isize) as usize;
        let Some(bounds) = self
            .document
            .region_bounds(RegionId::project(self.selected).as_str())
        else {
            return;
        };
        let top = self.scroll.target();
        let bottom = top + f64::from(self.viewport_rows()) * ROW_HEIGHT;
        if bounds.y < top || bounds.bottom() > bottom {
            self.scroll
                .retarget((bounds.y - 2.0 * ROW_HEIGHT).clamp(0.0, self.max_offset()));
        }
    }

    fn scroll_by(&mut self, delta: f64) {
        let target = (self.scroll.target() + delta).clamp(0.0, self.max_offset());
        self.scroll.jump(target);
    }

    fn max_offset(&self) -> f64 {
        self.document.max_offset(self.viewport_rows())
    }

    /// Tick the portfolio up to `now_ms`, apply `f` and execute what comes
    /// back.
    fn run(&mut self, now_ms: u64, f: impl FnOnce(&mut Portfolio, &Document) -> Vec<HostCommand>) {
        let mut commands = self.portfolio.handle(HostEvent::Tick { now_ms });
        commands.extend(f(&mut self.portfolio, &self.document));
        self.apply(commands);
    }

    fn apply(&mut self, commands: Vec<HostCommand>) {
        for command in commands {
            debug!(?command, "execute");
            match command {
                HostCommand::Listen { capability } => {
                    self.listening.insert(capability);
                }
                HostCommand::Unlisten { capability } => {
                    self.listening.remove(&capability);
                }
                HostCommand::Observe { regions, options } => {
                    self.observed = regions;
                    self.observer = Some(options);
                }
                HostCommand::Disconnect => {
                    self.observed.clear();
                    self.observer = None;
                }
                HostCommand::ScrollTo { top, behavior } => {
                    let top = top.clamp(0.0, self.max_offset());
                    match behavior {
                        ScrollBehavior::Smooth => self.scroll.retarget(top),
                        ScrollBehavior::Instant => self.scroll.jump(top),
                    }
                }
                HostCommand::Focus { .. } => self.close_focused = true,
                HostCommand::WakeAt { at_ms } => self.wake_at = Some(at_ms),
            }
        }
        if self.portfolio.preview().is_none() {
            self.close_focused = false;
        }
    }

    fn deliver_scroll(&mut self) {
        let offset = self.scroll.position();
        if offset == self.delivered_offset || !self.is_listening(Capability::Scroll) {
            return;
        }
        self.delivered_offset = offset;
        self.portfolio.handle(HostEvent::Scrolled { offset });
    }

    fn measure(&mut self, now_ms: u64) {
        let Some(options) = &self.observer else {
            return;
        };
        let entries = self.document.intersections(
            &self.observed,
            self.scroll.position(),
            self.viewport_rows(),
            options,
        );
        self.portfolio.handle(HostEvent::Intersections { entries });
        for id in self.portfolio.revealed().iter() {
            self.revealed_at.entry(id.clone()).or_insert(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Catalog, ControllerConfig};
    use folio_protocol::FocusTarget;

    fn app() -> App {
        let portfolio = Portfolio::new(Catalog::builtin(), &ControllerConfig::default());
        let mut app = App::new(portfolio, Rect::new(0, 0, 80, 30));
        app.mount(0);
        app
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn settle(app: &mut App, mut now_ms: u64) -> u64 {
        for _ in 0..200 {
            now_ms += 16;
            app.frame(now_ms);
        }
        now_ms
    }

    #[test]
    fn mount_subscribes_and_reveals_what_is_on_screen() {
        let mut app = app();
        assert!(app.is_listening(Capability::PointerMove));
        assert!(app.is_listening(Capability::Scroll));
        assert!(!app.is_listening(Capability::CancelKey));
        app.frame(16);
        assert!(app.portfolio().is_revealed("projects-title"));
        assert!(!app.portfolio().is_revealed("contact-title"));
        assert!(app.snapshot().loaded);
    }

    #[test]
    fn navigation_animates_to_the_section() {
        let mut app = app();
        app.on_event(&key(KeyCode::Char('2')), 10);
        assert_eq!(app.portfolio().active_section(), Section::Work);
        assert!(app.scroll_position() < 1.0, "scroll has not landed yet");

        let now = settle(&mut app, 10);
        let work = folio_core::SectionLocator::section_top(app.document(), Section::Work).unwrap();
        assert_eq!(app.scroll_position(), (work - 80.0).max(0.0));
        assert_eq!(app.portfolio().scroll_offset(), app.scroll_position());

        app.on_event(&key(KeyCode::Char('4')), now);
        settle(&mut app, now);
        assert!(app.portfolio().is_revealed("contact-buttons"));
        assert!(app.snapshot().scroll_progress > 99.0);
    }

    #[test]
    fn preview_focus_and_cancel_key() {
        let mut app = app();
        app.on_event(&key(KeyCode::Tab), 100);
        assert_eq!(app.selected(), 1);
        app.on_event(&key(KeyCode::Enter), 100);
        assert_eq!(app.portfolio().preview().map(|(id, _)| id), Some(ProjectId(1)));
        assert!(app.is_listening(Capability::CancelKey));

        app.frame(120);
        assert!(!app.close_focused());
        app.frame(150);
        assert!(app.close_focused());

        // Navigation keys are inert while the preview is open.
        app.on_event(&key(KeyCode::Char('3')), 160);
        assert_eq!(app.portfolio().active_section(), Section::Home);

        app.on_event(&key(KeyCode::Esc), 170);
        assert!(app.portfolio().preview().is_none());
        assert!(!app.is_listening(Capability::CancelKey));
        assert!(!app.close_focused());
    }

    #[test]
    fn overlay_click_outside_popup_dismisses() {
        let mut app = app();
        app.on_event(&key(KeyCode::Char('p')), 0);
        let inside = renderer::popup_area(Rect::new(0, 0, 80, 30));
        let click = |column, row| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };
        app.on_event(&click(inside.x + 1, inside.y + 1), 5);
        assert!(app.portfolio().preview().is_some());
        app.on_event(&click(0, 0), 6);
        assert!(app.portfolio().preview().is_none());
    }

    #[test]
    fn teardown_releases_everything() {
        let mut app = app();
        app.on_event(&key(KeyCode::Enter), 0);
        app.teardown();
        for capability in [Capability::PointerMove, Capability::Scroll, Capability::CancelKey] {
            assert!(!app.is_listening(capability));
        }
        assert!(app.portfolio().preview().is_none());

        // No observer: scrolling reveals nothing more.
        app.on_event(&key(KeyCode::End), 10);
        app.frame(20);
        assert!(!app.portfolio().is_revealed("contact-title"));
    }

    #[test]
    fn focus_command_marks_close_control() {
        let mut app = app();
        app.on_event(&key(KeyCode::Enter), 0);
        app.apply(vec![HostCommand::Focus {
            target: FocusTarget::DismissControl,
        }]);
        assert!(app.close_focused());
    }

    #[test]
    fn staggered_entrance() {
        let mut app = app();
        app.on_event(&key(KeyCode::Char('2')), 0);
        let now = settle(&mut app, 0);
        let first = RegionId::project(0);
        let third = RegionId::project(2);
        assert!(app.portfolio().is_revealed(third.as_str()));
        assert!(app.entrance_done(&first, now));
        let revealed = app.revealed_at[&third];
        assert!(!app.entrance_done(&third, revealed + 299));
        assert!(app.entrance_done(&third, revealed + 300));
    }
}
