use folio_protocol::{
    DismissSource, HostCommand, HostEvent, Point, PreviewView, ProjectRecord, ScrollMetrics,
    Section, Snapshot,
};
use tracing::debug;

use crate::catalog::{Catalog, ProjectId};
use crate::config::ControllerConfig;
use crate::error::PortfolioError;
use crate::navigation::{Navigator, SectionLocator};
use crate::pointer::PointerTracker;
use crate::presentation;
use crate::preview::PreviewController;
use crate::scheduler::{Scheduler, TimerKind};
use crate::visibility::{RevealedSet, VisibilityTracker};

/// Composition root of the page state.
///
/// Owns every slice of UI state plus the logical scheduler. Each controller
/// works on its own slice; hosts read state through queries and
/// [`Portfolio::snapshot`] and change it only through the operations below,
/// each of which returns the commands the host must execute.
#[derive(Debug, Clone)]
pub struct Portfolio {
    catalog: Catalog,
    scheduler: Scheduler<TimerKind>,
    pointer: PointerTracker,
    visibility: VisibilityTracker,
    navigator: Navigator,
    preview: PreviewController,
    loaded: bool,
    mounted: bool,
}

impl Portfolio {
    pub fn new(catalog: Catalog, config: &ControllerConfig) -> Self {
        Self {
            catalog,
            scheduler: Scheduler::new(),
            pointer: PointerTracker::new(),
            visibility: VisibilityTracker::new(config.observer_options()),
            navigator: Navigator::new(config.header_clearance),
            preview: PreviewController::new(config.focus_delay_ms),
            loaded: false,
            mounted: false,
        }
    }

    /// Build from optional JSON content and config, falling back to the
    /// built-in catalog and default tunables.
    pub fn from_json(
        content: Option<&[u8]>,
        config: Option<&[u8]>,
    ) -> Result<Self, PortfolioError> {
        let catalog = match content {
            Some(data) => Catalog::from_json(data)?,
            None => Catalog::builtin(),
        };
        let config = match config {
            Some(data) => ControllerConfig::from_json(data)?,
            None => ControllerConfig::default(),
        };
        Ok(Self::new(catalog, &config))
    }

    /// Acquire subscriptions and start observing the catalog's regions.
    /// Calling it again while mounted does nothing.
    pub fn mount(&mut self) -> Vec<HostCommand> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        self.loaded = true;
        debug!(projects = self.catalog.projects.len(), "mount");
        let mut commands = self.pointer.subscribe();
        commands.extend(self.visibility.mount(self.catalog.regions()));
        commands
    }

    /// Release everything `mount` and any open preview acquired.
    pub fn teardown(&mut self) -> Vec<HostCommand> {
        if !self.mounted {
            return Vec::new();
        }
        self.mounted = false;
        let mut commands = self.preview.close(&mut self.scheduler);
        commands.extend(self.pointer.unsubscribe());
        commands.extend(self.visibility.teardown());
        let dropped = self.scheduler.clear();
        debug!(dropped_timers = dropped, "teardown");
        commands
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Feed one input notification.
    pub fn handle(&mut self, event: HostEvent) -> Vec<HostCommand> {
        match event {
            HostEvent::PointerMoved { x, y } => {
                self.pointer.on_pointer_move(Point::new(x, y));
                Vec::new()
            }
            HostEvent::Scrolled { offset } => {
                self.pointer.on_scroll(offset);
                Vec::new()
            }
            HostEvent::Intersections { entries } => {
                self.visibility.on_batch(&entries);
                Vec::new()
            }
            HostEvent::KeyDown { key } => {
                let commands = self.preview.on_key(&key, &mut self.scheduler);
                self.with_wake(commands)
            }
            HostEvent::Tick { now_ms } => self.tick(now_ms),
        }
    }

    /// Activate `section` and scroll to it. Never fails.
    pub fn navigate(&mut self, section: Section, locator: &dyn SectionLocator) -> Vec<HostCommand> {
        vec![self.navigator.navigate(section, locator)]
    }

    pub fn open_preview(&mut self, project: ProjectId) -> Result<Vec<HostCommand>, PortfolioError> {
        if self.catalog.project(project).is_none() {
            return Err(PortfolioError::UnknownProject {
                index: project.0,
                len: self.catalog.projects.len(),
            });
        }
        let commands = self.preview.open(project, &mut self.scheduler);
        Ok(self.with_wake(commands))
    }

    pub fn close_preview(&mut self) -> Vec<HostCommand> {
        self.preview.close(&mut self.scheduler)
    }

    /// Close the preview in response to a user action.
    pub fn dismiss(&mut self, source: DismissSource) -> Vec<HostCommand> {
        if self.preview.is_open() {
            debug!(%source, "preview dismissed");
        }
        self.close_preview()
    }

    fn tick(&mut self, now_ms: u64) -> Vec<HostCommand> {
        let mut commands = Vec::new();
        for (handle, kind) in self.scheduler.advance_to(now_ms) {
            match kind {
                TimerKind::PreviewFocus => commands.extend(self.preview.on_focus_timer(handle)),
            }
        }
        self.with_wake(commands)
    }

    /// Append a wake-up request when timers are still pending.
    fn with_wake(&self, mut commands: Vec<HostCommand>) -> Vec<HostCommand> {
        if let Some(at_ms) = self.scheduler.next_deadline() {
            commands.push(HostCommand::WakeAt { at_ms });
        }
        commands
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active_section(&self) -> Section {
        self.navigator.active()
    }

    pub fn pointer(&self) -> Point {
        self.pointer.position()
    }

    pub fn scroll_offset(&self) -> f64 {
        self.pointer.scroll_offset()
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.visibility.is_revealed(id)
    }

    pub fn revealed(&self) -> &RevealedSet {
        self.visibility.revealed()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The project currently shown in the preview.
    pub fn preview(&self) -> Option<(ProjectId, &ProjectRecord)> {
        let id = self.preview.project()?;
        self.catalog.project(id).map(|record| (id, record))
    }

    pub fn scheduler(&self) -> &Scheduler<TimerKind> {
        &self.scheduler
    }

    pub fn snapshot(&self, metrics: ScrollMetrics) -> Snapshot {
        let scroll_offset = self.scroll_offset();
        Snapshot {
            active_section: self.active_section(),
            pointer: self.pointer(),
            scroll_offset,
            scroll_progress: self.pointer.progress(metrics),
            revealed: self.revealed().iter().cloned().collect(),
            preview: self.preview().map(|(id, record)| PreviewView {
                index: id.0,
                project: record.clone(),
            }),
            loaded: self.loaded,
            cursor: presentation::cursor(self.pointer(), self.active_section()),
            parallax: presentation::parallax(scroll_offset),
        }
    }
}
