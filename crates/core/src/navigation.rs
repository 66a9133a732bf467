use std::collections::BTreeMap;

use folio_protocol::{HostCommand, ScrollBehavior, Section};
use tracing::debug;

/// Measures where a section starts in the document.
///
/// Implemented by the view layer. `None` means the section is not (yet)
/// rendered.
pub trait SectionLocator {
    fn section_top(&self, section: Section) -> Option<f64>;
}

impl<F> SectionLocator for F
where
    F: Fn(Section) -> Option<f64>,
{
    fn section_top(&self, section: Section) -> Option<f64> {
        self(section)
    }
}

impl SectionLocator for BTreeMap<Section, f64> {
    fn section_top(&self, section: Section) -> Option<f64> {
        self.get(&section).copied()
    }
}

/// Owns the active section and turns navigation requests into scrolls.
#[derive(Debug, Clone)]
pub struct Navigator {
    active: Section,
    header_clearance: f64,
}

impl Navigator {
    pub fn new(header_clearance: f64) -> Self {
        Self {
            active: Section::Home,
            header_clearance,
        }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    /// Activate `target` and ask for a smooth scroll to it.
    ///
    /// The active section changes right away, not when the scroll lands. A
    /// second call while a scroll is still animating just issues another
    /// scroll request; the host's smooth-scroll engine decides what the
    /// overlap looks like.
    pub fn navigate(&mut self, target: Section, locator: &dyn SectionLocator) -> HostCommand {
        self.active = target;
        let top = self.scroll_target(target, locator);
        debug!(section = %target, top, "navigate");
        HostCommand::ScrollTo {
            top,
            behavior: ScrollBehavior::Smooth,
        }
    }

    /// Offset a navigation to `target` scrolls to.
    ///
    /// Home is always the top of the document. Other sections land
    /// `header_clearance` above their measured top so the fixed header does
    /// not cover them. Anything unmeasurable lands on 0, and the result is
    /// never negative.
    pub fn scroll_target(&self, target: Section, locator: &dyn SectionLocator) -> f64 {
        if target == Section::Home {
            return 0.0;
        }
        match locator.section_top(target) {
            Some(top) if top.is_finite() => (top - self.header_clearance).max(0.0),
            _ => {
                debug!(section = %target, "section not measurable, scrolling to top");
                0.0
            }
        }
    }
}
