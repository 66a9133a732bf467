use serde::{Deserialize, Serialize};

use crate::region::RegionId;

/// A single side effect the core asks its host to perform.
///
/// The core never touches the page itself. Each operation returns a
/// `Vec<HostCommand>` and the host executes it in order; every command
/// carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostCommand {
    /// Start delivering the events of a global capability.
    Listen { capability: Capability },

    /// Stop delivering them. Must release whatever `Listen` acquired.
    Unlisten { capability: Capability },

    /// (Re)establish viewport observation on exactly these regions,
    /// replacing any previous observation.
    Observe {
        regions: Vec<RegionId>,
        options: ObserverOptions,
    },

    /// Stop all viewport observation.
    Disconnect,

    /// Scroll the viewport to an absolute vertical offset.
    ScrollTo { top: f64, behavior: ScrollBehavior },

    /// Move keyboard focus to a control.
    Focus { target: FocusTarget },

    /// Deliver `HostEvent::Tick` no earlier than this logical time.
    /// Supersedes any earlier `WakeAt`.
    WakeAt { at_ms: u64 },
}

/// Global event sources a host can subscribe to on the core's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    PointerMove,
    Scroll,
    /// Key presses, consumed only while a preview is open.
    CancelKey,
}

impl Capability {
    /// DOM event name backing this capability.
    pub fn event_name(self) -> &'static str {
        match self {
            Capability::PointerMove => "mousemove",
            Capability::Scroll => "scroll",
            Capability::CancelKey => "keydown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    /// The close button of the preview modal.
    DismissControl,
}

impl FocusTarget {
    pub fn element_id(self) -> &'static str {
        match self {
            FocusTarget::DismissControl => "preview-close",
        }
    }
}

/// Viewport observation policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// Fraction of a region's area that must be visible, `0.0..=1.0`.
    pub threshold: f64,
    /// Distance the viewport's bottom edge is pulled up before testing.
    pub bottom_margin: f64,
}

impl ObserverOptions {
    /// CSS margin string in the form intersection observers expect.
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin)
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 100.0,
        }
    }
}
