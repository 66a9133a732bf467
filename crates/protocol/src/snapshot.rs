use serde::{Deserialize, Serialize};

use crate::content::ProjectRecord;
use crate::region::RegionId;
use crate::section::Section;
use crate::types::Point;

/// Read-only view of controller state handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub active_section: Section,
    pub pointer: Point,
    pub scroll_offset: f64,
    /// Derived from `scroll_offset` and the document metrics, `0..=100`.
    pub scroll_progress: f64,
    /// Revealed region ids, sorted.
    pub revealed: Vec<RegionId>,
    pub preview: Option<PreviewView>,
    /// Set once the page has mounted; gates the hero entrance.
    pub loaded: bool,
    pub cursor: CursorStyle,
    pub parallax: Parallax,
}

impl Snapshot {
    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed
            .binary_search_by(|probe| probe.as_str().cmp(id))
            .is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewView {
    /// Position of the project in the catalog.
    pub index: usize,
    pub project: ProjectRecord,
}

/// Placement of the custom cursor follower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorStyle {
    pub left: f64,
    pub top: f64,
    pub scale: f64,
}

/// Vertical parallax translation of the three hero shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parallax {
    pub diamond: f64,
    pub ring: f64,
    pub glow: f64,
}
