use std::collections::BTreeSet;

use folio_protocol::{HostCommand, IntersectionEntry, ObserverOptions, Rect, RegionId};
use tracing::debug;

/// Region ids that have been revealed at least once.
///
/// Only ever grows: there is no removal, so reveal animations run once per
/// id for the lifetime of the page view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealedSet {
    ids: BTreeSet<RegionId>,
}

impl RevealedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id. Returns `true` only if it was not already present.
    pub fn insert(&mut self, id: RegionId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &RegionId> {
        self.ids.iter()
    }

    pub fn is_subset(&self, other: &RevealedSet) -> bool {
        self.ids.is_subset(&other.ids)
    }
}

/// Turns intersection batches into reveals.
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    options: ObserverOptions,
    observing: Option<Vec<RegionId>>,
    revealed: RevealedSet,
}

impl VisibilityTracker {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            observing: None,
            revealed: RevealedSet::new(),
        }
    }

    /// Start observing `regions`, replacing any previous observation.
    /// Already revealed ids stay revealed.
    pub fn mount(&mut self, regions: Vec<RegionId>) -> Vec<HostCommand> {
        let mut commands = Vec::with_capacity(2);
        if self.observing.is_some() {
            commands.push(HostCommand::Disconnect);
        }
        debug!(regions = regions.len(), "observing regions");
        self.observing = Some(regions.clone());
        commands.push(HostCommand::Observe {
            regions,
            options: self.options,
        });
        commands
    }

    pub fn teardown(&mut self) -> Option<HostCommand> {
        self.observing.take().map(|_| HostCommand::Disconnect)
    }

    pub fn is_observing(&self) -> bool {
        self.observing.is_some()
    }

    /// Union every intersecting entry into the revealed set and return the
    /// ids that are new. Entries without an id cannot be tracked and are
    /// skipped.
    pub fn on_batch(&mut self, entries: &[IntersectionEntry]) -> Vec<RegionId> {
        if self.observing.is_none() {
            debug!(entries = entries.len(), "intersection batch after teardown, ignored");
            return Vec::new();
        }
        let mut newly = Vec::new();
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            let Some(id) = &entry.id else {
                debug!("intersecting region without an id, skipped");
                continue;
            };
            if self.revealed.insert(id.clone()) {
                debug!(region = %id, "revealed");
                newly.push(id.clone());
            }
        }
        newly
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn revealed(&self) -> &RevealedSet {
        &self.revealed
    }
}

/// Compute an intersection entry from geometry, for hosts without a native
/// intersection observer.
///
/// The viewport is first shrunk by `options.bottom_margin` from the bottom.
/// The ratio is the visible share of the region's area; the region
/// intersects when that share is non-zero and at least the threshold.
pub fn measure(
    id: RegionId,
    bounds: Rect,
    viewport: Rect,
    options: &ObserverOptions,
) -> IntersectionEntry {
    let root = viewport.shrink_bottom(options.bottom_margin);
    let area = bounds.area();
    let ratio = match bounds.intersection(&root) {
        Some(visible) if area > 0.0 => (visible.area() / area).clamp(0.0, 1.0),
        _ => 0.0,
    };
    IntersectionEntry {
        id: Some(id),
        is_intersecting: ratio > 0.0 && ratio >= options.threshold,
        ratio,
    }
}
