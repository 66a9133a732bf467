use folio_protocol::{Capability, HostCommand, Point, ScrollMetrics};
use tracing::trace;

/// Latest pointer position and scroll offset, last write wins.
///
/// The tracker only accepts input between `subscribe` and `unsubscribe`;
/// a host that keeps delivering after teardown is leaking listeners and its
/// events are dropped.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Point,
    scroll_offset: f64,
    subscribed: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Vec<HostCommand> {
        if self.subscribed {
            return Vec::new();
        }
        self.subscribed = true;
        vec![
            HostCommand::Listen {
                capability: Capability::PointerMove,
            },
            HostCommand::Listen {
                capability: Capability::Scroll,
            },
        ]
    }

    pub fn unsubscribe(&mut self) -> Vec<HostCommand> {
        if !self.subscribed {
            return Vec::new();
        }
        self.subscribed = false;
        vec![
            HostCommand::Unlisten {
                capability: Capability::PointerMove,
            },
            HostCommand::Unlisten {
                capability: Capability::Scroll,
            },
        ]
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn on_pointer_move(&mut self, position: Point) {
        if !self.subscribed {
            trace!(?position, "pointer move while unsubscribed, ignored");
            return;
        }
        if position.x.is_finite() && position.y.is_finite() {
            self.position = position;
        }
    }

    pub fn on_scroll(&mut self, offset: f64) {
        if !self.subscribed {
            trace!(offset, "scroll while unsubscribed, ignored");
            return;
        }
        if offset.is_finite() {
            self.scroll_offset = offset;
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Scroll progress for the given document measurements, in percent.
    pub fn progress(&self, metrics: ScrollMetrics) -> f64 {
        metrics.progress(self.scroll_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_pairs_with_unsubscribe() {
        let mut tracker = PointerTracker::new();
        let acquired = tracker.subscribe();
        assert_eq!(acquired.len(), 2);
        assert!(tracker.subscribe().is_empty());

        let released = tracker.unsubscribe();
        let capabilities = |cmds: &[HostCommand]| -> Vec<Capability> {
            cmds.iter()
                .filter_map(|cmd| match cmd {
                    HostCommand::Listen { capability } | HostCommand::Unlisten { capability } => {
                        Some(*capability)
                    }
                    _ => None,
                })
                .collect()
        };
        assert_eq!(capabilities(&acquired), capabilities(&released));
        assert!(tracker.unsubscribe().is_empty());
    }

    #[test]
    fn last_write_wins() {
        let mut tracker = PointerTracker::new();
        tracker.subscribe();
        tracker.on_pointer_move(Point::new(10.0, 20.0));
        tracker.on_pointer_move(Point::new(300.0, 40.0));
        tracker.on_scroll(120.0);
        tracker.on_scroll(300.0);
        assert_eq!(tracker.position(), Point::new(300.0, 40.0));
        assert_eq!(tracker.scroll_offset(), 300.0);
        assert!((tracker.progress(ScrollMetrics::new(1500.0, 300.0)) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn ignores_input_after_teardown() {
        let mut tracker = PointerTracker::new();
        tracker.subscribe();
        tracker.on_scroll(50.0);
        tracker.unsubscribe();
        tracker.on_scroll(900.0);
        tracker.on_pointer_move(Point::new(1.0, 1.0));
        assert_eq!(tracker.scroll_offset(), 50.0);
        assert_eq!(tracker.position(), Point::default());
        assert!(!tracker.is_subscribed());
    }

    #[test]
    fn drops_non_finite_input() {
        let mut tracker = PointerTracker::new();
        tracker.subscribe();
        assert!(tracker.is_subscribed());
        tracker.on_pointer_move(Point::new(12.0, 5.0));
        tracker.on_pointer_move(Point::new(f64::NAN, 5.0));
        tracker.on_pointer_move(Point::new(3.0, f64::INFINITY));
        tracker.on_scroll(40.0);
        tracker.on_scroll(f64::NAN);
        assert_eq!(tracker.position(), Point::new(12.0, 5.0));
        assert_eq!(tracker.scroll_offset(), 40.0);
    }
}
