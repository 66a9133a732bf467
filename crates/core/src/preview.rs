use folio_protocol::{Capability, FocusTarget, HostCommand, is_cancel_key};
use tracing::debug;

use crate::catalog::ProjectId;
use crate::scheduler::{Scheduler, TimerHandle, TimerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Closed,
    Open {
        project: ProjectId,
        /// Pending focus move; `None` once focus has been moved.
        focus_timer: Option<TimerHandle>,
    },
}

/// The preview modal: at most one project at a time.
///
/// Each `Open` state owns two resources, the focus-delay timer and the
/// cancel-key listener. Both are released whenever that state is left,
/// including when one preview directly replaces another.
#[derive(Debug, Clone)]
pub struct PreviewController {
    state: PreviewState,
    focus_delay_ms: u64,
}

impl PreviewController {
    pub fn new(focus_delay_ms: u64) -> Self {
        Self {
            state: PreviewState::Closed,
            focus_delay_ms,
        }
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn project(&self) -> Option<ProjectId> {
        match self.state {
            PreviewState::Open { project, .. } => Some(project),
            PreviewState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.project().is_some()
    }

    /// Show `project`. Replaces whatever is open; re-opening the project
    /// that is already shown changes nothing.
    pub fn open(
        &mut self,
        project: ProjectId,
        scheduler: &mut Scheduler<TimerKind>,
    ) -> Vec<HostCommand> {
        let mut commands = Vec::with_capacity(2);
        match self.state {
            PreviewState::Open { project: current, .. } if current == project => {
                return commands;
            }
            PreviewState::Open { project: current, .. } => {
                debug!(from = current.0, to = project.0, "preview replaced");
                commands.extend(self.leave(scheduler));
            }
            PreviewState::Closed => debug!(project = project.0, "preview opened"),
        }
        let focus_timer = scheduler.schedule(self.focus_delay_ms, TimerKind::PreviewFocus);
        self.state = PreviewState::Open {
            project,
            focus_timer: Some(focus_timer),
        };
        commands.push(HostCommand::Listen {
            capability: Capability::CancelKey,
        });
        commands
    }

    /// Close the preview. Closing an already closed preview is a no-op.
    pub fn close(&mut self, scheduler: &mut Scheduler<TimerKind>) -> Vec<HostCommand> {
        if self.is_open() {
            debug!("preview closed");
        }
        self.leave(scheduler).into_iter().collect()
    }

    /// A key went down while the cancel-key listener was active.
    pub fn on_key(&mut self, key: &str, scheduler: &mut Scheduler<TimerKind>) -> Vec<HostCommand> {
        if self.is_open() && is_cancel_key(key) {
            self.close(scheduler)
        } else {
            Vec::new()
        }
    }

    /// The focus timer `handle` fired. Only the timer of the current open
    /// state moves focus; anything else is stale.
    pub fn on_focus_timer(&mut self, handle: TimerHandle) -> Option<HostCommand> {
        match &mut self.state {
            PreviewState::Open { focus_timer, .. } if *focus_timer == Some(handle) => {
                *focus_timer = None;
                Some(HostCommand::Focus {
                    target: FocusTarget::DismissControl,
                })
            }
            _ => {
                debug!(deadline = handle.deadline(), "stale focus timer ignored");
                None
            }
        }
    }

    /// Release the resources of the current open state, if any.
    fn leave(&mut self, scheduler: &mut Scheduler<TimerKind>) -> Option<HostCommand> {
        let PreviewState::Open { focus_timer, .. } = self.state else {
            return None;
        };
        if let Some(handle) = focus_timer {
            scheduler.cancel(handle);
        }
        self.state = PreviewState::Closed;
        Some(HostCommand::Unlisten {
            capability: Capability::CancelKey,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTEN: HostCommand = HostCommand::Listen {
        capability: Capability::CancelKey,
    };
    const UNLISTEN: HostCommand = HostCommand::Unlisten {
        capability: Capability::CancelKey,
    };

    fn setup() -> (PreviewController, Scheduler<TimerKind>) {
        (PreviewController::new(50), Scheduler::new())
    }

    #[test]
    fn open_arms_timer_and_listener() {
        let (mut preview, mut sched) = setup();
        assert_eq!(preview.open(ProjectId(0), &mut sched), vec![LISTEN]);
        assert_eq!(preview.project(), Some(ProjectId(0)));
        assert_eq!(sched.next_deadline(), Some(50));
    }

    #[test]
    fn reopening_same_project_is_a_no_op() {
        let (mut preview, mut sched) = setup();
        preview.open(ProjectId(1), &mut sched);
        let before = preview.state();
        assert!(preview.open(ProjectId(1), &mut sched).is_empty());
        assert_eq!(preview.state(), before);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn replacement_releases_then_rearms() {
        let (mut preview, mut sched) = setup();
        preview.open(ProjectId(0), &mut sched);
        let PreviewState::Open {
            focus_timer: Some(first),
            ..
        } = preview.state()
        else {
            panic!("expected open preview");
        };

        let commands = preview.open(ProjectId(2), &mut sched);
        assert_eq!(commands, vec![UNLISTEN, LISTEN]);
        assert!(!sched.is_pending(first));
        assert_eq!(sched.len(), 1);
        assert_eq!(preview.project(), Some(ProjectId(2)));
        // The replaced preview's timer can never move focus.
        assert_eq!(preview.on_focus_timer(first), None);
    }

    #[test]
    fn escape_closes_and_releases() {
        let (mut preview, mut sched) = setup();
        preview.open(ProjectId(0), &mut sched);
        assert!(preview.on_key("Enter", &mut sched).is_empty());
        assert_eq!(preview.on_key("Escape", &mut sched), vec![UNLISTEN]);
        assert_eq!(preview.state(), PreviewState::Closed);
        assert!(sched.is_empty());
    }

    #[test]
    fn close_twice_stays_closed() {
        let (mut preview, mut sched) = setup();
        preview.open(ProjectId(0), &mut sched);
        assert_eq!(preview.close(&mut sched), vec![UNLISTEN]);
        assert!(preview.close(&mut sched).is_empty());
        assert_eq!(preview.state(), PreviewState::Closed);
        assert!(preview.on_key("Escape", &mut sched).is_empty());
    }

    #[test]
    fn focus_moves_once() {
        let (mut preview, mut sched) = setup();
        preview.open(ProjectId(0), &mut sched);
        let fired = sched.advance_to(50);
        assert_eq!(fired.len(), 1);
        let (handle, _) = fired[0];
        assert_eq!(
            preview.on_focus_timer(handle),
            Some(HostCommand::Focus {
                target: FocusTarget::DismissControl
            })
        );
        assert_eq!(preview.on_focus_timer(handle), None);
        // Closing after focus has no timer left to cancel but still unlistens.
        assert_eq!(preview.close(&mut sched), vec![UNLISTEN]);
    }
}
