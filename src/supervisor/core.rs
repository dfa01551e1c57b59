// src/supervisor/core.rs

//! Pure core state machine of the supervisor.
//!
//! Consumes [`SupervisorEvent`]s and returns the [`Action`]s the async shell
//! should perform. No channels, no processes, no IO, so it is unit tested
//! directly.

use crate::supervisor::{Action, ReconcileReason, SupervisorEvent, SupervisorState};
use crate::watch::ChangeKind;

/// Result of feeding one event to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub actions: Vec<Action>,
    /// `false` once the loop should exit after performing `actions`.
    pub keep_running: bool,
}

impl CoreStep {
    fn run(actions: Vec<Action>) -> Self {
        Self {
            actions,
            keep_running: true,
        }
    }
}

#[derive(Debug)]
pub struct SupervisorCore {
    state: SupervisorState,
}

impl Default for SupervisorCore {
    fn default() -> Self {
        Self::new()
    }
}

impl SupervisorCore {
    pub fn new() -> Self {
        Self {
            state: SupervisorState::Idle,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Idle → Running, once the event sources are subscribed.
    pub fn start(&mut self) {
        if self.state == SupervisorState::Idle {
            self.state = SupervisorState::Running;
        }
    }

    /// Stopping → Stopped, once shutdown work is done.
    pub fn finish(&mut self) {
        if self.state == SupervisorState::Stopping {
            self.state = SupervisorState::Stopped;
        }
    }

    /// Handle one event. Only a running core produces actions.
    pub fn step(&mut self, event: SupervisorEvent) -> CoreStep {
        if self.state != SupervisorState::Running {
            return CoreStep {
                actions: Vec::new(),
                keep_running: false,
            };
        }

        match event {
            SupervisorEvent::FileChanged(change) => {
                let action = match change.kind {
                    ChangeKind::Created => Action::Start(change.path),
                    ChangeKind::Modified => Action::Restart(change.path),
                    ChangeKind::Removed => Action::Stop(change.path),
                };
                CoreStep::run(vec![action])
            }
            SupervisorEvent::WatchError(_) => {
                CoreStep::run(vec![Action::Reconcile(ReconcileReason::WatchError)])
            }
            SupervisorEvent::Tick => CoreStep::run(vec![Action::Reconcile(ReconcileReason::Timer)]),
            SupervisorEvent::StopRequested(_) => {
                self.state = SupervisorState::Stopping;
                CoreStep {
                    actions: vec![Action::Shutdown],
                    keep_running: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use proptest::prelude::*;

    use crate::signals::ShutdownSignal;
    use crate::watch::FsChange;

    fn running() -> SupervisorCore {
        let mut core = SupervisorCore::new();
        core.start();
        core
    }

    fn changed(kind: ChangeKind) -> SupervisorEvent {
        SupervisorEvent::FileChanged(FsChange::new(kind, "/srv/bin/svc-a"))
    }

    #[test]
    fn file_changes_map_to_registry_actions() {
        let mut core = running();
        let path = PathBuf::from("/srv/bin/svc-a");

        assert_eq!(
            core.step(changed(ChangeKind::Created)).actions,
            vec![Action::Start(path.clone())]
        );
        assert_eq!(
            core.step(changed(ChangeKind::Modified)).actions,
            vec![Action::Restart(path.clone())]
        );
        assert_eq!(
            core.step(changed(ChangeKind::Removed)).actions,
            vec![Action::Stop(path)]
        );
    }

    #[test]
    fn timer_and_watch_errors_reconcile() {
        let mut core = running();
        assert_eq!(
            core.step(SupervisorEvent::Tick).actions,
            vec![Action::Reconcile(ReconcileReason::Timer)]
        );
        assert_eq!(
            core.step(SupervisorEvent::WatchError("queue overflow".into()))
                .actions,
            vec![Action::Reconcile(ReconcileReason::WatchError)]
        );
    }

    #[test]
    fn lifecycle_idle_running_stopping_stopped() {
        let mut core = SupervisorCore::new();
        assert_eq!(core.state(), SupervisorState::Idle);

        core.start();
        assert_eq!(core.state(), SupervisorState::Running);

        let step = core.step(SupervisorEvent::StopRequested(ShutdownSignal::Terminate));
        assert_eq!(step.actions, vec![Action::Shutdown]);
        assert!(!step.keep_running);
        assert_eq!(core.state(), SupervisorState::Stopping);

        core.finish();
        assert_eq!(core.state(), SupervisorState::Stopped);
    }

    #[test]
    fn a_second_stop_request_does_nothing() {
        let mut core = running();
        core.step(SupervisorEvent::StopRequested(ShutdownSignal::Interrupt));

        let step = core.step(SupervisorEvent::StopRequested(ShutdownSignal::Quit));
        assert!(step.actions.is_empty());
        assert_eq!(core.state(), SupervisorState::Stopping);
    }

    #[test]
    fn idle_core_ignores_events() {
        let mut core = SupervisorCore::new();
        let step = core.step(SupervisorEvent::Tick);
        assert!(step.actions.is_empty());
        assert_eq!(core.state(), SupervisorState::Idle);
    }

    fn any_event() -> impl Strategy<Value = SupervisorEvent> {
        prop_oneof![
            Just(changed(ChangeKind::Created)),
            Just(changed(ChangeKind::Modified)),
            Just(changed(ChangeKind::Removed)),
            Just(SupervisorEvent::Tick),
            Just(SupervisorEvent::WatchError("lost events".into())),
        ]
    }

    proptest! {
        #[test]
        fn running_core_emits_exactly_one_action_per_event(
            events in proptest::collection::vec(any_event(), 0..64)
        ) {
            let mut core = running();
            for event in events {
                let step = core.step(event);
                prop_assert!(step.keep_running);
                prop_assert_eq!(step.actions.len(), 1);
                prop_assert_ne!(&step.actions[0], &Action::Shutdown);
            }
            prop_assert_eq!(core.state(), SupervisorState::Running);
        }
    }
}
