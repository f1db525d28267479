use time::{Duration, OffsetDateTime};
use tokio::sync::{Mutex, watch};
use ventisync_api::models::{ControlRequest, Mode};

use crate::errors::ControlError;
use crate::models::{AutoOutcome, CoordinatorState};

/// Sole owner of the coordinator state.
///
/// Every write goes through one mutex, so manual requests, device reports and
/// automatic decisions are applied one at a time. After each write a copy is
/// published on a watch channel for lock-free status reads.
pub struct ArbiterService {
    state: Mutex<CoordinatorState>,
    snapshot: watch::Sender<CoordinatorState>,
    decision_interval: Duration,
    liveness_timeout: Duration,
}

impl ArbiterService {
    pub fn new(
        decision_interval: Duration,
        liveness_timeout: Duration,
        now: OffsetDateTime,
    ) -> Self {
        let initial = CoordinatorState::new(now);
        let (snapshot, _) = watch::channel(initial);

        Self {
            state: Mutex::new(initial),
            snapshot,
            decision_interval,
            liveness_timeout,
        }
    }

    /// Copy of the last published state. May lag an in-flight write.
    pub fn snapshot(&self) -> CoordinatorState {
        *self.snapshot.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.snapshot.subscribe()
    }

    pub async fn set_manual(&self, open: bool, at: OffsetDateTime) -> CoordinatorState {
        let mut state = self.state.lock().await;
        let previous = state.mode();

        state.set_manual(open, at);

        tracing::info!("manual override: {:?} -> {:?}", previous, state.mode());

        self.publish(&state)
    }

    pub async fn set_auto_mode(&self, at: OffsetDateTime) -> CoordinatorState {
        let mut state = self.state.lock().await;
        let previous = state.mode();

        state.set_auto_mode(at);

        if previous != Mode::Auto {
            tracing::info!(
                "control returned to automatic mode, window stays {}",
                position(state.current_command())
            );
        }

        self.publish(&state)
    }

    pub async fn apply_automatic_decision(&self, open: bool, at: OffsetDateTime) -> AutoOutcome {
        let mut state = self.state.lock().await;

        let outcome = state.apply_automatic_decision(open, at, self.decision_interval);

        match outcome {
            AutoOutcome::Applied => {
                tracing::info!("automatic decision: window {}", position(open));
            }
            AutoOutcome::Unchanged => {
                tracing::debug!("automatic decision confirms window {}", position(open));
            }
            AutoOutcome::Overridden(mode) => {
                tracing::debug!(
                    "automatic decision ({}) discarded, {:?} holds",
                    position(open),
                    mode
                );
            }
            AutoOutcome::TooSoon => {
                tracing::debug!("automatic decision ({}) ahead of cadence", position(open));
            }
        }

        self.publish(&state);

        outcome
    }

    pub async fn report_physical_state(&self, open: bool, at: OffsetDateTime) -> CoordinatorState {
        let mut state = self.state.lock().await;

        state.report_physical_state(open, at);

        self.publish(&state)
    }

    /// The only value ever handed to the device.
    pub async fn current_command(&self) -> bool {
        self.state.lock().await.current_command()
    }

    /// Applies a client control request.
    ///
    /// `action` takes precedence over `autoMode`. `autoMode: false` alone pins
    /// the window where it is, see [`CoordinatorState::freeze_position`].
    pub async fn apply_control(
        &self,
        request: &ControlRequest,
        at: OffsetDateTime,
    ) -> Result<CoordinatorState, ControlError> {
        match (request.action, request.auto_mode) {
            (Some(action), auto_mode) => {
                if auto_mode.is_some() {
                    tracing::debug!("control request carries both action and autoMode, action wins");
                }

                Ok(self.set_manual(action.is_open(), at).await)
            }
            (None, Some(true)) => Ok(self.set_auto_mode(at).await),
            (None, Some(false)) => {
                let mut state = self.state.lock().await;
                let open = state.freeze_position(at, self.liveness_timeout);

                state.set_manual(open, at);

                tracing::info!("window frozen {} under manual control", position(open));

                Ok(self.publish(&state))
            }
            (None, None) => Err(ControlError::InvalidCommand),
        }
    }

    fn publish(&self, state: &CoordinatorState) -> CoordinatorState {
        let state = *state;

        self.snapshot.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });

        state
    }
}

fn position(open: bool) -> &'static str {
    if open { "open" } else { "closed" }
}
