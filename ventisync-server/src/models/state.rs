use time::{Duration, OffsetDateTime};
use ventisync_api::models::{Mode, StatusResponse};

/// Result of offering an automatic decision to the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoOutcome {
    /// Accepted and the commanded position flipped
    Applied,
    /// Accepted, the commanded position already matched
    Unchanged,
    /// Discarded because a manual mode holds
    Overridden(Mode),
    /// Discarded because the decision interval has not elapsed
    TooSoon,
}

/// Authoritative coordinator state.
///
/// Only the arbiter holds the live copy; everybody else sees snapshots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorState {
    mode: Mode,
    commanded_open: bool,
    reported_open: Option<bool>,
    last_command_changed_at: OffsetDateTime,
    last_decision_at: Option<OffsetDateTime>,
    last_device_contact_at: Option<OffsetDateTime>,
}

impl CoordinatorState {
    /// Starts in `Auto` with the window commanded closed.
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            mode: Mode::Auto,
            commanded_open: false,
            reported_open: None,
            last_command_changed_at: now,
            last_decision_at: None,
            last_device_contact_at: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_command(&self) -> bool {
        self.commanded_open
    }

    pub fn reported_open(&self) -> Option<bool> {
        self.reported_open
    }

    pub fn last_command_changed_at(&self) -> OffsetDateTime {
        self.last_command_changed_at
    }

    pub fn last_decision_at(&self) -> Option<OffsetDateTime> {
        self.last_decision_at
    }

    pub fn last_device_contact_at(&self) -> Option<OffsetDateTime> {
        self.last_device_contact_at
    }

    pub fn set_manual(&mut self, open: bool, at: OffsetDateTime) {
        self.mode = Mode::forced(open);
        self.commanded_open = open;
        self.last_command_changed_at = at;
    }

    /// Hands control back to the decision engine without moving the window.
    pub fn set_auto_mode(&mut self, at: OffsetDateTime) {
        if !self.mode.is_auto() {
            self.mode = Mode::Auto;
            self.last_command_changed_at = at;
        }
    }

    pub fn apply_automatic_decision(
        &mut self,
        open: bool,
        at: OffsetDateTime,
        interval: Duration,
    ) -> AutoOutcome {
        if !self.mode.is_auto() {
            return AutoOutcome::Overridden(self.mode);
        }

        if !self.decision_due(at, interval) {
            return AutoOutcome::TooSoon;
        }

        self.last_decision_at = Some(at);

        if self.commanded_open == open {
            return AutoOutcome::Unchanged;
        }

        self.commanded_open = open;
        self.last_command_changed_at = at;

        AutoOutcome::Applied
    }

    /// Records device ground truth. Never touches mode or the commanded position.
    pub fn report_physical_state(&mut self, open: bool, at: OffsetDateTime) {
        self.reported_open = Some(open);
        self.last_device_contact_at = Some(at);
    }

    pub fn decision_due(&self, now: OffsetDateTime, interval: Duration) -> bool {
        decision_due(self.last_decision_at, now, interval)
    }

    /// Position a freeze request pins: the physical position while the device
    /// is online, otherwise the current command. A report from a device that
    /// has since gone silent says nothing about where the window is now.
    pub fn freeze_position(&self, now: OffsetDateTime, liveness_timeout: Duration) -> bool {
        match self.reported_open {
            Some(reported) if self.device_online(now, liveness_timeout) => reported,
            _ => self.commanded_open,
        }
    }

    pub fn device_online(&self, now: OffsetDateTime, timeout: Duration) -> bool {
        self.last_device_contact_at
            .is_some_and(|contact| now - contact <= timeout)
    }

    pub fn to_status(&self, now: OffsetDateTime, liveness_timeout: Duration) -> StatusResponse {
        StatusResponse {
            is_open: self.commanded_open,
            auto_mode: self.mode.is_auto(),
            last_updated: self.last_command_changed_at,
            mode: self.mode,
            reported_open: self.reported_open,
            device_online: self.device_online(now, liveness_timeout),
            last_device_contact: self.last_device_contact_at,
        }
    }
}

pub fn decision_due(last: Option<OffsetDateTime>, now: OffsetDateTime, interval: Duration) -> bool {
    last.is_none_or(|last| now - last >= interval)
}
