/// Window motor as seen by the device firmware.
pub trait Actuator {
    /// Drives the window to the requested position. Idempotent.
    fn set_position(&mut self, open: bool);

    fn is_open(&self) -> bool;
}

/// In-memory actuator counting the moves it actually performs.
#[derive(Debug, Default)]
pub struct SimulatedActuator {
    open: bool,
    moves: u32,
}

impl SimulatedActuator {
    pub fn new(open: bool) -> Self {
        Self { open, moves: 0 }
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }
}

impl Actuator for SimulatedActuator {
    fn set_position(&mut self, open: bool) {
        // Debounce: a repeated target never restarts the motor
        if self.open == open {
            return;
        }

        tracing::info!("actuator {}", if open { "opening" } else { "closing" });

        self.open = open;
        self.moves += 1;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_target_is_debounced() {
        let mut actuator = SimulatedActuator::default();

        actuator.set_position(true);
        actuator.set_position(true);
        actuator.set_position(false);
        actuator.set_position(false);

        assert!(!actuator.is_open());
        assert_eq!(actuator.moves(), 2);
    }
}
