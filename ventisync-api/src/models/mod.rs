mod control;
mod device;
mod environment;
mod status;

pub use control::*;
pub use device::*;
pub use environment::*;
pub use status::*;

use serde::{Deserialize, Serialize};

/// Control regime deciding whose intent governs the commanded position.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// The decision engine drives the window
    #[default]
    Auto,
    /// Operator pinned the window open
    ForceOpen,
    /// Operator pinned the window closed
    ForceClose,
}

impl Mode {
    pub fn forced(open: bool) -> Self {
        if open { Mode::ForceOpen } else { Mode::ForceClose }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Mode::Auto)
    }

    /// Position pinned by a manual mode, `None` in `Auto`.
    pub fn forced_position(&self) -> Option<bool> {
        match self {
            Mode::Auto => None,
            Mode::ForceOpen => Some(true),
            Mode::ForceClose => Some(false),
        }
    }
}
