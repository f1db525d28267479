mod location;
mod state;

pub use location::*;
pub use state::*;
