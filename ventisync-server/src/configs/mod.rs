mod settings;

pub use settings::{Cache, Decision, Device, Location, Logger, Server, Settings, Thresholds, Weather};
