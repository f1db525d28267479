mod arbiter_service;
mod cache_service;
mod decision_service;
mod scheduler;
mod session_service;
mod weather_service;

pub use arbiter_service::*;
pub use cache_service::*;
pub use decision_service::*;
pub use scheduler::*;
pub use session_service::*;
pub use weather_service::*;
