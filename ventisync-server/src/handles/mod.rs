mod control_handle;
mod device_handle;
mod docs_handle;
mod environment_handle;
mod sse_handle;
mod status_handle;

pub use control_handle::*;
pub use device_handle::*;
pub use docs_handle::*;
pub use environment_handle::*;
pub use sse_handle::*;
pub use status_handle::*;
