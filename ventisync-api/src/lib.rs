//! Wire contracts shared by the coordinator, the window device and client applications.

pub mod models;
