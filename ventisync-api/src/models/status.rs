use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Mode;

/// Read-only projection of the coordinator state for client applications.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Commanded position, the authoritative one
    pub is_open: bool,
    pub auto_mode: bool,
    /// Last time the commanded position or mode changed
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    pub mode: Mode,
    /// Position last confirmed by the device, advisory only
    pub reported_open: Option<bool>,
    pub device_online: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_device_contact: Option<OffsetDateTime>,
}
