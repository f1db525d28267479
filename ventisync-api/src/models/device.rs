use serde::{Deserialize, Serialize};

/// Locally measured conditions a device may piggyback on its report.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReading {
    pub temperature_c: f64,
    #[serde(default)]
    pub european_aqi: Option<u32>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRequest {
    /// Position the actuator last settled in
    pub reported_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<DeviceReading>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryResponse {
    /// Position the device must drive to next
    pub commanded_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_wire_format() {
        let request: TelemetryRequest = serde_json::from_str(
            r#"{"reportedOpen":true,"reading":{"temperatureC":21.5,"europeanAqi":12}}"#,
        )
        .unwrap();

        assert!(request.reported_open);
        assert_eq!(
            request.reading,
            Some(DeviceReading {
                temperature_c: 21.5,
                european_aqi: Some(12),
            })
        );

        let bare: TelemetryRequest = serde_json::from_str(r#"{"reportedOpen":false}"#).unwrap();
        assert!(bare.reading.is_none());

        let response = serde_json::to_string(&TelemetryResponse { commanded_open: true }).unwrap();
        assert_eq!(response, r#"{"commandedOpen":true}"#);
    }
}
