use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Open,
    Close,
}

impl ControlAction {
    pub fn is_open(&self) -> bool {
        matches!(self, ControlAction::Open)
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    /// Immediate manual position, switches to the matching forced mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ControlAction>,
    /// `true` hands control back to the decision engine, `false` pins the window where it is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_mode: Option<bool>,
}

impl ControlRequest {
    pub fn action(action: ControlAction) -> Self {
        Self {
            action: Some(action),
            auto_mode: None,
        }
    }

    pub fn auto_mode(enabled: bool) -> Self {
        Self {
            action: None,
            auto_mode: Some(enabled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_requests() {
        let request: ControlRequest = serde_json::from_str(r#"{"action":"open"}"#).unwrap();
        assert_eq!(request, ControlRequest::action(ControlAction::Open));

        let request: ControlRequest = serde_json::from_str(r#"{"autoMode":false}"#).unwrap();
        assert_eq!(request, ControlRequest::auto_mode(false));

        let request: ControlRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, ControlRequest::default());
    }

    #[test]
    fn test_reject_unknown_action() {
        assert!(serde_json::from_str::<ControlRequest>(r#"{"action":"toggle"}"#).is_err());
    }
}
