//! Request bodies sent to the gateway

use serde::Serialize;

/// Body of `POST /nodes/{nodeId}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub ip_address: String,
    pub hardware_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_field_names() {
        let request = RegisterRequest {
            ip_address: "1.2.3.4".to_string(),
            hardware_id: "xyz".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"ipAddress": "1.2.3.4", "hardwareId": "xyz"})
        );
    }
}
