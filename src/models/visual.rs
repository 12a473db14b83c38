use serde::{Deserialize, Serialize};

/// `code` value the visual service uses for success.
pub const SUCCESS_CODE: i64 = 10000;

/// Request body for the `CVProcess` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualRequest {
    pub req_key: String,
    pub prompt: String,
    pub binary_data_base64: Vec<String>,
    pub image_num: u32,
    pub strength: f64,
    pub seed: i64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_data_base64: Option<Vec<String>>,
}

impl VisualData {
    fn first_in(list: &Option<Vec<String>>) -> Option<&str> {
        list.as_ref()
            .and_then(|items| items.first())
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// `image_list` first, `binary_data_base64` second.
    pub fn first_image(&self) -> Option<&str> {
        Self::first_in(&self.image_list).or_else(|| Self::first_in(&self.binary_data_base64))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayError {
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

/// Gateway-level envelope returned when the request is rejected before it
/// reaches the model (bad signature, throttling, unknown action).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(rename = "RequestId", default)]
    pub request_id: Option<String>,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<GatewayError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_elapsed: Option<String>,
    #[serde(default)]
    pub data: Option<VisualData>,
    #[serde(
        rename = "ResponseMetadata",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response_metadata: Option<ResponseMetadata>,
}

impl VisualResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Vendor message, falling back to the gateway error when the body is an
    /// envelope-only rejection.
    pub fn error_message(&self) -> String {
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return message.to_string();
        }
        self.response_metadata
            .as_ref()
            .and_then(|meta| meta.error.as_ref())
            .map(|err| match (&err.code, &err.message) {
                (Some(code), Some(message)) => format!("{}: {}", code, message),
                (None, Some(message)) => message.clone(),
                (Some(code), None) => code.clone(),
                (None, None) => "unknown error".to_string(),
            })
            .unwrap_or_else(|| "unknown error".to_string())
    }

    pub fn first_image(&self) -> Option<&str> {
        self.data.as_ref().and_then(VisualData::first_image)
    }

    /// True when the body carries anything the relay can interpret.
    pub fn is_recognized(&self) -> bool {
        self.code != 0 || self.response_metadata.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_list_wins() {
        let response: VisualResponse = serde_json::from_value(json!({
            "code": 10000,
            "message": "Success",
            "data": {
                "image_list": ["from-list"],
                "binary_data_base64": ["from-binary"]
            }
        }))
        .unwrap();

        assert!(response.is_success());
        assert_eq!(response.first_image(), Some("from-list"));
    }

    #[test]
    fn test_binary_fallback() {
        let response: VisualResponse = serde_json::from_value(json!({
            "code": 10000,
            "data": { "image_list": [], "binary_data_base64": ["from-binary"] }
        }))
        .unwrap();

        assert_eq!(response.first_image(), Some("from-binary"));
    }

    #[test]
    fn test_no_image() {
        let response: VisualResponse = serde_json::from_value(json!({
            "code": 10000,
            "data": { "image_urls": null }
        }))
        .unwrap();

        assert_eq!(response.first_image(), None);
    }

    #[test]
    fn test_gateway_error_message() {
        let response: VisualResponse = serde_json::from_value(json!({
            "ResponseMetadata": {
                "RequestId": "2024",
                "Error": { "Code": "SignatureDoesNotMatch", "Message": "bad signature" }
            }
        }))
        .unwrap();

        assert!(!response.is_success());
        assert!(response.is_recognized());
        assert_eq!(
            response.error_message(),
            "SignatureDoesNotMatch: bad signature"
        );
    }
}
