use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    config::{VolcConfig, CV_PROCESS_ACTION, CV_PROCESS_VERSION},
    error::{RelayError, Result},
    models::{VisualRequest, VisualResponse},
    volc::{
        signer::{canonical_query, Credentials, CONTENT_TYPE},
        ImageService,
    },
};

/// Signed HTTPS client for the visual service's `CVProcess` action.
#[derive(Clone)]
pub struct VisualClient {
    client: Client,
    credentials: Credentials,
    host: String,
}

impl VisualClient {
    pub fn new(config: &VolcConfig) -> Result<Self> {
        let access_key = config
            .access_key
            .clone()
            .ok_or_else(|| RelayError::ConfigError("VOLC_AK is not set".into()))?;
        let secret_key = config
            .secret_key
            .clone()
            .ok_or_else(|| RelayError::ConfigError("VOLC_SK is not set".into()))?;

        let client = Client::builder()
            .build()
            .map_err(|e| RelayError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            credentials: Credentials {
                access_key,
                secret_key,
                region: config.region.clone(),
                service: config.service.clone(),
            },
            host: config.host.clone(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

#[async_trait]
impl ImageService for VisualClient {
    async fn cv_process(&self, request: &VisualRequest) -> Result<VisualResponse> {
        let query = canonical_query(&[
            ("Action", CV_PROCESS_ACTION),
            ("Version", CV_PROCESS_VERSION),
        ]);
        let body = serde_json::to_vec(request)
            .map_err(|e| RelayError::SerializationError(e.to_string()))?;

        let signed = self
            .credentials
            .sign(&self.host, &query, &body, chrono::Utc::now());

        log::info!(
            "Calling {} {} with req_key: {}",
            self.host,
            CV_PROCESS_ACTION,
            request.req_key
        );

        let response = self
            .client
            .post(format!("https://{}/?{}", self.host, query))
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Date", &signed.x_date)
            .header("X-Content-Sha256", &signed.x_content_sha256)
            .header("Authorization", &signed.authorization)
            .body(body)
            .send()
            .await
            .map_err(|e| RelayError::RequestError(e.to_string()))?;

        let status = response.status();
        let response_str = response
            .text()
            .await
            .map_err(|e| RelayError::ResponseError(e.to_string()))?;

        decode_response(status, &response_str)
    }
}

/// Maps the HTTP status and body of a `CVProcess` reply to a vendor response.
/// Rejections still come back as JSON envelopes with a non-2xx status.
pub fn decode_response(status: StatusCode, body: &str) -> Result<VisualResponse> {
    match serde_json::from_str::<VisualResponse>(body) {
        Ok(parsed) if status.is_success() || parsed.is_recognized() => Ok(parsed),
        Err(e) if status.is_success() => Err(RelayError::ResponseError(format!(
            "Failed to decode visual API response: {}",
            e
        ))),
        _ => Err(RelayError::ResponseError(format!(
            "Visual API returned HTTP {}: {}",
            status, body
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenerationRequest, Mode};
    use crate::volc::{generate_image, tests::StubService};

    #[test]
    fn test_new_requires_credentials() {
        let err = VisualClient::new(&VolcConfig::new()).err().unwrap();
        assert_eq!(err.to_string(), "Configuration error: VOLC_AK is not set");

        let config = VolcConfig {
            access_key: Some("AKLTtest".into()),
            ..VolcConfig::new()
        };
        let err = VisualClient::new(&config).err().unwrap();
        assert_eq!(err.to_string(), "Configuration error: VOLC_SK is not set");
    }

    #[test]
    fn test_new_with_credentials() {
        let config = VolcConfig::new()
            .with_credentials("AKLTtest", "secret")
            .with_host("visual.example.test");
        let client = VisualClient::new(&config).unwrap();
        assert_eq!(client.host(), "visual.example.test");
    }

    #[test]
    fn test_decode_success_body() {
        let body = r#"{"code":10000,"message":"Success","data":{"image_list":["abc"]}}"#;
        let response = decode_response(StatusCode::OK, body).unwrap();
        assert!(response.is_success());
        assert_eq!(response.first_image(), Some("abc"));
    }

    #[test]
    fn test_decode_undecodable_success_body() {
        let err = decode_response(StatusCode::OK, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, RelayError::ResponseError(_)));
        assert!(err
            .to_string()
            .starts_with("Failed to decode visual API response:"));
    }

    #[test]
    fn test_decode_non_json_error_status() {
        let err = decode_response(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Visual API returned HTTP 502 Bad Gateway: upstream down"
        );
    }

    #[test]
    fn test_decode_unrecognized_json_error_status() {
        let err = decode_response(StatusCode::FORBIDDEN, "{}").unwrap_err();
        assert_eq!(err.to_string(), "Visual API returned HTTP 403 Forbidden: {}");
    }

    #[tokio::test]
    async fn test_gateway_envelope_becomes_vendor_error() {
        let body = r#"{"ResponseMetadata":{"RequestId":"r1","Action":"CVProcess",
            "Error":{"Code":"SignatureDoesNotMatch","Message":"signature mismatch"}}}"#;
        let decoded = decode_response(StatusCode::UNAUTHORIZED, body);
        assert!(decoded.is_ok());

        let stub = StubService::returning(decoded);
        let request = GenerationRequest::new(Mode::Portrait, "aGVsbG8=".into())
            .into_visual_request("jimeng_t2i_v40");
        let err = generate_image(&stub, &request).await.unwrap_err();

        assert!(matches!(err, RelayError::VendorError(_)));
        assert_eq!(
            err.to_string(),
            "API Error: SignatureDoesNotMatch: signature mismatch"
        );
    }
}
