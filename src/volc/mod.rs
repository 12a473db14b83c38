pub mod image_client;
pub mod signer;

use async_trait::async_trait;

use crate::{
    error::{RelayError, Result},
    logger,
    models::{VisualRequest, VisualResponse},
};

pub use image_client::VisualClient;

/// Anything that can run a `CVProcess` call. The live implementation is
/// [`VisualClient`]; tests plug in stubs.
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn cv_process(&self, request: &VisualRequest) -> Result<VisualResponse>;
}

/// Runs one generation and reduces the vendor response to a base64 image.
pub async fn generate_image(service: &dyn ImageService, request: &VisualRequest) -> Result<String> {
    log::debug!("req_key: {}", request.req_key);
    log::debug!("Strength: {}", request.strength);
    for (idx, image) in request.binary_data_base64.iter().enumerate() {
        log::debug!("Input image {} size: {} chars", idx, image.len());
    }

    let response = {
        let _timer = logger::timer("visual API call");
        service.cv_process(request).await?
    };

    match serde_json::to_string_pretty(&response) {
        Ok(pretty) => log::debug!("Visual API response:\n{}", pretty),
        Err(e) => log::warn!("Could not render visual API response: {}", e),
    }

    if !response.is_success() {
        return Err(RelayError::VendorError(format!(
            "API Error: {}",
            response.error_message()
        )));
    }

    response
        .first_image()
        .map(str::to_string)
        .ok_or_else(|| RelayError::VendorError("No image data returned by API".into()))
}
