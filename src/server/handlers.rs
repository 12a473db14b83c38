use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures::{FutureExt, TryStreamExt};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use uuid::Uuid;

use crate::{
    error::{RelayError, Result},
    models::{GenerateResponse, GenerationRequest, Mode, UploadedImage},
    server::AppState,
    validation::{self, MAX_FILE_SIZE},
    volc,
};

const SINGLE_LABEL: &str = "Image";
const MAIN_LABEL: &str = "Person photo";
const STYLE_LABEL: &str = "Style reference image";
const MAX_TEXT_FIELD_SIZE: usize = 1024;

#[derive(Debug, Default)]
struct GenerateForm {
    main: Option<UploadedImage>,
    style: Option<UploadedImage>,
    mode: Option<String>,
}

/// `POST /generate`
pub async fn generate(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4().to_string();

    let outcome = AssertUnwindSafe(relay(state.get_ref(), payload, &request_id))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(result)) => {
            log::info!("[{}] Image generated successfully", request_id);
            Ok(HttpResponse::Ok().json(GenerateResponse { result }))
        }
        Ok(Err(err)) => {
            if err.is_client_error() {
                log::warn!("[{}] Rejected request: {}", request_id, err);
            } else {
                log::error!("[{}] Generation failed: {}", request_id, err);
            }
            Err(err)
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            log::error!("[{}] Handler crashed: {}", request_id, message);
            Err(RelayError::InternalError(message))
        }
    }
}

async fn relay(state: &AppState, payload: Multipart, request_id: &str) -> Result<String> {
    let form = read_form(payload).await?;

    log::info!("[{}] Received request:", request_id);
    for image in form.main.iter().chain(form.style.iter()) {
        log::info!(
            "  - {}: {} ({}, {} bytes)",
            image.label,
            image.display_name(),
            image.content_type,
            image.len()
        );
    }
    if let Some(mode) = &form.mode {
        log::info!("  - mode: {}", mode);
    }

    let main = form
        .main
        .ok_or_else(|| RelayError::ValidationError("No image file provided".into()))?;
    let mode = Mode::resolve(form.mode.as_deref(), form.style.is_some())?;
    if mode.needs_style_image() && form.style.is_none() {
        return Err(RelayError::ValidationError(format!(
            "{} is required for style mode",
            STYLE_LABEL
        )));
    }

    log::debug!("[{}] Mode: {}", request_id, mode);
    log::debug!("[{}] Content type: {}", request_id, main.content_type);
    if let Some(style) = &form.style {
        log::debug!(
            "[{}] Style image size: {} bytes (used for reference)",
            request_id,
            style.len()
        );
    }

    let request = GenerationRequest::new(mode, main.to_base64()).into_visual_request(&state.req_key);
    volc::generate_image(state.service.as_ref(), &request).await
}

async fn read_form(mut payload: Multipart) -> Result<GenerateForm> {
    let mut form = GenerateForm::default();

    while let Some(field) = payload.try_next().await? {
        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "file" => form.main = Some(read_image(field, SINGLE_LABEL).await?),
            "main_file" => form.main = Some(read_image(field, MAIN_LABEL).await?),
            "style_file" => form.style = Some(read_image(field, STYLE_LABEL).await?),
            "mode" => form.mode = Some(read_text(field).await?),
            other => {
                log::debug!("Ignoring form field '{}'", other);
                drain(field).await?;
            }
        }
    }

    Ok(form)
}

/// Format is checked before the body is read, size after.
async fn read_image(mut field: Field, label: &'static str) -> Result<UploadedImage> {
    let content_type = field.content_type().map(|mime| mime.essence_str().to_string());
    let filename = field
        .content_disposition()
        .get_filename()
        .map(str::to_string);

    validation::validate_format(content_type.as_deref(), label)?;

    let mut bytes = Vec::new();
    let mut total = 0usize;
    while let Some(chunk) = field.try_next().await? {
        total += chunk.len();
        if total <= MAX_FILE_SIZE {
            bytes.extend_from_slice(&chunk);
        }
    }
    validation::validate_size(total, label)?;

    Ok(UploadedImage {
        label,
        filename,
        content_type: content_type.unwrap_or_default(),
        bytes,
    })
}

async fn read_text(mut field: Field) -> Result<String> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if bytes.len() + chunk.len() > MAX_TEXT_FIELD_SIZE {
            return Err(RelayError::ValidationError(
                "mode exceeds 1KB limit".into(),
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes)
        .map_err(|_| RelayError::ValidationError("mode must be valid UTF-8 text".into()))
}

async fn drain(mut field: Field) -> Result<()> {
    while field.try_next().await?.is_some() {}
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Internal server error".to_string()
    }
}
