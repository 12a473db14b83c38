use crate::error::{RelayError, Result};

pub const ALLOWED_FORMATS: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/jpg"];
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Checks the declared content type against the allow-set.
pub fn validate_format(content_type: Option<&str>, label: &str) -> Result<()> {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .unwrap_or_default();

    if ALLOWED_FORMATS.contains(&declared.as_str()) {
        Ok(())
    } else {
        Err(RelayError::ValidationError(format!(
            "{} format not supported. Allowed formats: jpg, png, webp",
            label
        )))
    }
}

pub fn validate_size(len: usize, label: &str) -> Result<()> {
    if len > MAX_FILE_SIZE {
        return Err(RelayError::ValidationError(format!(
            "{} size exceeds 10MB limit",
            label
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_formats() {
        for ct in ["image/jpeg", "image/png", "image/webp", "image/jpg", "IMAGE/PNG"] {
            assert!(validate_format(Some(ct), "Person photo").is_ok(), "{}", ct);
        }
    }

    #[test]
    fn test_rejected_formats() {
        for ct in [Some("image/gif"), Some("application/pdf"), Some(""), None] {
            let err = validate_format(ct, "Style reference image").unwrap_err();
            assert!(err.is_client_error());
            assert_eq!(
                err.to_string(),
                "Style reference image format not supported. Allowed formats: jpg, png, webp"
            );
        }
    }

    #[test]
    fn test_size_ceiling() {
        assert!(validate_size(0, "Person photo").is_ok());
        assert!(validate_size(MAX_FILE_SIZE, "Person photo").is_ok());

        let err = validate_size(MAX_FILE_SIZE + 1, "Person photo").unwrap_err();
        assert_eq!(err.to_string(), "Person photo size exceeds 10MB limit");
    }
}
