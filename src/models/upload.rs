use base64::{engine::general_purpose::STANDARD, Engine as _};

/// A file read out of the multipart form. Lives for one request only.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub label: &'static str,
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("<unnamed>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base64() {
        let image = UploadedImage {
            label: "Person photo",
            filename: Some("me.jpg".to_string()),
            content_type: "image/jpeg".to_string(),
            bytes: b"hello".to_vec(),
        };
        assert_eq!(image.to_base64(), "aGVsbG8=");
        assert_eq!(image.len(), 5);
        assert_eq!(image.display_name(), "me.jpg");
    }
}
