use tubely_core::AppError;

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ValidationError::InvalidContentType { allowed, .. } => AppError::InvalidInput(
                format!("Invalid file type. Only {} accepted", allowed.join(", ")),
            ),
            ValidationError::EmptyFile => AppError::InvalidInput("Empty file".to_string()),
        }
    }
}

/// Size and media type rules for one kind of upload
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    /// Videos: `video/mp4` only
    pub fn video(max_file_size: usize) -> Self {
        Self::new(max_file_size, vec!["video/mp4".to_string()])
    }

    /// Thumbnails: PNG or JPEG
    pub fn thumbnail(max_file_size: usize) -> Self {
        Self::new(
            max_file_size,
            vec!["image/png".to_string(), "image/jpeg".to_string()],
        )
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate a declared media type.
    ///
    /// Parameters (`; charset=...`) are ignored and matching is case-insensitive.
    /// Returns the normalized essence on success.
    pub fn validate_content_type(&self, content_type: &str) -> Result<String, ValidationError> {
        let normalized = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if !self.allowed_content_types.iter().any(|ct| ct == &normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(normalized)
    }
}
