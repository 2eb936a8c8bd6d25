use tubely_core::AppError;

/// Failures of the media tooling
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    /// The prober could not read dimensions (tool missing, non-zero exit, bad output)
    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    #[error("Remux failed: {0}")]
    RemuxFailed(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::ProbeFailed(msg) => AppError::ProbeFailed(msg),
            ProcessingError::RemuxFailed(msg) => AppError::RemuxFailed(msg),
            ProcessingError::InvalidPath(msg) => AppError::Internal(msg),
        }
    }
}
