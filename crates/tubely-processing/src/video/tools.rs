//! Argument hygiene for media tool invocations

use crate::error::ProcessingError;
use std::path::{Path, PathBuf};

const DANGEROUS_CHARS: [char; 11] = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];

/// Validate that a path doesn't contain shell metacharacters or traversal sequences
pub(crate) fn validate_path(path: &str) -> Result<(), ProcessingError> {
    if path.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        return Err(ProcessingError::InvalidPath(format!(
            "Path contains dangerous characters: {}",
            path
        )));
    }

    if path.contains("..") {
        return Err(ProcessingError::InvalidPath(format!(
            "Path contains directory traversal: {}",
            path
        )));
    }

    Ok(())
}

/// Validate a configured tool binary (e.g. `ffmpeg`, `/usr/bin/ffprobe`)
pub(crate) fn validate_tool_path(tool_path: &str) -> Result<(), ProcessingError> {
    if tool_path.is_empty() {
        return Err(ProcessingError::InvalidPath("Tool path is empty".to_string()));
    }
    validate_path(tool_path)?;

    if !tool_path
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '\\'))
    {
        return Err(ProcessingError::InvalidPath(format!(
            "Tool path contains unsafe characters: {}",
            tool_path
        )));
    }

    Ok(())
}

/// Validate and canonicalize an input file path
pub(crate) fn canonical_input(path: &Path) -> Result<PathBuf, ProcessingError> {
    validate_path(&path.to_string_lossy())?;
    path.canonicalize().map_err(|e| {
        ProcessingError::InvalidPath(format!("Failed to resolve {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tool_path() {
        assert!(validate_tool_path("ffmpeg").is_ok());
        assert!(validate_tool_path("/usr/local/bin/ffprobe").is_ok());
        assert!(validate_tool_path("").is_err());
        assert!(validate_tool_path("ffmpeg; rm -rf /").is_err());
        assert!(validate_tool_path("$(whoami)").is_err());
        assert!(validate_tool_path("ff mpeg").is_err());
    }

    #[test]
    fn test_canonical_input_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mp4");
        assert!(matches!(
            canonical_input(&missing),
            Err(ProcessingError::InvalidPath(_))
        ));

        let present = dir.path().join("present.mp4");
        std::fs::write(&present, b"x").unwrap();
        assert!(canonical_input(&present).is_ok());
    }
}
