use std::fmt;
use std::str::FromStr;

/// Object store that receives published videos (`STORAGE_BACKEND`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    Local,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown storage backend '{0}', expected 's3' or 'local'")]
pub struct UnknownStorageBackend(String);

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::S3 => "s3",
            StorageBackend::Local => "local",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = UnknownStorageBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(UnknownStorageBackend(s.to_string())),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_storage_backend() {
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(" local ".parse::<StorageBackend>().unwrap(), StorageBackend::Local);

        let err = "gcs".parse::<StorageBackend>().unwrap_err();
        assert!(err.to_string().contains("'gcs'"));
    }

    #[test]
    fn test_default_is_s3() {
        assert_eq!(StorageBackend::default(), StorageBackend::S3);
        assert_eq!(StorageBackend::default().to_string(), "s3");
    }
}
