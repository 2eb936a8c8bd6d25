use bytes::Bytes;

/// Uploaded thumbnail image and its declared media type
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub data: Bytes,
    pub media_type: String,
}

impl Thumbnail {
    pub fn new(data: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    /// File extension implied by the media type (`image/png` -> `png`)
    pub fn extension(&self) -> &str {
        self.media_type
            .split(';')
            .next()
            .and_then(|mime| mime.trim().split('/').nth(1))
            .unwrap_or("bin")
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_media_type() {
        assert_eq!(Thumbnail::new(vec![1u8], "image/png").extension(), "png");
        assert_eq!(Thumbnail::new(vec![1u8], "image/jpeg").extension(), "jpeg");
        assert_eq!(
            Thumbnail::new(vec![1u8], "image/jpeg; charset=binary").extension(),
            "jpeg"
        );
        assert_eq!(Thumbnail::new(vec![1u8], "garbage").extension(), "bin");
    }
}
