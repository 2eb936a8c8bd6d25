use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Coarse three-bin classification of a video's width/height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// 16:9
    Landscape,
    /// 9:16
    Portrait,
    Other,
}

impl Orientation {
    /// Classify from pixel dimensions.
    ///
    /// The ratio is rounded to two decimals: `1.78` is landscape, `0.56` is
    /// portrait, everything else (including a zero height) is other.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if height == 0 {
            return Orientation::Other;
        }
        let hundredths = (f64::from(width) / f64::from(height) * 100.0).round() as u64;
        match hundredths {
            178 => Orientation::Landscape,
            56 => Orientation::Portrait,
            _ => Orientation::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
