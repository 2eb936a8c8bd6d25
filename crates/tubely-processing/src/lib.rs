//! Tubely Processing Library
//!
//! Media tooling used by the ingestion pipeline: aspect-ratio probing and
//! fast-start remuxing of staged videos, plus upload validation.
//!
//! Both media operations sit behind traits (`VideoProber`, `FastStartRemuxer`)
//! so the ffprobe/ffmpeg subprocess backends can be swapped in tests.

pub mod error;
pub mod traits;
pub mod validator;
pub mod video;

pub use error::ProcessingError;
pub use traits::{FastStartRemuxer, VideoProber};
pub use validator::{MediaValidator, ValidationError};
pub use video::{processed_path, FfmpegRemuxer, FfprobeProber};
