//! ffprobe/ffmpeg subprocess backends

mod probe;
mod remux;
mod tools;

pub use probe::FfprobeProber;
pub use remux::{processed_path, FfmpegRemuxer};
