mod orientation;
mod thumbnail;
mod video;

pub use orientation::Orientation;
pub use thumbnail::Thumbnail;
pub use video::{CreateVideoRequest, Video};
