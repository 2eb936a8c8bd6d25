pub mod path;
pub mod upload;
