// Sparse binary image storage.

pub mod image;
pub mod raw;

pub use image::{Image, ImageError};
pub use raw::RawBuffer;
