pub mod charmap;
pub mod constants;
pub mod error;
pub mod image;
pub mod models;
pub mod program;
pub mod sample;
pub mod types;

pub use image::{akai_sanitizer, open_image, scan_partitions};
