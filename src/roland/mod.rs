pub mod constants;
pub mod disk;
pub mod error;
pub mod image;
pub mod models;
pub mod program;
pub mod sample;
pub mod types;

pub use image::{is_roland_image, open_image};
