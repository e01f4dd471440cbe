pub mod cdda;
pub mod cue;
pub mod error;
pub mod mdf;
pub mod mdx;

pub use cdda::open_cdda_image;
pub use mdf::{is_mdf_image, unwrap_mdf};
pub use mdx::{is_mdx_image, unwrap_mdx};
