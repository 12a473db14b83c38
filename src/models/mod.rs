pub mod common;
pub mod image;
pub mod upload;
pub mod visual;

pub use common::*;
pub use image::*;
pub use upload::*;
pub use visual::*;
