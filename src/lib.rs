pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod server;
pub mod validation;
pub mod volc;

pub use config::{Config, ServerConfig, VolcConfig};
pub use error::{RelayError, Result};
pub use models::*;
pub use server::AppState;
pub use volc::{generate_image, ImageService, VisualClient};
