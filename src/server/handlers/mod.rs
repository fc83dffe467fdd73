//! HTTP request handlers for the web server.

mod api;
mod upload;

// Re-export handlers for use by the router
pub use api::health;
pub use upload::{upload_image, IMAGE_FIELD};
