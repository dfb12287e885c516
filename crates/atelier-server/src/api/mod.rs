//! HTTP API handlers for atelier-server

pub mod assets;
pub mod error;
pub mod generate;
pub mod health;

pub use assets::{get_status, proxy_glb, proxy_image, wait_ready};
pub use error::ApiError;
pub use generate::{sketch_to_model, text_to_image, text_to_model};
pub use health::{health_routes, root};

use atelier_core::{AtelierError, Result};

/// Run a blocking store call on the blocking pool
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        AtelierError::Io(std::io::Error::other(format!("worker task failed: {}", e)))
    })?
}
