//! Store selection
//!
//! The real and mock stores are chosen once, at startup, from the config.

pub mod generio;
pub mod mock;

use crate::config::AtelierConfig;
use crate::store::AssetStore;
use atelier_core::Result;

/// Create the store selected by `config.use_mock`.
///
/// Fails with a configuration error when live mode has no auth token.
pub fn create_store(config: &AtelierConfig) -> Result<Box<dyn AssetStore>> {
    if config.use_mock {
        tracing::info!("Using mock asset store; no upstream calls will be made");
        return Ok(Box::new(mock::MockStore::new()));
    }
    let store = generio::GenerioStore::from_config(config)?;
    tracing::info!(api_base = %config.api_base, "Using Generio asset store");
    Ok(Box::new(store))
}
