//! CLI command implementations

pub mod fetch;
pub mod generate;
pub mod serve;
pub mod status;
pub mod wait;

use anyhow::{Context, Result};
use atelier_core::AssetKind;
use atelier_gen::{create_store, AssetStore, AtelierConfig};

/// Load layered config; `--mock` overrides whatever it says
pub(crate) fn load_config(force_mock: bool) -> Result<AtelierConfig> {
    let mut config = AtelierConfig::load().context("Failed to load Atelier config")?;
    if force_mock {
        config.use_mock = true;
    }
    Ok(config)
}

pub(crate) fn open_store(force_mock: bool) -> Result<Box<dyn AssetStore>> {
    let config = load_config(force_mock)?;
    Ok(create_store(&config)?)
}

pub(crate) fn parse_kind(kind: &str) -> Result<AssetKind> {
    AssetKind::parse(kind)
        .ok_or_else(|| anyhow::anyhow!("Unknown asset kind '{}'. Use: model, image", kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_accepts_aliases() {
        assert_eq!(parse_kind("model").unwrap(), AssetKind::Model);
        assert_eq!(parse_kind("glb").unwrap(), AssetKind::Model);
        assert_eq!(parse_kind("image").unwrap(), AssetKind::Image);
        assert!(parse_kind("audio").is_err());
    }

    #[test]
    fn test_mock_flag_overrides_config() {
        let config = load_config(true).unwrap();
        assert!(config.use_mock);
        assert_eq!(open_store(true).unwrap().name(), "mock");
    }
}
