//! Atelier Core - Foundational types for the Atelier crates
//!
//! This crate provides the types every other Atelier crate depends on:
//! - `AssetKind`, `AssetStatus`, `Visibility`, `Asset` - the upstream asset model
//! - `ContentHash` - SHA-256 digests of fetched previews
//! - Error taxonomy and Result alias

mod error;
mod hash;
mod types;

pub use error::{AtelierError, Result};
pub use hash::ContentHash;
pub use types::{validate_asset_id, Asset, AssetId, AssetKind, AssetStatus, Visibility};
