//! Fetch command: download a shared preview to disk

use anyhow::{Context, Result};
use atelier_gen::proxy_binary;

use super::{open_store, parse_kind};

pub fn run(id: &str, kind: &str, output: Option<&str>, mock: bool) -> Result<()> {
    let kind = parse_kind(kind)?;
    let store = open_store(mock)?;

    let binary = proxy_binary(store.as_ref(), id, kind)?;
    let path = output.unwrap_or(binary.file_name.as_str());

    std::fs::write(path, &binary.bytes)
        .with_context(|| format!("Failed to write '{}'", path))?;

    println!("Downloaded: {}", path);
    println!("  Type: {}", binary.content_type);
    println!("  Size: {} bytes", binary.bytes.len());
    println!("  Hash: {}", binary.content_hash().to_prefixed_hex());

    Ok(())
}
