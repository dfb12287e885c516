//! Status command

use anyhow::Result;

use super::open_store;

pub fn run(id: &str, mock: bool) -> Result<()> {
    let store = open_store(mock)?;
    let snapshot = store.fetch_status(id)?;

    println!("Asset: {}", id);
    println!("  Status: {}", snapshot.status);
    if !snapshot.details.is_empty() {
        println!("  Details: {}", snapshot.details);
    }

    Ok(())
}
