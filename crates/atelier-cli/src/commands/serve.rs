//! Serve command: run the HTTP service

use anyhow::{Context, Result};
use atelier_server::AppState;

use super::load_config;

pub fn run(bind: Option<String>, mock: bool) -> Result<()> {
    let config = load_config(mock)?;
    let state = AppState::from_config(&config)?;
    let addr = bind.unwrap_or_else(|| config.bind.clone());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime
        .block_on(atelier_server::serve(state, &addr))
        .with_context(|| format!("Server on {} stopped", addr))
}
