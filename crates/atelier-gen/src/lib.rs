//! Atelier Gen - generative asset orchestration
//!
//! Wraps the Generio creative-asset API behind a pluggable [`AssetStore`]
//! (real or mock), composes its calls into one `generate` operation, polls
//! for readiness with bounded retries, and proxies finished previews.

pub mod config;
pub mod orchestrator;
pub mod poller;
pub mod proxy;
pub mod request;
pub mod store;
pub mod stores;

#[cfg(test)]
mod testing;

pub use config::AtelierConfig;
pub use orchestrator::Orchestrator;
pub use poller::{await_ready, BinaryProbe, PollPolicy, Readiness, ReadinessProbe, ReadyOutcome, StatusProbe};
pub use proxy::{proxy_binary, ProxiedBinary};
pub use request::{GenerationRequest, GenerationResult};
pub use store::{AssetStore, BinaryPayload, StatusSnapshot};
pub use stores::create_store;
