//! Generation commands

use anyhow::{Context, Result};
use atelier_gen::{await_ready, GenerationRequest, Orchestrator, PollPolicy, StatusProbe};
use clap::Subcommand;
use std::sync::Arc;

use super::open_store;

#[derive(Subcommand)]
pub enum GenerateCommands {
    /// Generate an image from a text prompt
    Image {
        /// Description / prompt for generation
        #[arg(long, short)]
        prompt: String,

        /// Wait for the job to finish
        #[arg(long)]
        wait: bool,

        /// Use the mock store regardless of config
        #[arg(long)]
        mock: bool,
    },

    /// Generate a 3D model from a text prompt
    Model {
        /// Description / prompt for generation
        #[arg(long, short)]
        prompt: String,

        #[arg(long)]
        wait: bool,

        #[arg(long)]
        mock: bool,
    },

    /// Generate a 3D model from a sketch image
    Sketch {
        /// Path to the sketch image
        #[arg(long, short)]
        file: String,

        /// Optional text guidance
        #[arg(long, short)]
        prompt: Option<String>,

        #[arg(long)]
        wait: bool,

        #[arg(long)]
        mock: bool,
    },
}

pub fn run(cmd: GenerateCommands) -> Result<()> {
    let (request, wait, mock) = match cmd {
        GenerateCommands::Image { prompt, wait, mock } => {
            (GenerationRequest::TextToImage { prompt }, wait, mock)
        }
        GenerateCommands::Model { prompt, wait, mock } => {
            (GenerationRequest::TextToModel { prompt }, wait, mock)
        }
        GenerateCommands::Sketch {
            file,
            prompt,
            wait,
            mock,
        } => {
            let image_bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read sketch '{}'", file))?;
            (
                GenerationRequest::SketchToModel { image_bytes, prompt },
                wait,
                mock,
            )
        }
    };

    let store = open_store(mock)?;
    let orchestrator = Orchestrator::new(Arc::from(store));

    let result = orchestrator.generate(&request);
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.success {
        anyhow::bail!(
            "Generation failed: {}",
            result.error_message.as_deref().unwrap_or("unknown error")
        );
    }

    if wait {
        if let Some(id) = result.id.as_deref() {
            let policy = PollPolicy::status_endpoint();
            eprintln!(
                "Waiting for '{}' (up to {} attempts, {:?} apart, {:?} in total)...",
                id,
                policy.max_attempts,
                policy.delay,
                policy.total_delay()
            );
            let outcome = await_ready(&StatusProbe::new(orchestrator.store()), id, policy);
            if outcome.ready {
                eprintln!("Ready after {} attempt(s)", outcome.attempts);
            } else if outcome.failed() {
                anyhow::bail!("Upstream reported generation failure for '{}'", id);
            } else {
                anyhow::bail!(
                    "'{}' still not ready after {} attempt(s)",
                    id,
                    outcome.attempts
                );
            }
        }
    }

    Ok(())
}
