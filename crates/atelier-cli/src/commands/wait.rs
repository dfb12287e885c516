//! Wait command

use anyhow::Result;
use atelier_gen::{await_ready, BinaryProbe, PollPolicy, ReadyOutcome, StatusProbe};
use std::time::Duration;

use super::{open_store, parse_kind};

pub struct WaitArgs {
    pub id: String,
    pub attempts: Option<u32>,
    pub delay: Option<f64>,
    pub probe: String,
    pub kind: String,
    pub mock: bool,
}

impl WaitArgs {
    fn policy(&self) -> Result<PollPolicy> {
        let preset = if self.probe == "binary" {
            PollPolicy::binary_endpoint()
        } else {
            PollPolicy::status_endpoint()
        };
        let delay = match self.delay {
            Some(secs) => Duration::try_from_secs_f64(secs).map_err(|e| {
                anyhow::anyhow!("Invalid delay '{}'; expected seconds >= 0 ({})", secs, e)
            })?,
            None => preset.delay,
        };
        Ok(PollPolicy::new(self.attempts.unwrap_or(preset.max_attempts), delay))
    }
}

pub fn run(args: WaitArgs) -> Result<()> {
    let policy = args.policy()?;
    let store = open_store(args.mock)?;
    let store = store.as_ref();

    eprintln!(
        "Waiting for '{}' via {} probe (up to {} attempts, at most {:?} of sleeping)...",
        args.id,
        args.probe,
        policy.max_attempts,
        policy.total_delay()
    );

    let outcome: ReadyOutcome = if args.probe == "binary" {
        let kind = parse_kind(&args.kind)?;
        await_ready(&BinaryProbe::new(store, kind), &args.id, policy)
    } else {
        await_ready(&StatusProbe::new(store), &args.id, policy)
    };

    println!("{}", serde_json::to_string(&outcome)?);

    if outcome.ready {
        Ok(())
    } else if outcome.failed() {
        anyhow::bail!("Upstream reported generation failure for '{}'", args.id)
    } else {
        anyhow::bail!(
            "'{}' not ready after {} attempt(s)",
            args.id,
            outcome.attempts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(delay: Option<f64>) -> WaitArgs {
        WaitArgs {
            id: "mock-id".to_string(),
            attempts: Some(2),
            delay,
            probe: "status".to_string(),
            kind: "model".to_string(),
            mock: true,
        }
    }

    #[test]
    fn test_out_of_range_delay_is_an_error() {
        for delay in [1e30, -1.0, f64::NAN, f64::INFINITY] {
            let err = run(args(Some(delay))).unwrap_err();
            assert!(err.to_string().contains("Invalid delay"), "{}", err);
        }
    }

    #[test]
    fn test_policy_uses_presets_and_overrides() {
        let policy = args(Some(0.5)).policy().unwrap();
        assert_eq!(policy, PollPolicy::new(2, Duration::from_millis(500)));

        let mut defaults = args(None);
        defaults.attempts = None;
        defaults.probe = "binary".to_string();
        assert_eq!(defaults.policy().unwrap(), PollPolicy::binary_endpoint());
    }

    #[test]
    fn test_mock_asset_is_ready() {
        assert!(run(args(Some(0.0))).is_ok());
    }
}
