//! Scripted store for unit tests: records every call and replays queued answers

use crate::store::{AssetStore, BinaryPayload, StatusSnapshot};
use atelier_core::{AssetId, AssetKind, AssetStatus, AtelierError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub struct ScriptedStore {
    calls: Mutex<Vec<String>>,
    fail_upload: bool,
    fail_generate: bool,
    fail_share: bool,
    statuses: Mutex<VecDeque<Result<AssetStatus>>>,
    binaries: Mutex<VecDeque<Result<BinaryPayload>>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn failing_generate(mut self) -> Self {
        self.fail_generate = true;
        self
    }

    pub fn failing_share(mut self) -> Self {
        self.fail_share = true;
        self
    }

    /// Queue status answers, consumed one per `fetch_status`
    pub fn with_statuses(self, statuses: Vec<Result<AssetStatus>>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    /// Queue binary answers, consumed one per `fetch_binary`
    pub fn with_binaries(self, binaries: Vec<Result<BinaryPayload>>) -> Self {
        *self.binaries.lock().unwrap() = binaries.into();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn rejected(what: &str) -> AtelierError {
    AtelierError::UpstreamRejected {
        status: 500,
        body: format!("{} refused", what),
    }
}

impl AssetStore for ScriptedStore {
    fn name(&self) -> &str {
        "scripted"
    }

    fn upload_asset(&self, bytes: &[u8]) -> Result<AssetId> {
        self.record(format!("upload:{}", bytes.len()));
        if self.fail_upload {
            return Err(AtelierError::Transport("connection reset".to_string()));
        }
        Ok("upload-1".to_string())
    }

    fn generate_from_prompt(&self, kind: AssetKind, prompt: &str) -> Result<AssetId> {
        self.record(format!("generate:{}:{}", kind, prompt));
        if self.fail_generate {
            return Err(rejected("generate"));
        }
        Ok(format!("{}-1", kind))
    }

    fn generate_from_asset(&self, asset_id: &str, prompt: Option<&str>) -> Result<AssetId> {
        self.record(format!("from_asset:{}:{}", asset_id, prompt.unwrap_or("-")));
        if self.fail_generate {
            return Err(rejected("generate"));
        }
        Ok("model-1".to_string())
    }

    fn set_shared(&self, asset_id: &str) -> Result<()> {
        self.record(format!("share:{}", asset_id));
        if self.fail_share {
            return Err(rejected("share"));
        }
        Ok(())
    }

    fn fetch_status(&self, asset_id: &str) -> Result<StatusSnapshot> {
        self.record(format!("status:{}", asset_id));
        let next = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(AssetStatus::Pending));
        next.map(StatusSnapshot::new)
    }

    fn fetch_binary(&self, asset_id: &str, kind: AssetKind) -> Result<BinaryPayload> {
        self.record(format!("binary:{}:{}", asset_id, kind));
        self.binaries
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(AtelierError::UpstreamRejected {
                    status: 404,
                    body: "not found".to_string(),
                })
            })
    }

    fn preview_url(&self, asset_id: &str, kind: AssetKind, _prompt: Option<&str>) -> String {
        format!("https://scripted.test/{}.{}", asset_id, kind.preview_extension())
    }
}
