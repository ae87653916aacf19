//! Canned payloads for dry runs and tests

use crate::{IngestError, IngestResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;
use wxtreme_core::{SourceFetcher, SourceKind};

/// Serves fixed JSON payloads instead of hitting the network
#[derive(Debug, Clone, Default)]
pub struct FixtureFetcher {
    payloads: HashMap<SourceKind, Value>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: SourceKind, payload: Value) -> Self {
        self.payloads.insert(kind, payload);
        self
    }

    /// Load `<kind>.json` for each source kind present in `dir`.
    ///
    /// Missing files are skipped and surface as fetch errors later.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> IngestResult<Self> {
        let dir = dir.as_ref();
        let mut fetcher = Self::new();

        for kind in SourceKind::ALL {
            let path = dir.join(format!("{kind}.json"));
            if !path.exists() {
                continue;
            }
            let raw = fs::read_to_string(&path)?;
            let payload = serde_json::from_str(&raw).map_err(|e| IngestError::Decode {
                kind,
                message: format!("{}: {e}", path.display()),
            })?;
            fetcher.payloads.insert(kind, payload);
        }

        info!(dir = %dir.display(), sources = fetcher.payloads.len(), "loaded fixtures");
        Ok(fetcher)
    }
}

#[async_trait::async_trait]
impl SourceFetcher for FixtureFetcher {
    async fn fetch(&self, kind: SourceKind) -> anyhow::Result<Value> {
        self.payloads
            .get(&kind)
            .cloned()
            .ok_or_else(|| IngestError::MissingSource(kind).into())
    }
}
