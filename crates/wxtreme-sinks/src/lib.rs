use anyhow::Result;
#[cfg(feature = "webhook")]
pub mod webhook;

use chrono::Utc;
use serde::Serialize;
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use wxtreme_core::{Publisher, Timestamp};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Archived<'a> {
    published_at: Timestamp,
    content: &'a str,
}

/// Appends each notification to `<dir>/notifications.jsonl`
pub struct FsSink {
    file: PathBuf,
}

impl FsSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        create_dir_all(dir)?;
        let file = dir.join("notifications.jsonl");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        &self.file
    }
}

#[async_trait::async_trait]
impl Publisher for FsSink {
    async fn publish(&mut self, text: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file)?;
        let line = serde_json::to_string(&Archived {
            published_at: Utc::now().timestamp_millis(),
            content: text,
        })?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        info!(file = %self.file.display(), "notification archived");
        Ok(())
    }
}

/// Prints notifications instead of sending them
#[derive(Debug, Default)]
pub struct StdoutPublisher;

#[async_trait::async_trait]
impl Publisher for StdoutPublisher {
    async fn publish(&mut self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }
}
