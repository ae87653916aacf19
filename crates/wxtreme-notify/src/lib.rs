//! Threshold-driven notification text
//!
//! Picks the situations today's summary qualifies for, renders their
//! templates, and drops content for metrics a deployment has disabled.

pub mod composer;
pub mod templates;
pub mod tokens;

pub use composer::*;
pub use templates::*;
pub use tokens::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Template file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid template table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No templates for language: {0}")]
    UnknownLanguage(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
