//! What to do when a feed hits a bad document.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorAction {
    /// Fail the whole run.
    Abort,
    /// Drop the document quietly.
    Skip,
    /// Drop the document with a warning.
    #[default]
    Log,
    /// Keep the document with empty content so it is still ranked.
    KeepEmpty,
}

impl std::str::FromStr for ErrorAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            "log" => Ok(Self::Log),
            "keep-empty" | "keep_empty" => Ok(Self::KeepEmpty),
            other => Err(Error::InvalidConfig(format!("unknown error action '{other}' (expected abort, skip, log or keep-empty)"))),
        }
    }
}

/// Outcome of applying an [`ErrorAction`] to one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Drop,
    KeepEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorPolicy {
    pub unreadable: ErrorAction,
    pub malformed_record: ErrorAction,
}

impl ErrorPolicy {
    /// Legacy behaviour: the first failure ends the run.
    pub fn strict() -> Self {
        Self { unreadable: ErrorAction::Abort, malformed_record: ErrorAction::Abort }
    }

    pub fn on_unreadable(&self, source: &str, err: Error) -> Result<Disposition> {
        apply(self.unreadable, source, err)
    }

    /// A malformed record has no content to keep, so `KeepEmpty` degrades to `Log`.
    pub fn on_malformed_record(&self, source: &str, err: Error) -> Result<Disposition> {
        let action = match self.malformed_record {
            ErrorAction::KeepEmpty => ErrorAction::Log,
            other => other,
        };
        apply(action, source, err)
    }
}

fn apply(action: ErrorAction, source: &str, err: Error) -> Result<Disposition> {
    match action {
        ErrorAction::Abort => Err(err),
        ErrorAction::Skip => {
            tracing::debug!(source, error = %err, "skipping document");
            Ok(Disposition::Drop)
        }
        ErrorAction::Log => {
            tracing::warn!(source, error = %err, "skipping document");
            Ok(Disposition::Drop)
        }
        ErrorAction::KeepEmpty => {
            tracing::warn!(source, error = %err, "keeping document with empty content");
            Ok(Disposition::KeepEmpty)
        }
    }
}
