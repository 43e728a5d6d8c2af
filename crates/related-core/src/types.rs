//! Domain types shared by the normalizer, the simhash engine and the sinks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a document: the BLAKE3 digest of its source key.
///
/// The source key is the file path for folder scans, or the path column of a
/// post list. Ids order lexicographically, which is what ranking tie-breaks on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn from_source(source: &str) -> Self {
        Self(blake3::hash(source.as_bytes()).to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 64-bit locality-sensitive hash of a document's token multiset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// Fingerprint of the empty token sequence.
    pub const EMPTY: Fingerprint = Fingerprint(0);

    pub fn bits(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Display fields threaded from input to output untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// What an input feed hands to the engine.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: DocumentId,
    pub source: String,
    pub content: Vec<u8>,
    pub lang: String,
    pub meta: Metadata,
}

impl RawDocument {
    /// Builds a document whose id is derived from `source`.
    pub fn new(source: impl Into<String>, content: impl Into<Vec<u8>>, lang: impl Into<String>) -> Self {
        let source = source.into();
        Self { id: DocumentId::from_source(&source), source, content: content.into(), lang: lang.into(), meta: Metadata::default() }
    }

    pub fn with_meta(mut self, meta: Metadata) -> Self {
        self.meta = meta;
        self
    }
}

/// A fingerprinted document as held by the corpus store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub source: String,
    pub fingerprint: Fingerprint,
    pub meta: Metadata,
}

/// Maps a signed result length to a list size. Negative lengths mean no results.
pub fn clamp_k(k: i64) -> usize {
    usize::try_from(k).unwrap_or(0)
}

/// One entry of a related list. Lower `score` means more related.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredRef {
    pub target: DocumentId,
    pub score: u32,
}

/// How repeated tokens contribute to a fingerprint. Fixed for a run: the two
/// policies produce different fingerprints for the same text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureWeighting {
    /// Every occurrence counts, so frequent words pull harder.
    #[default]
    PerOccurrence,
    /// Each distinct token counts once.
    Distinct,
}

impl std::str::FromStr for FeatureWeighting {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "per-occurrence" | "occurrence" => Ok(Self::PerOccurrence),
            "distinct" => Ok(Self::Distinct),
            other => Err(crate::error::Error::InvalidConfig(format!("unknown weighting '{other}' (expected per-occurrence or distinct)"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_negative_k() {
        assert_eq!(clamp_k(-3), 0);
        assert_eq!(clamp_k(0), 0);
        assert_eq!(clamp_k(7), 7);
    }
}
