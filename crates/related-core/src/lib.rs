//! related-core
//!
//! Shared domain types, the error type, configuration loading and the input
//! feeds that turn a folder or a list of posts into raw documents.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod feed;
pub mod policy;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use types::{clamp_k, Document, DocumentId, FeatureWeighting, Fingerprint, Metadata, RawDocument, ScoredRef};
