//! related-text
//!
//! Turns raw document bytes into the canonical token sequence the
//! fingerprinter consumes: markup stripped, whitespace collapsed, stopwords
//! removed, NFC-normalized, lowercased and split into words.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod normalize;
pub mod stopwords;

pub use normalize::Normalizer;
pub use stopwords::Stopwords;
