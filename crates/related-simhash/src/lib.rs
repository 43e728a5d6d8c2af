//! related-simhash
//!
//! SimHash fingerprints, Hamming distance, the in-memory corpus store and the
//! top-K ranker that turns a frozen corpus into related lists.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod corpus;
pub mod distance;
pub mod fingerprint;
pub mod rank;

pub use corpus::{Corpus, CorpusBuilder, RelatedDocument, RelatedSet};
pub use distance::distance;
pub use fingerprint::SimHasher;
pub use rank::{rank, try_rank, Rankings};
