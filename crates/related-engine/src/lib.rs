//! related-engine
//!
//! Runs the two phases of a related-documents computation (parallel
//! fingerprinting into a corpus store, then parallel ranking over the frozen
//! store) and renders the result as a flat report or a site-generator tree.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod engine;
pub mod sink;

pub use engine::RelatedEngine;
pub use sink::{posts, write_posts_file, write_posts_json, write_report, Post};
