//! SimHash (Charikar, 2002) over word tokens.
//!
//! Each feature is hashed with XXH64; every bit position keeps a signed
//! accumulator that gains the feature's weight when the bit is set and loses
//! it otherwise. Positive accumulators become 1 bits, zero and negative ones 0.

use std::collections::HashMap;
use std::hash::Hasher;
use twox_hash::XxHash64;

use related_core::{FeatureWeighting, Fingerprint};

#[derive(Debug, Clone, Copy, Default)]
pub struct SimHasher {
    seed: u64,
    weighting: FeatureWeighting,
}

impl SimHasher {
    pub fn new(seed: u64, weighting: FeatureWeighting) -> Self {
        Self { seed, weighting }
    }

    pub fn feature_hash(&self, token: &str) -> u64 {
        let mut hasher = XxHash64::with_seed(self.seed);
        hasher.write(token.as_bytes());
        hasher.finish()
    }

    /// Token order is irrelevant. No tokens gives [`Fingerprint::EMPTY`].
    pub fn fingerprint<S: AsRef<str>>(&self, tokens: &[S]) -> Fingerprint {
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for token in tokens {
            *counts.entry(token.as_ref()).or_insert(0) += 1;
        }

        let mut acc = [0i64; 64];
        for (token, count) in counts {
            let weight = match self.weighting {
                FeatureWeighting::PerOccurrence => count,
                FeatureWeighting::Distinct => 1,
            };
            let h = self.feature_hash(token);
            for (i, slot) in acc.iter_mut().enumerate() {
                if (h >> i) & 1 == 1 {
                    *slot += weight;
                } else {
                    *slot -= weight;
                }
            }
        }

        let mut bits = 0u64;
        for (i, &v) in acc.iter().enumerate() {
            if v > 0 {
                bits |= 1 << i;
            }
        }
        Fingerprint(bits)
    }
}
