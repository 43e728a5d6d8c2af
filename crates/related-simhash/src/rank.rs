//! Top-K ranking over a frozen corpus.
//!
//! Every document is compared with every other one, so the cost is quadratic
//! in the corpus size. Lists are built in parallel, one per document, with no
//! shared mutable state.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use related_core::{Document, DocumentId, Error, Result, ScoredRef};

use crate::corpus::Corpus;
use crate::distance::distance;

/// Related lists keyed by the owning document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rankings(BTreeMap<DocumentId, Vec<ScoredRef>>);

impl Rankings {
    pub fn get(&self, id: &DocumentId) -> Option<&[ScoredRef]> {
        self.0.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn take(&mut self, id: &DocumentId) -> Option<Vec<ScoredRef>> {
        self.0.remove(id)
    }
}

impl FromIterator<(DocumentId, Vec<ScoredRef>)> for Rankings {
    fn from_iter<I: IntoIterator<Item = (DocumentId, Vec<ScoredRef>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Every document's `min(k, n - 1)` closest neighbours, ascending by
/// distance, ties broken by id.
pub fn rank(corpus: &Corpus, k: usize) -> Rankings {
    let docs = corpus.documents();
    let k = k.min(docs.len().saturating_sub(1));
    docs.par_iter().map(|doc| (doc.id.clone(), related_list(docs, doc, k))).collect::<Vec<_>>().into_iter().collect()
}

/// Like [`rank`], but gives up with [`Error::Cancelled`] once `cancel` is raised.
/// Lists computed before that are discarded.
pub fn try_rank(corpus: &Corpus, k: usize, cancel: &AtomicBool) -> Result<Rankings> {
    let docs = corpus.documents();
    let k = k.min(docs.len().saturating_sub(1));
    let lists = docs
        .par_iter()
        .map(|doc| {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
            Ok((doc.id.clone(), related_list(docs, doc, k)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(lists.into_iter().collect())
}

/// `k` must already be clamped to `docs.len() - 1`.
fn related_list(docs: &[Document], doc: &Document, k: usize) -> Vec<ScoredRef> {
    if k == 0 {
        return Vec::new();
    }
    let mut scored: Vec<(u32, &DocumentId)> =
        docs.iter().filter(|other| other.id != doc.id).map(|other| (distance(doc.fingerprint, other.fingerprint), &other.id)).collect();
    if k < scored.len() {
        scored.select_nth_unstable(k - 1);
        scored.truncate(k);
    }
    scored.sort_unstable();
    scored.into_iter().map(|(score, target)| ScoredRef { target: target.clone(), score }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusBuilder;
    use related_core::{Fingerprint, Metadata};

    fn corpus(fingerprints: &[(&str, u64)]) -> Corpus {
        let mut builder = CorpusBuilder::new();
        for (source, bits) in fingerprints {
            builder
                .insert(Document { id: DocumentId::from_source(source), source: source.to_string(), fingerprint: Fingerprint(*bits), meta: Metadata::default() })
                .unwrap();
        }
        builder.freeze()
    }

    #[test]
    fn partial_selection_matches_full_sort() {
        let fps: Vec<(String, u64)> = (0..40u64).map(|i| (format!("doc{i}"), i.wrapping_mul(0x9e37_79b9_7f4a_7c15))).collect();
        let refs: Vec<(&str, u64)> = fps.iter().map(|(s, b)| (s.as_str(), *b)).collect();
        let corpus = corpus(&refs);
        let full = rank(&corpus, 39);
        let top = rank(&corpus, 5);
        for doc in corpus.iter() {
            assert_eq!(top.get(&doc.id).unwrap(), &full.get(&doc.id).unwrap()[..5]);
        }
    }

    #[test]
    fn ties_break_on_id() {
        let corpus = corpus(&[("a", 0), ("b", 0b1), ("c", 0b10), ("d", 0b100)]);
        let rankings = rank(&corpus, 3);
        let a = rankings.get(&DocumentId::from_source("a")).unwrap();
        assert!(a.iter().all(|r| r.score == 1));
        let mut ids: Vec<&DocumentId> = a.iter().map(|r| &r.target).collect();
        let sorted = {
            let mut s = ids.clone();
            s.sort();
            s
        };
        assert_eq!(ids, sorted);
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn raised_cancel_flag_discards_everything() {
        let corpus = corpus(&[("a", 0), ("b", 1)]);
        let cancel = AtomicBool::new(true);
        assert!(matches!(try_rank(&corpus, 1, &cancel), Err(Error::Cancelled)));
        let go = AtomicBool::new(false);
        assert_eq!(try_rank(&corpus, 1, &go).unwrap(), rank(&corpus, 1));
    }
}
