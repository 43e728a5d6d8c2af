//! The corpus store.
//!
//! [`CorpusBuilder`] is written during ingestion by a single owner;
//! [`CorpusBuilder::freeze`] turns it into a read-only [`Corpus`] that ranking
//! workers share. [`Corpus::attach`] consumes the corpus, so every document
//! receives its related list exactly once.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use related_core::{Document, DocumentId, Error, Result, ScoredRef};

use crate::rank::Rankings;

#[derive(Debug, Default)]
pub struct CorpusBuilder {
    docs: BTreeMap<DocumentId, Document>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects a second document with an id already present; the first one stays.
    pub fn insert(&mut self, doc: Document) -> Result<()> {
        match self.docs.entry(doc.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(doc);
                Ok(())
            }
            Entry::Occupied(_) => Err(Error::DuplicateDocument(doc.id)),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn freeze(self) -> Corpus {
        Corpus { docs: self.docs.into_values().collect() }
    }
}

/// Frozen corpus, ordered by [`DocumentId`].
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    docs: Vec<Document>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.docs.binary_search_by(|d| d.id.cmp(id)).ok().map(|i| &self.docs[i])
    }

    /// Pairs every document with its ranked list. Documents missing from
    /// `rankings` get an empty list.
    pub fn attach(self, mut rankings: Rankings) -> RelatedSet {
        let docs = self
            .docs
            .into_iter()
            .map(|document| {
                let related = rankings.take(&document.id).unwrap_or_default();
                RelatedDocument { document, related }
            })
            .collect();
        RelatedSet { docs }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedDocument {
    pub document: Document,
    pub related: Vec<ScoredRef>,
}

/// Final result of a run: every document with its related list, in id order.
#[derive(Debug, Clone, Default)]
pub struct RelatedSet {
    docs: Vec<RelatedDocument>,
}

impl RelatedSet {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RelatedDocument> {
        self.docs.iter()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&RelatedDocument> {
        self.docs.binary_search_by(|d| d.document.id.cmp(id)).ok().map(|i| &self.docs[i])
    }

    /// Document a related entry points to.
    pub fn target(&self, entry: &ScoredRef) -> Option<&Document> {
        self.get(&entry.target).map(|d| &d.document)
    }

    /// The first `n` related entries of the document read from `source`.
    pub fn related_to(&self, source: &str, n: usize) -> &[ScoredRef] {
        match self.get(&DocumentId::from_source(source)) {
            Some(doc) => &doc.related[..n.min(doc.related.len())],
            None => &[],
        }
    }
}
