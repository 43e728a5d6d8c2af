use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use related_core::config::{expand_path, Settings};
use related_core::traits::DocumentFeed;
use related_core::{Document, Error, RawDocument, Result};
use related_simhash::{rank, try_rank, Corpus, CorpusBuilder, Rankings, RelatedSet, SimHasher};
use related_text::{Normalizer, Stopwords};

pub struct RelatedEngine {
	normalizer: Normalizer,
	hasher: SimHasher,
	k: usize,
	progress: bool,
	cancel: Option<Arc<AtomicBool>>,
}

impl RelatedEngine {
	pub fn new(normalizer: Normalizer, hasher: SimHasher, k: usize) -> Self {
		Self { normalizer, hasher, k, progress: false, cancel: None }
	}

	/// Built-in stopwords, extended by `stopwords.dir` when set.
	pub fn from_settings(settings: &Settings) -> Result<Self> {
		let mut stopwords = Stopwords::builtin();
		if let Some(dir) = &settings.stopwords.dir {
			stopwords = stopwords.load_dir(&expand_path(dir))?;
		}
		let hasher = SimHasher::new(settings.engine.seed, settings.engine.weighting);
		Ok(Self::new(Normalizer::new(stopwords)?, hasher, settings.length()))
	}

	pub fn with_progress(mut self, progress: bool) -> Self {
		self.progress = progress;
		self
	}

	/// Raising `flag` makes the running phase stop and return [`Error::Cancelled`].
	pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
		self.cancel = Some(flag);
		self
	}

	pub fn k(&self) -> usize {
		self.k
	}

	fn cancelled(&self) -> bool {
		self.cancel.as_deref().is_some_and(|flag| flag.load(Ordering::Relaxed))
	}

	/// Normalizer then fingerprinter. Metadata passes through untouched.
	pub fn fingerprint(&self, raw: RawDocument) -> Document {
		let tokens = self.normalizer.normalize(&raw.content, &raw.lang);
		let fingerprint = self.hasher.fingerprint(&tokens);
		tracing::debug!(source = %raw.source, tokens = tokens.len(), %fingerprint, "fingerprinted");
		Document { id: raw.id, source: raw.source, fingerprint, meta: raw.meta }
	}

	/// Fingerprints in parallel, then a single owner fills the store.
	/// A repeated id keeps its first occurrence.
	pub fn ingest(&self, docs: Vec<RawDocument>) -> Result<Corpus> {
		let start = Instant::now();
		let pb = self.progress_bar(docs.len());
		let fingerprinted = docs
			.into_par_iter()
			.progress_with(pb.clone())
			.map(|raw| if self.cancelled() { Err(Error::Cancelled) } else { Ok(self.fingerprint(raw)) })
			.collect::<Result<Vec<_>>>();
		pb.finish_and_clear();
		let fingerprinted = fingerprinted?;

		let mut builder = CorpusBuilder::new();
		for doc in fingerprinted {
			let source = doc.source.clone();
			match builder.insert(doc) {
				Ok(()) => {}
				Err(Error::DuplicateDocument(id)) => tracing::warn!(%id, source = %source, "duplicate document, keeping the first"),
				Err(e) => return Err(e),
			}
		}
		tracing::info!(documents = builder.len(), elapsed = ?start.elapsed(), "ingestion complete");
		Ok(builder.freeze())
	}

	pub fn rank(&self, corpus: &Corpus) -> Result<Rankings> {
		let start = Instant::now();
		let rankings = match self.cancel.as_deref() {
			Some(flag) => try_rank(corpus, self.k, flag)?,
			None => rank(corpus, self.k),
		};
		tracing::info!(documents = corpus.len(), k = self.k, elapsed = ?start.elapsed(), "ranking complete");
		Ok(rankings)
	}

	/// Reads the feed, then ingests and ranks. Nothing is returned if the run is cancelled.
	pub fn run(&self, feed: &dyn DocumentFeed) -> Result<RelatedSet> {
		let start = Instant::now();
		let docs = feed.documents()?;
		tracing::info!(documents = docs.len(), elapsed = ?start.elapsed(), "reading complete");
		let corpus = self.ingest(docs)?;
		if corpus.is_empty() {
			tracing::warn!("no documents to rank");
		}
		let rankings = self.rank(&corpus)?;
		let set = corpus.attach(rankings);
		tracing::info!(elapsed = ?start.elapsed(), "total time");
		Ok(set)
	}

	/// Convenience for a single folder.
	pub fn run_folder(&self, root: &Path, pattern: &str, lang: &str) -> Result<RelatedSet> {
		let feed = related_core::feed::FolderFeed::new(root, pattern, lang)?;
		self.run(&feed)
	}

	fn progress_bar(&self, len: usize) -> ProgressBar {
		if !self.progress {
			return ProgressBar::hidden();
		}
		let pb = ProgressBar::new(len as u64);
		let style = ProgressStyle::default_bar()
			.template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%)")
			.map(|s| s.progress_chars("#>-"))
			.unwrap_or_else(|_| ProgressStyle::default_bar());
		pb.set_style(style);
		pb
	}
}
