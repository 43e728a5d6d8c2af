use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::TempDir;

use related_core::config::Settings;
use related_core::feed::ListFeed;
use related_core::policy::{ErrorAction, ErrorPolicy};
use related_core::{DocumentId, Error, FeatureWeighting, Fingerprint, Metadata, RawDocument};
use related_engine::RelatedEngine;
use related_simhash::{RelatedSet, SimHasher};
use related_text::{Normalizer, Stopwords};

fn engine(k: usize) -> RelatedEngine {
    RelatedEngine::new(Normalizer::new(Stopwords::builtin()).expect("normalizer"), SimHasher::default(), k)
}

fn scenario_a(lang: &str) -> Vec<RawDocument> {
    vec![
        RawDocument::new("A", "the cat sat on the mat", lang),
        RawDocument::new("B", "a cat sat on a mat", lang),
        RawDocument::new("C", "stock prices rose sharply today", lang),
    ]
}

fn ranked(set: &RelatedSet, source: &str) -> Vec<(String, u32)> {
    set.related_to(source, usize::MAX)
        .iter()
        .map(|r| (set.target(r).expect("target").source.clone(), r.score))
        .collect()
}

#[test]
fn overlapping_posts_rank_above_unrelated_ones() {
    let set = engine(2).run(&scenario_a("generic")).expect("run");
    assert_eq!(ranked(&set, "A"), vec![("B".to_string(), 22), ("C".to_string(), 36)]);
    assert_eq!(ranked(&set, "B"), vec![("A".to_string(), 22), ("C".to_string(), 34)]);
    assert_eq!(ranked(&set, "C"), vec![("B".to_string(), 34), ("A".to_string(), 36)]);
}

#[test]
fn stopword_removal_makes_paraphrases_identical() {
    let set = engine(2).run(&scenario_a("en")).expect("run");
    let a = ranked(&set, "A");
    assert_eq!(a[0], ("B".to_string(), 0));
    assert_eq!(a[1].0, "C");
}

#[test]
fn single_document_corpus_has_empty_list() {
    for k in [0, 1, 10] {
        let set = engine(k).run(&vec![RawDocument::new("only", "some words", "en")]).expect("run");
        assert_eq!(set.len(), 1);
        assert!(set.related_to("only", usize::MAX).is_empty());
    }
}

#[test]
fn identical_normalized_content_scores_zero() {
    let docs = vec![
        RawDocument::new("x.html", "<p>Hello   <b>World</b></p>", "en"),
        RawDocument::new("y.html", "hello world", "en"),
    ];
    let set = engine(1).run(&docs).expect("run");
    assert_eq!(ranked(&set, "x.html"), vec![("y.html".to_string(), 0)]);
}

#[test]
fn zero_k_processes_everything_without_lists() {
    let set = engine(0).run(&scenario_a("en")).expect("run");
    assert_eq!(set.len(), 3);
    assert!(set.iter().all(|d| d.related.is_empty()));
}

#[test]
fn oversized_k_is_clamped() {
    let set = engine(50).run(&scenario_a("en")).expect("run");
    assert!(set.iter().all(|d| d.related.len() == 2));
}

#[test]
fn empty_document_gets_empty_fingerprint_and_is_still_ranked() {
    let mut docs = scenario_a("generic");
    docs.push(RawDocument::new("E", "", "generic"));
    let set = engine(3).run(&docs).expect("run");

    let e = set.get(&DocumentId::from_source("E")).expect("E");
    assert_eq!(e.document.fingerprint, Fingerprint::EMPTY);
    assert_eq!(e.related.len(), 3);
    for doc in set.iter().filter(|d| d.document.source != "E") {
        let entry = doc.related.iter().find(|r| r.target == e.document.id).expect("E is listed");
        assert_eq!(entry.score, doc.document.fingerprint.bits().count_ones());
    }
}

#[test]
fn unreadable_post_kept_empty_by_policy() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.md"), "the cat sat on the mat").unwrap();
    fs::write(dir.join("b.md"), "a cat sat on a mat").unwrap();
    fs::write(dir.join("posts.csv"), "/a,a.md,A\n/b,b.md,B\n/gone,gone.md,Gone\n").unwrap();

    let policy = ErrorPolicy { unreadable: ErrorAction::KeepEmpty, ..ErrorPolicy::default() };
    let feed = ListFeed::new(dir.join("posts.csv"), "en").with_policy(policy);
    let set = engine(5).run(&feed).expect("run");
    assert_eq!(set.len(), 3);
    assert_eq!(set.get(&DocumentId::from_source("gone.md")).unwrap().document.fingerprint, Fingerprint::EMPTY);

    let strict = ListFeed::new(dir.join("posts.csv"), "en").with_policy(ErrorPolicy::strict());
    assert!(matches!(engine(5).run(&strict), Err(Error::Io { .. })));
}

#[test]
fn repeated_runs_are_identical() {
    let first = engine(2).run(&scenario_a("en")).expect("run");
    let second = engine(2).run(&scenario_a("en")).expect("run");
    let a: Vec<_> = first.iter().cloned().collect();
    let b: Vec<_> = second.iter().cloned().collect();
    assert_eq!(a, b);
}

#[test]
fn metadata_passes_through() {
    let meta = Metadata { url: Some("/a.html".into()), title: Some("A".into()), description: None, thumbnail: Some("a.png".into()) };
    let docs = vec![RawDocument::new("a.md", "alpha", "en").with_meta(meta.clone()), RawDocument::new("b.md", "beta", "en")];
    let set = engine(1).run(&docs).expect("run");
    assert_eq!(set.get(&DocumentId::from_source("a.md")).unwrap().document.meta, meta);
}

#[test]
fn duplicate_sources_keep_the_first() {
    let docs = vec![RawDocument::new("a.md", "first text", "en"), RawDocument::new("a.md", "second text", "en"), RawDocument::new("b.md", "other", "en")];
    let set = engine(1).run(&docs).expect("run");
    assert_eq!(set.len(), 2);
    let hasher = SimHasher::default();
    let expected = hasher.fingerprint(&["first", "text"]);
    assert_eq!(set.get(&DocumentId::from_source("a.md")).unwrap().document.fingerprint, expected);
}

#[test]
fn cancelled_run_returns_nothing() {
    let flag = Arc::new(AtomicBool::new(true));
    let result = engine(2).with_cancel(flag).run(&scenario_a("en"));
    assert!(matches!(result, Err(Error::Cancelled)));
}

#[test]
fn settings_select_weighting_and_length() {
    let mut settings = Settings::default();
    settings.engine.length = 1;
    settings.engine.weighting = FeatureWeighting::Distinct;
    let engine = RelatedEngine::from_settings(&settings).expect("engine");
    assert_eq!(engine.k(), 1);
    let set = engine.run(&scenario_a("generic")).expect("run");
    assert!(set.iter().all(|d| d.related.len() == 1));
    assert_eq!(ranked(&set, "A"), vec![("B".to_string(), 11)]);
}

#[test]
fn folder_run_reads_matching_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.html"), "<p>the cat sat on the mat</p>").unwrap();
    fs::write(tmp.path().join("b.html"), "<p>a cat sat on a mat</p>").unwrap();
    fs::write(tmp.path().join("c.txt"), "ignored").unwrap();
    let set = engine(5).run_folder(tmp.path(), r".*\.html", "en").expect("run");
    assert_eq!(set.len(), 2);
    assert!(set.iter().all(|d| d.related.len() == 1 && d.related[0].score == 0));
}
