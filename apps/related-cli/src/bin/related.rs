use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use related_core::config::{expand_path, Config, Settings};
use related_core::feed::{FolderFeed, ListFeed};
use related_core::policy::ErrorAction;
use related_core::FeatureWeighting;
use related_engine::{write_posts_file, write_report, RelatedEngine};

/// Finds the related documents of every file of a folder, or of every post of
/// a Jekyll list, by comparing SimHash fingerprints of their content.
#[derive(Debug, Parser)]
#[command(name = "related", version)]
struct Cli {
    /// Extra TOML file merged over related.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input folder (folder mode)
    #[arg(long)]
    input: Option<String>,
    /// Regexp matching files to be added to the list
    #[arg(long)]
    extensions: Option<String>,
    /// Number of related files to be displayed
    #[arg(long, allow_negative_numbers = true)]
    length: Option<i64>,
    /// ISO 639-1 language code of the content
    #[arg(long)]
    lang: Option<String>,
    /// Path to the CSV list of posts (list mode)
    #[arg(long)]
    jekyll: Option<String>,
    /// Where list mode writes its JSON
    #[arg(long)]
    output: Option<String>,
    /// per-occurrence or distinct
    #[arg(long)]
    weighting: Option<FeatureWeighting>,
    /// abort, skip, log or keep-empty
    #[arg(long)]
    on_unreadable: Option<ErrorAction>,
    /// Directory of <lang>.txt stopword lists
    #[arg(long)]
    stopwords: Option<String>,
    /// Worker threads, 0 for one per core
    #[arg(long)]
    threads: Option<usize>,
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.input { settings.input.root = v.clone(); }
        if let Some(v) = &self.extensions { settings.input.pattern = v.clone(); }
        if let Some(v) = &self.jekyll { settings.input.list = Some(v.clone()); }
        if let Some(v) = self.length { settings.engine.length = v; }
        if let Some(v) = &self.lang { settings.engine.lang = v.clone(); }
        if let Some(v) = self.weighting { settings.engine.weighting = v; }
        if let Some(v) = self.threads { settings.engine.threads = v; }
        if let Some(v) = &self.stopwords { settings.stopwords.dir = Some(v.clone()); }
        if let Some(v) = self.on_unreadable { settings.errors.unreadable = v; }
        if let Some(v) = &self.output { settings.output.path = v.clone(); }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load_with(cli.config.as_deref()).context("Error loading config")?;
    let mut settings = config.settings().context("Error loading config")?;
    cli.apply(&mut settings);
    settings.validate().context("Invalid configuration")?;

    if settings.engine.threads > 0 {
        rayon::ThreadPoolBuilder::new().num_threads(settings.engine.threads).build_global()?;
    }
    let engine = RelatedEngine::from_settings(&settings)?.with_progress(!cli.no_progress);
    let lang = settings.engine.lang.as_str();

    match &settings.input.list {
        Some(list) => {
            tracing::info!(list = %list, "Analyzing a list of Jekyll posts...");
            let feed = ListFeed::new(expand_path(list), lang).with_policy(settings.errors);
            let set = engine.run(&feed)?;
            write_posts_file(&expand_path(&settings.output.path), &set)?;
        }
        None => {
            let root = expand_path(&settings.input.root);
            tracing::info!(root = %root.display(), k = engine.k(), "Reading and analyzing all input files...");
            let feed = FolderFeed::new(root, &settings.input.pattern, lang)?.with_policy(settings.errors);
            let set = engine.run(&feed)?;
            let mut out = io::stdout().lock();
            write_report(&mut out, &set)?;
            out.flush()?;
        }
    }
    Ok(())
}
