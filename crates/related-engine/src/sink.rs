//! Output sinks: a flat text report and the `posts.json` tree consumed by
//! Jekyll templates.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use related_core::{Document, Error, Result};
use related_simhash::RelatedSet;

fn display_name(source: &str) -> String {
    Path::new(source).file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| source.to_string())
}

/// One block per document:
///
/// ```text
/// ---;File;a.html
/// Distance;File;12;b.html
/// ```
pub fn write_report<W: Write>(out: &mut W, set: &RelatedSet) -> io::Result<()> {
    for doc in set.iter() {
        writeln!(out, "---;File;{}", display_name(&doc.document.source))?;
        for entry in &doc.related {
            let name = set.target(entry).map(|t| display_name(&t.source)).unwrap_or_else(|| entry.target.to_string());
            writeln!(out, "Distance;File;{};{}", entry.score, name)?;
        }
    }
    Ok(())
}

/// A post as a Liquid template sees it. Field names follow the legacy file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Post {
    #[serde(rename = "URL")]
    pub url: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<Post>>,
}

impl Post {
    fn from_document(doc: &Document) -> Self {
        Self {
            url: doc.meta.url.clone().unwrap_or_default(),
            title: doc.meta.title.clone().unwrap_or_default(),
            description: doc.meta.description.clone().unwrap_or_default(),
            thumbnail: doc.meta.thumbnail.clone().unwrap_or_default(),
            score: None,
            related: None,
        }
    }
}

pub fn posts(set: &RelatedSet) -> Vec<Post> {
    set.iter()
        .map(|doc| {
            let related = doc
                .related
                .iter()
                .filter_map(|entry| set.target(entry).map(|t| Post { score: Some(entry.score), ..Post::from_document(t) }))
                .collect();
            Post { related: Some(related), ..Post::from_document(&doc.document) }
        })
        .collect()
}

/// Tab-indented JSON array of [`Post`]s.
pub fn write_posts_json<W: Write>(out: W, set: &RelatedSet) -> Result<()> {
    let mut ser = serde_json::Serializer::with_formatter(out, PrettyFormatter::with_indent(b"\t"));
    posts(set).serialize(&mut ser).map_err(|e| Error::Operation(format!("cannot serialize posts: {e}")))
}

pub fn write_posts_file(path: &Path, set: &RelatedSet) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_posts_json(&mut out, set)?;
    out.flush().map_err(|e| Error::io(path, e))?;
    tracing::info!(path = %path.display(), posts = set.len(), "posts written");
    Ok(())
}
