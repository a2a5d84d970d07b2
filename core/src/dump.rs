//! Loading documents from Wikipedia abstract dumps
//! (`enwiki-latest-abstract*.xml[.gz]`).

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{DocId, Document};

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "doc", default)]
    docs: Vec<RawDoc>,
}

#[derive(Debug, Deserialize)]
struct RawDoc {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "abstract", default)]
    text: String,
}

/// Parse a dump from `reader`, numbering documents from `first_id` in feed order.
pub fn read_documents<R: BufRead>(reader: R, first_id: DocId) -> Result<Vec<Document>> {
    let feed: Feed = quick_xml::de::from_reader(reader).context("malformed abstract dump")?;
    let mut out = Vec::with_capacity(feed.docs.len());
    for (offset, raw) in feed.docs.into_iter().enumerate() {
        let id = DocId::try_from(offset)
            .ok()
            .and_then(|o| first_id.checked_add(o))
            .context("document id overflow")?;
        out.push(Document { id, text: raw.text, title: raw.title, url: raw.url });
    }
    Ok(out)
}

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

fn is_dump_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    name.ends_with(".xml") || name.ends_with(".xml.gz")
}

/// Load one dump file, gunzipping it when the name ends in `.gz`.
pub fn load_file<P: AsRef<Path>>(path: P, first_id: DocId) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let parsed = if is_gzip(path) {
        read_documents(BufReader::new(GzDecoder::new(f)), first_id)
    } else {
        read_documents(BufReader::new(f), first_id)
    };
    let docs = parsed.with_context(|| format!("loading {}", path.display()))?;
    tracing::info!(path = %path.display(), count = docs.len(), "loaded dump");
    Ok(docs)
}

/// Load a single dump with ids starting at 0.
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    load_file(path, 0)
}

/// Load a dump file, or every `*.xml` / `*.xml.gz` under a directory in
/// sorted path order with ids continuing from file to file.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    if !path.is_dir() {
        return load_documents(path);
    }
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", path.display()))?;
        if entry.file_type().is_file() && is_dump_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    let mut docs = Vec::new();
    for file in files {
        let next_id = DocId::try_from(docs.len()).context("document id overflow")?;
        docs.extend(load_file(&file, next_id)?);
    }
    Ok(docs)
}
