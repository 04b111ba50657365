use anyhow::{ensure, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::freq::{index_document, DocIndex};
use crate::index::{invert, IndexStore};

/// Default context window size in tokens.
pub const DEFAULT_WINDOW: usize = 10;

#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Strip HTML markup before tokenizing.
    pub html: bool,
    /// Context window size in tokens, must be positive.
    pub window: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            html: false,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Names the record fields used by [`index_records`]: which field holds the
/// readable file path and which holds the document id.
#[derive(Debug, Clone)]
pub struct RecordConfig {
    pub path_field: String,
    pub link_field: String,
}

/// A per-document ingestion failure. The batch continues past these.
#[derive(Debug, Clone, Serialize)]
pub struct IngestError {
    pub path: String,
    pub reason: String,
}

/// Whatever was successfully indexed plus the per-document failures, so a
/// partial index is never mistaken for a complete one.
#[derive(Debug)]
pub struct IndexOutcome {
    pub store: IndexStore,
    pub errors: Vec<IngestError>,
}

struct DocSource {
    id: String,
    path: PathBuf,
    info: Option<Value>,
}

/// Index every file directly inside the given folders (non-recursive;
/// sub-directory entries are skipped, not descended into). Document ids take
/// the form `<lastFolderSegment>/<filename>`. Entries are processed in
/// sorted file-name order so the resulting index is deterministic.
///
/// Unreadable files or folders are collected as errors without aborting the
/// rest of the batch.
pub fn index_folders(folders: &[PathBuf], options: &IndexOptions) -> Result<IndexOutcome> {
    ensure!(options.window > 0, "window size must be positive");

    let mut sources: Vec<DocSource> = Vec::new();
    let mut errors: Vec<IngestError> = Vec::new();

    for folder in folders {
        tracing::info!(folder = %folder.display(), "processing folder");
        let segment = folder
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let entries = match fs::read_dir(folder) {
            Ok(rd) => rd,
            Err(e) => {
                errors.push(IngestError {
                    path: folder.display().to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        paths.sort();

        for path in paths {
            if path.is_dir() {
                continue;
            }
            let file_name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            sources.push(DocSource {
                id: format!("{segment}/{file_name}"),
                path,
                info: None,
            });
        }
    }

    Ok(run_pipeline(sources, errors, options, false))
}

/// Index the files named by a list of metadata records. The field named by
/// `config.path_field` locates the file; the value of `config.link_field`
/// becomes the document id, and the whole record is attached as that
/// document's metadata. Records with missing fields or unreadable paths are
/// collected as errors and excluded from the index.
pub fn index_records(
    records: &[Value],
    config: &RecordConfig,
    options: &IndexOptions,
) -> Result<IndexOutcome> {
    ensure!(options.window > 0, "window size must be positive");

    let mut sources: Vec<DocSource> = Vec::new();
    let mut errors: Vec<IngestError> = Vec::new();

    for record in records {
        let Some(path) = record.get(&config.path_field).and_then(Value::as_str) else {
            errors.push(IngestError {
                path: String::new(),
                reason: format!("record is missing field `{}`", config.path_field),
            });
            continue;
        };
        let Some(id) = record.get(&config.link_field).and_then(Value::as_str) else {
            errors.push(IngestError {
                path: path.to_string(),
                reason: format!("record is missing field `{}`", config.link_field),
            });
            continue;
        };
        sources.push(DocSource {
            id: id.to_string(),
            path: PathBuf::from(path),
            info: Some(record.clone()),
        });
    }

    Ok(run_pipeline(sources, errors, options, true))
}

/// Map then reduce: each document runs its tokenize -> chunk -> frequency
/// pipeline in isolation and in parallel; completed per-document results are
/// merged sequentially, and only then is the inverted index built over the
/// fully materialized set.
fn run_pipeline(
    sources: Vec<DocSource>,
    mut errors: Vec<IngestError>,
    options: &IndexOptions,
    with_info: bool,
) -> IndexOutcome {
    let results: Vec<Result<(DocSource, DocIndex), IngestError>> = sources
        .into_par_iter()
        .map(|src| {
            let text = read_source(&src.path, options.html).map_err(|e| IngestError {
                path: src.path.display().to_string(),
                reason: format!("{e:#}"),
            })?;
            let doc = index_document(&text, options.window);
            Ok((src, doc))
        })
        .collect();

    let mut store = IndexStore {
        doc_info: with_info.then(BTreeMap::new),
        ..IndexStore::default()
    };
    let mut order: Vec<String> = Vec::new();

    for result in results {
        match result {
            Ok((src, doc)) => {
                order.push(src.id.clone());
                store.doc_chunks.insert(src.id.clone(), doc.chunks);
                store.doc_freqs.insert(src.id.clone(), doc.freqs);
                if let (Some(info), Some(map)) = (src.info, store.doc_info.as_mut()) {
                    map.insert(src.id, info);
                }
            }
            Err(e) => {
                tracing::warn!(path = %e.path, reason = %e.reason, "document skipped");
                errors.push(e);
            }
        }
    }

    store.inv_index = invert(order.iter().filter_map(|id| store.doc_freqs.get_key_value(id)));
    tracing::info!(docs = store.num_docs(), errors = errors.len(), "indexing complete");
    IndexOutcome { store, errors }
}

fn read_source(path: &Path, html: bool) -> Result<String> {
    ensure!(!path.is_dir(), "expected a file, found a directory");
    let raw = fs::read_to_string(path).with_context(|| "reading file")?;
    Ok(if html { html_text(&raw) } else { raw })
}

/// Extract the text content of an HTML document: all markup removed, text
/// nodes joined by single spaces.
fn html_text(raw: &str) -> String {
    let doc = scraper::Html::parse_document(raw);
    doc.root_element().text().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_markup_is_stripped() {
        let text = html_text("<html><body><h1>Placebo</h1><p>near the <b>table</b></p></body></html>");
        assert!(text.contains("Placebo"));
        assert!(text.contains("table"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn zero_window_is_rejected() {
        let options = IndexOptions { html: false, window: 0 };
        assert!(index_folders(&[], &options).is_err());
        assert!(index_records(&[], &RecordConfig {
            path_field: "file_path".into(),
            link_field: "id".into(),
        }, &options).is_err());
    }

    #[test]
    fn record_missing_fields_become_errors() {
        let records = vec![serde_json::json!({"id": "1"})];
        let config = RecordConfig {
            path_field: "file_path".into(),
            link_field: "id".into(),
        };
        let outcome = index_records(&records, &config, &IndexOptions::default()).unwrap();
        assert!(outcome.store.is_empty());
        assert_eq!(outcome.errors.len(), 1);
    }
}
