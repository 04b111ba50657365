use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::index::{ChunkList, IndexStore, TermFreqs};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: u32,
    pub num_docs: u32,
    pub created_at: String,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn doc_freqs(&self) -> PathBuf { self.root.join("doc_freqs.jsonl") }
    fn inv_index(&self) -> PathBuf { self.root.join("inv_index.jsonl") }
    fn doc_chunks(&self) -> PathBuf { self.root.join("doc_chunks.jsonl") }
    fn doc_info(&self) -> PathBuf { self.root.join("doc_info.jsonl") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

/// Serialize the store under the index root, one `[key, value]` JSON record
/// per line per map. `meta.json` is written last; a save interrupted midway
/// leaves no meta file and therefore never reloads.
pub fn save_store(paths: &IndexPaths, store: &IndexStore) -> Result<()> {
    create_dir_all(&paths.root)
        .with_context(|| format!("creating {}", paths.root.display()))?;
    save_entries(&paths.doc_freqs(), &store.doc_freqs)?;
    save_entries(&paths.inv_index(), &store.inv_index)?;
    save_entries(&paths.doc_chunks(), &store.doc_chunks)?;
    if let Some(info) = &store.doc_info {
        save_entries(&paths.doc_info(), info)?;
    }
    let meta = MetaFile {
        version: FORMAT_VERSION,
        num_docs: store.num_docs() as u32,
        created_at: now_rfc3339(),
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), docs = meta.num_docs, "index persisted");
    Ok(())
}

/// Reload a persisted store. Fails, returning no store at all, when any of
/// the three required maps is missing, a line is malformed, the meta version
/// is unknown, or structural validation fails.
pub fn load_store(paths: &IndexPaths) -> Result<IndexStore> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        bail!("unsupported index format version {}", meta.version);
    }
    let doc_freqs: BTreeMap<String, TermFreqs> = load_entries(&paths.doc_freqs())?;
    let inv_index: BTreeMap<String, Vec<String>> = load_entries(&paths.inv_index())?;
    let doc_chunks: BTreeMap<String, ChunkList> = load_entries(&paths.doc_chunks())?;
    let doc_info = if paths.doc_info().is_file() {
        Some(load_entries::<Value>(&paths.doc_info())?)
    } else {
        None
    };

    let store = IndexStore { doc_chunks, doc_freqs, inv_index, doc_info };
    validate(&store)?;
    tracing::info!(root = %paths.root.display(), docs = store.num_docs(), "index reloaded");
    Ok(store)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    let json = serde_json::to_string_pretty(meta)?;
    let mut f = File::create(paths.meta())
        .with_context(|| format!("creating {}", paths.meta().display()))?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let raw = std::fs::read_to_string(paths.meta())
        .with_context(|| format!("reading {}", paths.meta().display()))?;
    let meta: MetaFile = serde_json::from_str(&raw)?;
    Ok(meta)
}

fn save_entries<V: Serialize>(path: &Path, map: &BTreeMap<String, V>) -> Result<()> {
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for entry in map {
        serde_json::to_writer(&mut w, &entry)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

fn load_entries<V: DeserializeOwned>(path: &Path) -> Result<BTreeMap<String, V>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(f);
    let mut map = BTreeMap::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (key, value): (String, V) = serde_json::from_str(&line)
            .with_context(|| format!("malformed record in {}", path.display()))?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Structural checks over a reloaded store: the chunk and frequency maps
/// must agree on the document set, and every inverted-index entry must point
/// at a known document that actually carries the term.
fn validate(store: &IndexStore) -> Result<()> {
    if !store.doc_chunks.keys().eq(store.doc_freqs.keys()) {
        bail!("doc_chunks and doc_freqs disagree on the document set");
    }
    for (term, docs) in &store.inv_index {
        for doc in docs {
            let Some(freqs) = store.doc_freqs.get(doc) else {
                bail!("inverted index references unknown document `{doc}` under term `{term}`");
            };
            if !freqs.contains_key(term) {
                bail!("inverted index lists `{doc}` for term `{term}` but the document lacks it");
            }
        }
    }
    Ok(())
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
