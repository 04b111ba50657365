use serde::Serialize;
use serde_json::Value;

use crate::index::IndexStore;
use crate::tokenizer::normalize;

/// One ranked result: the document, its accumulated TF-IDF score, the
/// matched chunks resolved to raw tokens, and the document's metadata
/// record when the store carries one.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub doc: String,
    pub score: f64,
    pub snippets: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

/// Rank the store's documents against a bag-of-terms query.
///
/// The query is stemmed with the same normalizer used at indexing time but
/// not stop-filtered. Per document and query term:
/// `IDF = ln(N / df)` when the term occurs anywhere in the corpus, else 0;
/// `TF` = number of distinct chunks containing the term in the document.
/// Chunk indices are collected as snippet candidates whenever `TF > 0`,
/// even for terms whose IDF is zero. Only documents with a positive total
/// score are returned, sorted descending by score; the sort is stable, so
/// ties keep document-id order. `limit` truncates the ranking; `None` means
/// unbounded. The store is never mutated.
pub fn search(store: &IndexStore, query: &str, limit: Option<usize>) -> Vec<SearchHit> {
    let terms = normalize(query, true);
    let n = store.num_docs() as f64;

    let mut hits: Vec<SearchHit> = Vec::new();
    for (doc, freqs) in &store.doc_freqs {
        let mut score = 0.0f64;
        let mut selected: Vec<usize> = Vec::new();

        for term in &terms {
            let idf = match store.inv_index.get(term) {
                Some(docs) => (n / docs.len() as f64).ln(),
                None => 0.0,
            };
            if let Some(chunk_ids) = freqs.get(term) {
                let tf = chunk_ids.len() as f64;
                selected.extend_from_slice(chunk_ids);
                score += tf * idf;
            }
        }

        if score > 0.0 {
            let snippets = resolve_snippets(store, doc, &selected);
            let info = store
                .doc_info
                .as_ref()
                .and_then(|m| m.get(doc))
                .cloned();
            hits.push(SearchHit {
                doc: doc.clone(),
                score,
                snippets,
                info,
            });
        }
    }

    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    if let Some(k) = limit {
        hits.truncate(k);
    }
    hits
}

/// Deduplicate candidate chunk indices preserving first-insertion order and
/// resolve each to its raw token chunk.
fn resolve_snippets(store: &IndexStore, doc: &str, selected: &[usize]) -> Vec<Vec<String>> {
    let chunks = store.doc_chunks.get(doc);
    let mut picked: Vec<usize> = Vec::new();
    for &idx in selected {
        if !picked.contains(&idx) {
            picked.push(idx);
        }
    }
    picked
        .into_iter()
        .filter_map(|idx| chunks.and_then(|c| c.get(idx)).cloned())
        .collect()
}
