use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-document map from term to the ordered, deduplicated list of chunk
/// indices containing that term. The list length doubles as the term
/// frequency; the indices locate snippets.
pub type TermFreqs = BTreeMap<String, Vec<usize>>;

/// A document's raw token chunks, in document order.
pub type ChunkList = Vec<Vec<String>>;

/// The complete, immutable output of one indexing run.
///
/// Invariants: `doc_chunks` and `doc_freqs` share exactly the same key set;
/// `inv_index` keys are the union of all per-document term keys; every doc id
/// listed under `inv_index[term]` carries `term` in its frequency map.
/// Ordered maps keep iteration, serialization, and score tie-breaking
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStore {
    pub doc_chunks: BTreeMap<String, ChunkList>,
    pub doc_freqs: BTreeMap<String, TermFreqs>,
    pub inv_index: BTreeMap<String, Vec<String>>,
    /// Present only when the index was built from metadata records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_info: Option<BTreeMap<String, Value>>,
}

impl IndexStore {
    pub fn num_docs(&self) -> usize {
        self.doc_freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_freqs.is_empty()
    }
}

/// Invert completed per-document frequency maps into a term -> doc-id map.
///
/// Doc ids are appended in the order documents are visited, each at most
/// once per term. This is the single sequential reduction step after all
/// per-document maps have been produced; it must never interleave with
/// per-document writes.
pub fn invert<'a, I>(docs: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = (&'a String, &'a TermFreqs)>,
{
    let mut inv: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (doc, freqs) in docs {
        for term in freqs.keys() {
            let list = inv.entry(term.clone()).or_default();
            if !list.contains(doc) {
                list.push(doc.clone());
            }
        }
    }
    inv
}
