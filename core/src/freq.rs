use crate::chunker::chunk;
use crate::index::{ChunkList, TermFreqs};
use crate::tokenizer::{is_stopword, normalize_pair};

/// Terms shorter than this never enter the frequency map.
const MIN_TERM_LEN: usize = 3;

/// The isolated result of indexing a single document: its term -> chunk-index
/// map and its raw token chunks. No shared state is touched while building
/// one of these, so documents can be processed in parallel.
#[derive(Debug, Clone)]
pub struct DocIndex {
    pub freqs: TermFreqs,
    pub chunks: ChunkList,
}

/// Run the full per-document pipeline: tokenize into aligned stemmed and raw
/// sequences, cut both into windows of `window` tokens, and accumulate the
/// frequency map over the stemmed chunks. The raw chunks are stored verbatim
/// for snippet display, stop words included.
pub fn index_document(text: &str, window: usize) -> DocIndex {
    let (stemmed, raw) = normalize_pair(text);
    let stemmed_chunks = chunk(&stemmed, window);
    let raw_chunks = chunk(&raw, window);
    DocIndex {
        freqs: build_frequencies(&stemmed_chunks),
        chunks: raw_chunks,
    }
}

/// Accumulate term -> chunk-index lists over stemmed chunks.
///
/// Short terms and stop words are skipped. Each list records which chunks
/// contain the term, not how often it occurs: a chunk index is appended at
/// most once, so the lists are strictly increasing.
pub fn build_frequencies(stemmed_chunks: &[Vec<String>]) -> TermFreqs {
    let mut freqs = TermFreqs::new();
    for (chunk_no, tokens) in stemmed_chunks.iter().enumerate() {
        for term in tokens {
            if term.len() < MIN_TERM_LEN || is_stopword(term) {
                continue;
            }
            let entries = freqs.entry(term.clone()).or_default();
            // chunk_no only ever grows, so checking the tail suffices
            if entries.last() != Some(&chunk_no) {
                entries.push(chunk_no);
            }
        }
    }
    freqs
}
