//! Chunked TF-IDF text indexing and ranked search.
//!
//! Documents are tokenized, cut into fixed-size context windows ("chunks"),
//! and accumulated into per-document frequency maps plus a corpus-wide
//! inverted index. Search scores documents with TF-IDF and returns the
//! matched chunks as snippets.

pub mod chunker;
pub mod freq;
pub mod index;
pub mod ingest;
pub mod persist;
pub mod search;
pub mod tokenizer;

pub use index::{ChunkList, IndexStore, TermFreqs};
pub use ingest::{IndexOptions, IndexOutcome, IngestError, RecordConfig};
pub use search::SearchHit;
