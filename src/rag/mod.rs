//! Retrieval-augmented generation pipeline.
//!
//! `store`/`sqlite` hold the durable vector index, `indexer` fills it from
//! the record store, `retriever` answers free-text queries with a bounded
//! context block.

pub mod indexer;
pub mod retriever;
pub mod sqlite;
pub mod store;

pub use indexer::{IndexOutcome, IndexingPipeline};
pub use retriever::{Retriever, NO_CONTEXT_SENTINEL};
pub use sqlite::SqliteVectorStore;
pub use store::{Collection, IndexedDocument, SearchHit, VectorStore};
