//! In-memory TF-IDF document search: tokenization, document store, term
//! statistics, cosine scoring and ranking behind a thread-safe [`Engine`].

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod ranker;
pub mod scorer;
pub mod snippet;
pub mod tokenizer;

pub use config::{EngineConfig, IdfPolicy, RebuildPolicy, TfWeighting};
pub use document::{DocId, Document, DocumentStore};
pub use engine::{Engine, EngineStatus, IndexSnapshot, Readiness, SearchHit};
pub use error::{EngineError, Result};
pub use index::{build_index, TermStatisticsIndex, TermStats};
pub use ranker::{rank, RankOptions, ScoredResult};
pub use scorer::{similarity, vectorize, TfIdfVector};
