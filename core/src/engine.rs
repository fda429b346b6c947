use crate::config::{EngineConfig, RebuildPolicy};
use crate::document::{DocId, Document, DocumentStore};
use crate::error::{EngineError, Result};
use crate::index::{build_index, TermStatisticsIndex};
use crate::ranker::{rank, RankOptions};
use crate::scorer::{vectorize, TfIdfVector};
use crate::snippet::snippet;
use crate::tokenizer::{decode, term_frequencies, Tokenizer};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// The index does not reflect the current corpus.
    Stale,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub document_count: usize,
    pub term_count: usize,
    pub is_ready: bool,
    /// Number of completed rebuilds.
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: DocId,
    pub score: f32,
    pub snippet: Option<String>,
}

/// A fully built index together with the cached document vectors it implies.
/// Searches hold an `Arc` to one of these, so a rebuild never disturbs them.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    pub index: TermStatisticsIndex,
    /// Sorted by identity.
    pub vectors: Vec<(Arc<Document>, TfIdfVector)>,
    pub generation: u64,
}

#[derive(Debug)]
struct EngineState {
    store: DocumentStore,
    snapshot: Arc<IndexSnapshot>,
    readiness: Readiness,
}

impl EngineState {
    fn ready_snapshot(&self) -> Result<Arc<IndexSnapshot>> {
        match self.readiness {
            Readiness::Ready => Ok(Arc::clone(&self.snapshot)),
            Readiness::Stale => Err(EngineError::NotReady),
        }
    }

    fn rebuild(&mut self, config: &EngineConfig) {
        let docs = self.store.list();
        let index = build_index(docs.iter().map(|d| d.as_ref()), config.idf);
        let vectors = docs
            .into_iter()
            .map(|doc| {
                let vector = vectorize(&doc.term_frequencies, &index, config.tf);
                (doc, vector)
            })
            .collect();
        let generation = self.snapshot.generation + 1;
        tracing::debug!(num_docs = index.num_docs, num_terms = index.len(), generation, "index rebuilt");
        self.snapshot = Arc::new(IndexSnapshot { index, vectors, generation });
        self.readiness = Readiness::Ready;
    }

    fn after_mutation(&mut self, config: &EngineConfig) {
        self.readiness = Readiness::Stale;
        if config.rebuild == RebuildPolicy::Eager {
            self.rebuild(config);
        }
    }
}

/// In-memory TF-IDF search engine over a mutable corpus.
///
/// Mutations and rebuilds are serialized behind a write lock. Searches take a
/// snapshot of the last complete index under a read lock and score outside it.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    tokenizer: Tokenizer,
    state: RwLock<EngineState>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let tokenizer = config.tokenizer();
        let state = EngineState {
            store: DocumentStore::new(),
            snapshot: Arc::new(IndexSnapshot::default()),
            readiness: Readiness::Ready,
        };
        Self { config, tokenizer, state: RwLock::new(state) }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Add a document from raw uploaded bytes.
    pub fn upload(&self, id: impl Into<DocId>, bytes: &[u8]) -> Result<Arc<Document>> {
        let id = id.into();
        let text = decode(bytes).map_err(|e| {
            tracing::warn!(%id, error = %e, "rejected upload");
            e
        })?;
        self.add_text(id, text)
    }

    /// Add an already-decoded document. Duplicate identities are rejected.
    pub fn add_text(&self, id: impl Into<DocId>, text: &str) -> Result<Arc<Document>> {
        // tokenize before taking the lock
        let doc = Document::new(id, text, &self.tokenizer);
        let mut state = self.state.write();
        let doc = state.store.add(doc)?;
        state.after_mutation(&self.config);
        tracing::info!(id = %doc.id, terms = doc.terms.len(), "document added");
        Ok(doc)
    }

    pub fn delete_document(&self, id: &str) -> Result<()> {
        let mut state = self.state.write();
        state.store.remove(id)?;
        state.after_mutation(&self.config);
        tracing::info!(%id, "document removed");
        Ok(())
    }

    pub fn clear_history(&self) {
        let mut state = self.state.write();
        let removed = state.store.clear();
        state.after_mutation(&self.config);
        tracing::info!(removed, "corpus cleared");
    }

    /// Bring the index up to date with the corpus. A no-op when already ready.
    pub fn rebuild(&self) -> EngineStatus {
        let mut state = self.state.write();
        if state.readiness == Readiness::Stale {
            state.rebuild(&self.config);
        }
        status_of(&state)
    }

    pub fn status(&self) -> EngineStatus {
        status_of(&self.state.read())
    }

    pub fn readiness(&self) -> Readiness {
        self.state.read().readiness
    }

    pub fn list_documents(&self) -> Vec<Arc<Document>> {
        self.state.read().store.list()
    }

    pub fn document(&self, id: &str) -> Result<Arc<Document>> {
        self.state
            .read()
            .store
            .get(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    /// The current complete index. Rebuilds first if the corpus moved on.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        match self.state.read().ready_snapshot() {
            Ok(snapshot) => return snapshot,
            Err(e) => tracing::debug!(error = %e, "rebuilding before search"),
        }
        let mut state = self.state.write();
        // another caller may have rebuilt while we waited
        if state.readiness == Readiness::Stale {
            state.rebuild(&self.config);
        }
        Arc::clone(&state.snapshot)
    }

    /// Vectorize a query against the current index.
    pub fn vectorize_query(&self, query: &str) -> TfIdfVector {
        let snapshot = self.snapshot();
        let terms = self.tokenizer.normalize(query);
        vectorize(&term_frequencies(&terms), &snapshot.index, self.config.tf)
    }

    /// Rank stored documents against free text. Never fails; an empty corpus
    /// or a query with no known terms yields no hits.
    pub fn search(&self, query: &str, top_k: Option<usize>) -> Vec<SearchHit> {
        let snapshot = self.snapshot();
        let terms = self.tokenizer.normalize(query);
        let query_vector = vectorize(&term_frequencies(&terms), &snapshot.index, self.config.tf);
        let opts = RankOptions {
            top_k: top_k.or(self.config.top_k),
            include_zero_scores: self.config.include_zero_scores,
        };
        let ranked = rank(&query_vector, snapshot.vectors.iter().map(|(doc, v)| (&doc.id, v)), opts);
        tracing::debug!(query, terms = terms.len(), hits = ranked.len(), generation = snapshot.generation, "search");

        // ranked ids come from the snapshot, which is sorted by id
        ranked
            .into_iter()
            .map(|r| {
                let excerpt = if self.config.snippets {
                    snapshot
                        .vectors
                        .binary_search_by(|(doc, _)| doc.id.cmp(&r.id))
                        .ok()
                        .and_then(|i| snippet(&snapshot.vectors[i].0.text, &terms, self.config.snippet_width))
                } else {
                    None
                };
                SearchHit { id: r.id, score: r.score, snippet: excerpt }
            })
            .collect()
    }

    /// End the engine's lifecycle, dropping the corpus and index.
    pub fn teardown(self) {
        let state = self.state.into_inner();
        tracing::debug!(documents = state.store.len(), "engine torn down");
    }
}

fn status_of(state: &EngineState) -> EngineStatus {
    EngineStatus {
        document_count: state.store.len(),
        term_count: state.snapshot.index.len(),
        is_ready: state.readiness == Readiness::Ready,
        generation: state.snapshot.generation,
    }
}
