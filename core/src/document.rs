use crate::error::{EngineError, Result};
use crate::tokenizer::{term_frequencies, TermFrequencies, Tokenizer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Document identity. Usually the uploaded file name.
pub type DocId = String;

/// A stored document. Immutable once it is in the store.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: DocId,
    pub text: String,
    pub terms: Vec<String>,
    pub term_frequencies: TermFrequencies,
}

impl Document {
    pub fn new(id: impl Into<DocId>, text: impl Into<String>, tokenizer: &Tokenizer) -> Self {
        let text = text.into();
        let terms = tokenizer.normalize(&text);
        let term_frequencies = term_frequencies(&terms);
        Self { id: id.into(), text, terms, term_frequencies }
    }
}

/// The corpus, keyed by identity. Iteration is in ascending identity order.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: BTreeMap<DocId, Arc<Document>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document. An existing identity is never overwritten.
    pub fn add(&mut self, doc: Document) -> Result<Arc<Document>> {
        if self.docs.contains_key(&doc.id) {
            return Err(EngineError::DuplicateId(doc.id));
        }
        let doc = Arc::new(doc);
        self.docs.insert(doc.id.clone(), Arc::clone(&doc));
        Ok(doc)
    }

    pub fn remove(&mut self, id: &str) -> Result<Arc<Document>> {
        self.docs.remove(id).ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    /// Drop every document and return how many there were.
    pub fn clear(&mut self) -> usize {
        let n = self.docs.len();
        self.docs.clear();
        n
    }

    pub fn get(&self, id: &str) -> Option<Arc<Document>> {
        self.docs.get(id).cloned()
    }

    pub fn list(&self) -> Vec<Arc<Document>> {
        self.docs.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, text: &str) -> Document {
        Document::new(id, text, &Tokenizer::new())
    }

    #[test]
    fn duplicate_is_rejected_and_store_unchanged() {
        let mut store = DocumentStore::new();
        store.add(doc("a.txt", "first")).unwrap();
        let err = store.add(doc("a.txt", "second")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateId(ref id) if id == "a.txt"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a.txt").unwrap().text, "first");
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut store = DocumentStore::new();
        assert!(matches!(store.remove("nope"), Err(EngineError::NotFound(_))));
    }

    #[test]
    fn list_is_sorted_by_id() {
        let mut store = DocumentStore::new();
        store.add(doc("b", "x")).unwrap();
        store.add(doc("a", "y")).unwrap();
        let ids: Vec<_> = store.list().iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
    }
}
