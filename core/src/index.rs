use crate::config::IdfPolicy;
use crate::document::Document;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TermStats {
    /// Number of documents containing the term at least once.
    pub df: u32,
    pub idf: f32,
}

/// Corpus-wide term statistics. Rebuilt from scratch on every corpus change.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TermStatisticsIndex {
    pub terms: HashMap<String, TermStats>,
    pub num_docs: u32,
    pub idf_policy: IdfPolicy,
}

impl TermStatisticsIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, term: &str) -> Option<&TermStats> {
        self.terms.get(term)
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.terms.get(term).map(|s| s.idf)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Count document frequencies over the corpus and derive IDF weights.
pub fn build_index<'a, I>(corpus: I, idf_policy: IdfPolicy) -> TermStatisticsIndex
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut df: HashMap<String, u32> = HashMap::new();
    let mut num_docs: u32 = 0;
    for doc in corpus {
        num_docs += 1;
        // term_frequencies keys are unique, so each doc counts once per term
        for term in doc.term_frequencies.keys() {
            *df.entry(term.clone()).or_insert(0) += 1;
        }
    }

    let terms = df
        .into_iter()
        .map(|(term, df_t)| {
            let idf = idf_policy.idf(num_docs as usize, df_t as usize);
            (term, TermStats { df: df_t, idf })
        })
        .collect();

    TermStatisticsIndex { terms, num_docs, idf_policy }
}
