use crate::config::TfWeighting;
use crate::index::TermStatisticsIndex;
use crate::tokenizer::TermFrequencies;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sparse TF-IDF weights for one document or query.
///
/// Weights are kept in term order so that dot products sum in the same order
/// whichever side drives the iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TfIdfVector {
    weights: BTreeMap<String, f32>,
    norm: f32,
}

impl TfIdfVector {
    pub fn from_weights(weights: BTreeMap<String, f32>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        Self { weights, norm }
    }

    pub fn get(&self, term: &str) -> Option<f32> {
        self.weights.get(term).copied()
    }

    pub fn weights(&self) -> &BTreeMap<String, f32> {
        &self.weights
    }

    pub fn norm(&self) -> f32 {
        self.norm
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.norm == 0.0
    }
}

/// Weight each term by `tf * idf`. Terms missing from the index are left out.
pub fn vectorize(tf: &TermFrequencies, index: &TermStatisticsIndex, weighting: TfWeighting) -> TfIdfVector {
    let weights = tf
        .iter()
        .filter_map(|(term, count)| {
            let idf = index.idf(term)?;
            Some((term.clone(), weighting.weight(*count) * idf))
        })
        .collect();
    TfIdfVector::from_weights(weights)
}

/// Cosine similarity with missing terms treated as zero. Returns `0.0` when
/// either side is all-zero.
pub fn similarity(a: &TfIdfVector, b: &TfIdfVector) -> f32 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f32 = small
        .weights
        .iter()
        .filter_map(|(term, w)| large.weights.get(term).map(|o| w * o))
        .sum();
    (dot / (a.norm * b.norm)).clamp(0.0, 1.0)
}
