use crate::document::DocId;
use crate::scorer::{similarity, TfIdfVector};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub id: DocId,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankOptions {
    /// `None` keeps every result.
    pub top_k: Option<usize>,
    pub include_zero_scores: bool,
}

/// Score every document against the query and order the results by
/// descending score, then ascending identity.
pub fn rank<'a, I>(query: &TfIdfVector, documents: I, opts: RankOptions) -> Vec<ScoredResult>
where
    I: IntoIterator<Item = (&'a DocId, &'a TfIdfVector)>,
{
    let mut scored: Vec<ScoredResult> = documents
        .into_iter()
        .map(|(id, vector)| ScoredResult { id: id.clone(), score: similarity(query, vector) })
        .filter(|r| opts.include_zero_scores || r.score > 0.0)
        .collect();
    scored.sort_by(compare);
    if let Some(k) = opts.top_k {
        scored.truncate(k);
    }
    scored
}

fn compare(a: &ScoredResult, b: &ScoredResult) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}
