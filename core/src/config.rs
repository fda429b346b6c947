use crate::tokenizer::{english_stopwords, Tokenizer};
use serde::{Deserialize, Serialize};

/// How inverse document frequency is computed from `N` and `df(t)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdfPolicy {
    /// `ln(N / df)`. A term in every document weighs zero.
    Plain,
    /// `ln(1 + N / df)`. Always positive.
    #[default]
    Smoothed,
}

impl IdfPolicy {
    pub fn idf(self, num_docs: usize, df: usize) -> f32 {
        if num_docs == 0 || df == 0 {
            return 0.0;
        }
        let ratio = num_docs as f32 / df as f32;
        match self {
            IdfPolicy::Plain => ratio.ln(),
            IdfPolicy::Smoothed => (1.0 + ratio).ln(),
        }
    }
}

/// Term-frequency component of a TF-IDF weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TfWeighting {
    /// Raw occurrence count.
    #[default]
    Raw,
    /// `1 + ln(tf)`.
    Sublinear,
}

impl TfWeighting {
    pub fn weight(self, tf: u32) -> f32 {
        if tf == 0 {
            return 0.0;
        }
        match self {
            TfWeighting::Raw => tf as f32,
            TfWeighting::Sublinear => 1.0 + (tf as f32).ln(),
        }
    }
}

/// When the index is rebuilt after a corpus mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebuildPolicy {
    /// Rebuild before the mutation releases the lock.
    #[default]
    Eager,
    /// Leave the engine stale; the next search or `rebuild()` catches up.
    Lazy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub stopwords: Vec<String>,
    pub english_stopwords: bool,
    pub idf: IdfPolicy,
    pub tf: TfWeighting,
    /// Result limit when a search does not pass one. `None` returns every hit.
    pub top_k: Option<usize>,
    pub include_zero_scores: bool,
    pub rebuild: RebuildPolicy,
    pub snippets: bool,
    /// Snippet length in characters.
    pub snippet_width: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stopwords: Vec::new(),
            english_stopwords: false,
            idf: IdfPolicy::default(),
            tf: TfWeighting::default(),
            top_k: None,
            include_zero_scores: false,
            rebuild: RebuildPolicy::default(),
            snippets: true,
            snippet_width: 200,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn tokenizer(&self) -> Tokenizer {
        let mut words: Vec<&str> = self.stopwords.iter().map(String::as_str).collect();
        if self.english_stopwords {
            for w in english_stopwords() {
                words.push(w);
            }
        }
        Tokenizer::with_stopwords(words)
    }
}
