use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Anything that is neither a letter, a digit nor whitespace gets dropped.
    static ref STRIP: Regex = Regex::new(r"[^\p{L}\p{N}\s]+").expect("valid regex");
    static ref ENGLISH_STOPWORDS: Vec<&'static str> = vec![
        "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
        "be","because","been","before","being","below","between","both","but","by",
        "can","can't","cannot","could","couldn't",
        "did","didn't","do","does","doesn't","doing","don't","down","during",
        "each","few","for","from","further",
        "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
        "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
        "let's","me","more","most","mustn't","my","myself",
        "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
        "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
        "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
        "under","until","up","very",
        "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
        "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
    ];
}

/// Term → occurrence count. Keys are unique by construction.
pub type TermFrequencies = HashMap<String, u32>;

/// Lower-cases, strips punctuation and splits on whitespace. Holds the
/// configured stop-word set (empty unless configured).
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tokenizer that drops the given stop words. The words go through
    /// the same normalization as text, so "don't" filters the token "dont".
    pub fn with_stopwords<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = words
            .into_iter()
            .flat_map(|w| normalize_all(w.as_ref()))
            .collect();
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    /// Normalize text into an ordered sequence of terms. Deterministic.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        normalize_all(text)
            .into_iter()
            .filter(|t| !self.stopwords.contains(t))
            .collect()
    }

    /// Decode raw bytes, then normalize them.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> Result<Vec<String>> {
        Ok(self.normalize(decode(bytes)?))
    }
}

/// Decode uploaded bytes as UTF-8.
pub fn decode(bytes: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

pub fn english_stopwords() -> impl Iterator<Item = &'static str> {
    ENGLISH_STOPWORDS.iter().copied()
}

pub fn term_frequencies(terms: &[String]) -> TermFrequencies {
    let mut tf = TermFrequencies::with_capacity(terms.len());
    for term in terms {
        *tf.entry(term.clone()).or_insert(0) += 1;
    }
    tf
}

fn normalize_all(text: &str) -> Vec<String> {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    STRIP
        .replace_all(&lowered, "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
