use regex::RegexBuilder;

/// Cut a window of `width` characters around the first match of any term,
/// or the leading text if nothing matches, and wrap matches in `<em>`.
///
/// Terms are matched as whole words against the raw text. They are expected
/// to be normalized tokens, so a token whose punctuation was stripped ("dont"
/// from "don't") does not match and the snippet falls back to the leading text.
pub fn snippet(text: &str, terms: &[String], width: usize) -> Option<String> {
    if text.trim().is_empty() || width == 0 {
        return None;
    }
    let pattern = terms_pattern(terms);
    let matcher = pattern
        .as_deref()
        .and_then(|p| RegexBuilder::new(p).case_insensitive(true).build().ok());

    let start_char = matcher
        .as_ref()
        .and_then(|re| re.find(text))
        .map(|m| text[..m.start()].chars().count().saturating_sub(width / 2))
        .unwrap_or(0);
    let (start, end) = trimmed_span(text, byte_offset(text, start_char), byte_offset(text, start_char + width));

    let Some(re) = matcher else {
        return Some(text[start..end].to_string());
    };
    // Matches come from the full text so a word cut at the window edge is
    // never mistaken for a whole-word hit.
    let mut out = String::with_capacity(end - start + 16);
    let mut cursor = start;
    for m in re.find_iter(text) {
        if m.start() < start || m.end() > end {
            continue;
        }
        out.push_str(&text[cursor..m.start()]);
        out.push_str("<em>");
        out.push_str(m.as_str());
        out.push_str("</em>");
        cursor = m.end();
    }
    out.push_str(&text[cursor..end]);
    Some(out)
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

fn trimmed_span(text: &str, start: usize, end: usize) -> (usize, usize) {
    let slice = &text[start..end];
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    if lead == slice.len() {
        return (start, start);
    }
    (start + lead, end - trail)
}

// Longest terms first so a term never loses to its own prefix.
fn terms_pattern(terms: &[String]) -> Option<String> {
    let mut terms: Vec<&str> = terms.iter().map(String::as_str).filter(|t| !t.is_empty()).collect();
    if terms.is_empty() {
        return None;
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    terms.dedup();
    let alternation: Vec<String> = terms.iter().map(|t| regex::escape(t)).collect();
    Some(format!(r"\b(?:{})\b", alternation.join("|")))
}
