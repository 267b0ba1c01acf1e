/// Longest prefix of `text` holding at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// First `max` characters followed by `...`, always.
pub fn preview(text: &str, max: usize) -> String {
    format!("{}...", truncate_chars(text, max))
}

/// `text` unchanged when short enough, else truncated with `...`.
pub fn preview_if_longer(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        preview(text, max)
    } else {
        text.to_string()
    }
}

/// First `n` whitespace separated words.
pub fn leading_keywords(text: &str, n: usize) -> Vec<String> {
    text.split_whitespace().take(n).map(str::to_string).collect()
}

/// Search terms derived from a query and the conversation around it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyTerms {
    /// Lowercased query words, in order.
    pub query_words: Vec<String>,
    /// Lowercased context words, in order.
    pub context_words: Vec<String>,
    /// Query words then new context words, longer than two characters, capped.
    pub terms: Vec<String>,
}

impl KeyTerms {
    pub const MAX_TERMS: usize = 15;

    pub fn extract(query: &str, context: &str) -> Self {
        let query_words: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let context_words: Vec<String> = context
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let terms = query_words
            .iter()
            .chain(context_words.iter().filter(|w| !query_words.contains(w)))
            .filter(|w| w.chars().count() > 2)
            .take(Self::MAX_TERMS)
            .cloned()
            .collect();

        Self {
            query_words,
            context_words,
            terms,
        }
    }

    pub fn search_string(&self) -> String {
        self.terms.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview_if_longer("abc", 3), "abc");
        assert_eq!(preview_if_longer("abcd", 3), "abc...");
    }

    #[test]
    fn keywords_take_leading_words() {
        let words = leading_keywords("one two  three\nfour", 3);
        assert_eq!(words, vec!["one", "two", "three"]);
    }

    #[test]
    fn key_terms_prefer_query_then_new_context_words() {
        let terms = KeyTerms::extract("How is my Sleep", "sleep quality and my mood");
        assert_eq!(terms.query_words, vec!["how", "is", "my", "sleep"]);
        // "is"/"my" are too short, "sleep" is not repeated, "and" survives the length filter
        assert_eq!(terms.terms, vec!["how", "sleep", "quality", "and", "mood"]);
        assert_eq!(terms.search_string(), "how sleep quality and mood");
    }

    #[test]
    fn key_terms_are_capped() {
        let query = (0..30).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let terms = KeyTerms::extract(&query, "");
        assert_eq!(terms.terms.len(), KeyTerms::MAX_TERMS);
        assert!(KeyTerms::extract("a b", "").is_empty());
    }
}
