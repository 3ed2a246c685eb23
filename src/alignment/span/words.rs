use crate::alignment::normalize::{is_punctuation, normalize_word};

/// Whitespace tokens of a reference line paired with their normalized form.
///
/// Tokens that normalize to nothing (stray dashes, ellipses) are not
/// addressable words; they only survive when they sit between two words of a
/// returned slice.
#[derive(Debug)]
pub(crate) struct WordList<'a> {
    tokens: Vec<&'a str>,
    norms: Vec<String>,
    token_of: Vec<usize>,
}

impl<'a> WordList<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut norms = Vec::with_capacity(tokens.len());
        let mut token_of = Vec::with_capacity(tokens.len());
        for (token_idx, token) in tokens.iter().enumerate() {
            let norm = normalize_word(token);
            if norm.is_empty() {
                continue;
            }
            norms.push(norm);
            token_of.push(token_idx);
        }
        Self {
            tokens,
            norms,
            token_of,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.norms.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.norms.is_empty()
    }

    pub(crate) fn norms(&self) -> &[String] {
        &self.norms
    }

    /// Original text of words `first..=last`.
    pub(crate) fn slice(&self, first: usize, last: usize) -> String {
        self.tokens[self.token_of[first]..=self.token_of[last]].join(" ")
    }

    /// Like `slice`, but the last word keeps at most one trailing punctuation mark.
    pub(crate) fn slice_with_single_mark(&self, first: usize, last: usize) -> String {
        let first_token = self.token_of[first];
        let last_token = self.token_of[last];
        let mut parts: Vec<String> = self.tokens[first_token..last_token]
            .iter()
            .map(|t| t.to_string())
            .collect();
        parts.push(keep_single_trailing_mark(self.tokens[last_token]));
        parts.join(" ")
    }

    /// Byte range of each word inside the concatenated plain form.
    pub(crate) fn plain_bounds(&self) -> (String, Vec<usize>, Vec<usize>) {
        let mut plain = String::new();
        let mut starts = Vec::with_capacity(self.norms.len());
        let mut ends = Vec::with_capacity(self.norms.len());
        for norm in &self.norms {
            starts.push(plain.len());
            plain.push_str(norm);
            ends.push(plain.len());
        }
        (plain, starts, ends)
    }
}

fn keep_single_trailing_mark(token: &str) -> String {
    let word = token.trim_end_matches(is_punctuation);
    let mut out = word.to_string();
    out.extend(token[word.len()..].chars().next());
    out
}

/// Index of `target` among `words`: exact match first, then the first word
/// containing it, or with `reverse` the first word contained in it.
pub fn find_word<S: AsRef<str>>(words: &[S], target: &str, reverse: bool) -> Option<usize> {
    if target.is_empty() {
        return None;
    }
    if let Some(exact) = words.iter().position(|w| w.as_ref() == target) {
        return Some(exact);
    }
    words.iter().position(|w| {
        let word = w.as_ref();
        word.contains(target) || (reverse && !word.is_empty() && target.contains(word))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_word_prefers_exact_match() {
        let words = ["quickly", "quick", "fox"];
        assert_eq!(find_word(&words, "quick", false), Some(1));
    }

    #[test]
    fn find_word_falls_back_to_partial_match() {
        let words = ["the", "quick", "fox"];
        assert_eq!(find_word(&words, "uick", false), Some(1));
        assert_eq!(find_word(&words, "quickest", false), None);
    }

    #[test]
    fn find_word_reverse_matches_shorter_word() {
        let words = ["the", "quick", "fox"];
        assert_eq!(find_word(&words, "quickest", true), Some(1));
        assert_eq!(find_word(&words, "dog", true), None);
    }

    #[test]
    fn word_list_skips_punctuation_tokens() {
        let words = WordList::new("Seoul -- the capital, grows.");
        assert_eq!(words.norms(), ["seoul", "the", "capital", "grows"]);
        assert_eq!(words.slice(0, 1), "Seoul -- the");
        assert_eq!(words.slice(2, 3), "capital, grows.");
    }

    #[test]
    fn single_mark_is_kept_on_last_word() {
        let words = WordList::new("wait for it?!");
        assert_eq!(words.slice_with_single_mark(0, 2), "wait for it?");
        assert_eq!(words.slice_with_single_mark(0, 1), "wait for");
    }

    #[test]
    fn plain_bounds_cover_each_word() {
        let words = WordList::new("ab, c def");
        let (plain, starts, ends) = words.plain_bounds();
        assert_eq!(plain, "abcdef");
        assert_eq!(starts, vec![0, 2, 3]);
        assert_eq!(ends, vec![2, 3, 6]);
    }
}
