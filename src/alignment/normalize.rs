/// Non-ASCII marks stripped alongside ASCII punctuation.
const EXTRA_PUNCTUATION: &[char] = &[
    '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', // curly quotes
    '\u{2026}', '\u{00B7}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{2015}',
    '\u{3001}', '\u{3002}', '\u{300C}', '\u{300D}', '\u{300E}', '\u{300F}',
    '\u{3008}', '\u{3009}', '\u{300A}', '\u{300B}', '\u{3010}', '\u{3011}',
    '\u{FF01}', '\u{FF08}', '\u{FF09}', '\u{FF0C}', '\u{FF0E}', '\u{FF1A}',
    '\u{FF1B}', '\u{FF1F}', '\u{00AB}', '\u{00BB}',
];

pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || EXTRA_PUNCTUATION.contains(&c)
}

fn cleaned_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|&c| !is_punctuation(c))
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
}

/// Lowercased, punctuation-free words concatenated without separators.
pub fn normalize_plain(text: &str) -> String {
    cleaned_words(text).collect()
}

/// Lowercased, punctuation-free words joined by single spaces.
pub fn normalize_spaced(text: &str) -> String {
    cleaned_words(text).collect::<Vec<_>>().join(" ")
}

/// Normalized form of a single whitespace token; empty when it is all punctuation.
pub(crate) fn normalize_word(word: &str) -> String {
    normalize_plain(word)
}

/// Appends `mark` when `text` ends with one of the verb-final `endings`.
pub fn restore_sentence_final(text: &str, endings: &[String], mark: char) -> String {
    let ends_with_verb = endings
        .iter()
        .any(|ending| !ending.is_empty() && text.ends_with(ending.as_str()));
    if ends_with_verb && !text.ends_with(mark) {
        format!("{text}{mark}")
    } else {
        text.to_string()
    }
}
