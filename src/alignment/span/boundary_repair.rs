use super::words::{find_word, WordList};
use crate::alignment::normalize::{normalize_plain, normalize_spaced};
use crate::alignment::similarity::similarity;
use crate::types::SpanMatch;

/// Where the transcript's first word was found in the reference line.
#[derive(Debug, Clone, Copy)]
struct Head {
    word: usize,
    /// The reference word following the head also shows up in the transcript.
    confirmed: bool,
}

/// Trim `found_text` to the words the transcript actually covers.
///
/// When the transcript is contained in the line (ignoring spacing and
/// punctuation) the covering words are cut out directly, widened to whole
/// words so a dropped leading or trailing syllable is restored. Otherwise the
/// transcript's first and last words are looked up in the line and the line
/// is trimmed to them; the result is only `resolved` when both ends were
/// found and the head was confirmed by its neighbour.
pub fn search_boundary_repair(found_text: &str, recognition_text: &str) -> SpanMatch {
    let found_text = found_text.trim();
    let recognition_text = recognition_text.trim();
    let words = WordList::new(found_text);
    let target = normalize_plain(recognition_text);
    if words.is_empty() || target.is_empty() {
        return SpanMatch::empty();
    }

    let (plain, starts, ends) = words.plain_bounds();
    if plain.contains(&target) {
        let text = covering_span(&words, &plain, &starts, &ends, &target)
            .unwrap_or_else(|| recognition_text.to_string());
        return SpanMatch {
            score: similarity(&text, recognition_text),
            text,
            resolved: true,
        };
    }

    let spaced = normalize_spaced(recognition_text);
    let recognized: Vec<&str> = spaced.split(' ').collect();
    let norms = words.norms();

    let head = locate_head(norms, &recognized);
    let first = head.map(|h| h.word).unwrap_or(0);
    let last_word = recognized.last().copied().unwrap_or_default();
    let tail = find_word(&norms[first..], last_word, false).map(|offset| first + offset);

    let text = match tail {
        Some(last) => words.slice_with_single_mark(first, last),
        None => words.slice(first, words.len() - 1),
    };
    let resolved = head.is_some_and(|h| h.confirmed) && tail.is_some();

    tracing::trace!(
        head = ?head,
        tail_word = ?tail,
        resolved,
        "boundary repair: trimmed reference line"
    );

    SpanMatch {
        score: similarity(&text, recognition_text),
        text,
        resolved,
    }
}

/// Words covering an occurrence of `target` in the plain form of the line.
/// Occurrences starting and ending on word boundaries are preferred.
fn covering_span(
    words: &WordList<'_>,
    plain: &str,
    starts: &[usize],
    ends: &[usize],
    target: &str,
) -> Option<String> {
    let mut first_hit: Option<(usize, usize)> = None;
    let mut from = 0usize;
    while let Some(pos) = plain[from..].find(target) {
        let begin = from + pos;
        let finish = begin + target.len();
        let on_boundaries =
            starts.binary_search(&begin).is_ok() && ends.binary_search(&finish).is_ok();
        if on_boundaries {
            first_hit = Some((begin, finish));
            break;
        }
        first_hit.get_or_insert((begin, finish));
        from = begin + plain[begin..].chars().next().map_or(1, char::len_utf8);
    }

    let (begin, finish) = first_hit?;
    let first = ends.partition_point(|&e| e <= begin);
    let last = ends.partition_point(|&e| e < finish);
    (first <= last && last < words.len()).then(|| words.slice(first, last))
}

/// First reference position of the transcript's head, trying the line as-is
/// and then with its first two words merged, and the transcript's first word
/// alone and then merged with the second. The first hit wins, confirmed or not.
fn locate_head(norms: &[String], recognized: &[&str]) -> Option<Head> {
    let merged_line = merge_first_two(norms);
    let mut line_variants: Vec<(&[String], usize)> = vec![(norms, 0)];
    if let Some(merged) = merged_line.as_deref() {
        line_variants.push((merged, 1));
    }

    let mut heads: Vec<String> = recognized.first().map(|w| w.to_string()).into_iter().collect();
    if recognized.len() > 1 {
        heads.push(format!("{}{}", recognized[0], recognized[1]));
    }

    for &(variant, shift) in &line_variants {
        for head in &heads {
            let Some(idx) = find_word(variant, head, false) else {
                continue;
            };
            let confirmed = match variant.get(idx + 1) {
                Some(next) => find_word(recognized, next, true).is_some(),
                None => true,
            };
            // In the merged variant word 0 spans the first two original words.
            let word = if idx == 0 { 0 } else { idx + shift };
            return Some(Head { word, confirmed });
        }
    }
    None
}

fn merge_first_two(norms: &[String]) -> Option<Vec<String>> {
    if norms.len() < 2 {
        return None;
    }
    let mut merged = Vec::with_capacity(norms.len() - 1);
    merged.push(format!("{}{}", norms[0], norms[1]));
    merged.extend(norms[2..].iter().cloned());
    Some(merged)
}
