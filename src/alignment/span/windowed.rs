use super::words::WordList;
use crate::alignment::normalize::normalize_plain;
use crate::alignment::similarity::plain_ratio;
use crate::types::SpanMatch;

/// Best contiguous word window of `found_text` against `recognition_text`.
///
/// Every `[start, end)` window is scored; the first window reaching the
/// maximum wins. Spacing is ignored on both sides, so ASR word merges and
/// splits do not affect the score.
pub fn search_windowed(found_text: &str, recognition_text: &str) -> SpanMatch {
    let words = WordList::new(found_text.trim());
    let target = normalize_plain(recognition_text);
    if words.is_empty() || target.is_empty() {
        return SpanMatch::empty();
    }

    let norms = words.norms();
    let mut best: Option<(usize, usize, f64)> = None;
    for start in 0..norms.len() {
        let mut window = String::new();
        for end in start + 1..=norms.len() {
            window.push_str(&norms[end - 1]);
            let score = plain_ratio(&window, &target);
            if best.map_or(score > 0.0, |(_, _, best_score)| score > best_score) {
                best = Some((start, end, score));
            }
        }
    }

    match best {
        Some((start, end, score)) => {
            tracing::trace!(start, end, score, "windowed span search: best window");
            SpanMatch {
                text: words.slice(start, end - 1),
                score,
                resolved: true,
            }
        }
        None => SpanMatch::empty(),
    }
}
