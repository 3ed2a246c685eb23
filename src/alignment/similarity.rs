use crate::alignment::normalize::normalize_plain;

/// Similarity of two texts in [0, 1], compared in their plain normalized form.
///
/// The score is `2 * M / (len(a) + len(b))` where `M` is the total length of
/// the order-preserving matching blocks found by repeatedly taking the
/// longest common contiguous block and recursing on both sides of it.
pub fn similarity(text_a: &str, text_b: &str) -> f64 {
    plain_ratio(&normalize_plain(text_a), &normalize_plain(text_b))
}

/// Same ratio for texts that are already in plain normalized form.
pub(crate) fn plain_ratio(plain_a: &str, plain_b: &str) -> f64 {
    let a: Vec<char> = plain_a.chars().collect();
    let b: Vec<char> = plain_b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    // Block decomposition depends on argument order when longest blocks tie;
    // taking the larger of both orders keeps the score symmetric.
    let matched = matched_chars(&a, &b).max(matched_chars(&b, &a));
    2.0 * matched as f64 / total as f64
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0usize;
    let mut pending = vec![(0usize, a.len(), 0usize, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[col - 1] + 1;
                cur[col] = k;
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            } else {
                cur[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best_size)
}
