use std::cmp::Ordering;

use crate::alignment::similarity::similarity;
use crate::types::Candidate;

/// Reference lines ranked by whole-line similarity to a transcript.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    candidates: Vec<Candidate>,
}

impl Ranking {
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn top(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    pub fn runner_up_score(&self) -> f64 {
        self.candidates.get(1).map(|c| c.score).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The top candidate beats the runner-up by strictly more than `margin`
    /// and reaches `threshold`.
    pub fn confident(&self, margin: f64, threshold: f64) -> bool {
        match self.top() {
            Some(top) => top.score - self.runner_up_score() > margin && top.score >= threshold,
            None => false,
        }
    }
}

/// Scores every line against `asr_text`, best first. Equal scores keep input order.
pub fn select<S: AsRef<str>>(asr_text: &str, reference_lines: &[S]) -> Ranking {
    let mut candidates: Vec<Candidate> = reference_lines
        .iter()
        .enumerate()
        .map(|(index, line)| Candidate {
            line: line.as_ref().to_string(),
            score: similarity(line.as_ref(), asr_text),
            index,
        })
        .collect();

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    Ranking { candidates }
}
