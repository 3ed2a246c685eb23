use crate::alignment::candidates::select;
use crate::alignment::normalize::{normalize_plain, restore_sentence_final};
use crate::alignment::tokenization::sequence_length;
use crate::config::{AlignerConfig, CandidateScope};
use crate::error::AlignmentError;
use crate::pipeline::traits::{ReferenceSource, SpanSearch};
use crate::types::{AlignmentResult, Candidate, SpanMatch};

/// Per-clip decision policy: rank the reference lines, cut the best span out
/// of the chosen line, and decide how much of it can be trusted.
pub struct TranscriptAligner {
    config: AlignerConfig,
    span_search: Box<dyn SpanSearch>,
    reference_source: Box<dyn ReferenceSource>,
}

pub(crate) struct TranscriptAlignerParts {
    pub config: AlignerConfig,
    pub span_search: Box<dyn SpanSearch>,
    pub reference_source: Box<dyn ReferenceSource>,
}

impl TranscriptAligner {
    pub(crate) fn from_parts(parts: TranscriptAlignerParts) -> Self {
        Self {
            config: parts.config,
            span_search: parts.span_search,
            reference_source: parts.reference_source,
        }
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    pub fn strategy_name(&self) -> &'static str {
        self.span_search.name()
    }

    /// Loads the clip's reference lines and aligns `asr_text` against them.
    pub fn align_clip(&self, clip: &str, asr_text: &str) -> Result<AlignmentResult, AlignmentError> {
        let lines = self.reference_source.reference_lines(clip)?;
        if lines.is_empty() {
            tracing::debug!(clip, "reference document has no candidate lines");
        }
        let result = self.align(asr_text, &lines);
        tracing::debug!(clip, asr_text, outcome = result.label(), ?result, "clip decided");
        Ok(result)
    }

    pub fn align(&self, asr_text: &str, reference_lines: &[String]) -> AlignmentResult {
        let unresolved = || AlignmentResult::Unresolved(asr_text.to_string());
        if normalize_plain(asr_text).is_empty() {
            return unresolved();
        }

        let ranking = select(asr_text, reference_lines);
        let Some(top) = ranking.top() else {
            return unresolved();
        };

        let chosen = match self.config.candidate_scope {
            CandidateScope::TopRanked => {
                if !ranking.confident(self.config.min_score_margin, self.config.score_threshold) {
                    tracing::debug!(
                        top_score = top.score,
                        runner_up_score = ranking.runner_up_score(),
                        score_threshold = self.config.score_threshold,
                        "no confident candidate line"
                    );
                    return unresolved();
                }
                Some((top, self.span_search.search(&top.line, asr_text)))
            }
            CandidateScope::Exhaustive => self.best_span(ranking.candidates(), asr_text),
        };

        let Some((candidate, span)) = chosen else {
            return unresolved();
        };
        self.decide(candidate, span, asr_text)
    }

    /// Runs the span search on every candidate in rank order and keeps the
    /// first one with the highest span score.
    fn best_span<'c>(
        &self,
        candidates: &'c [Candidate],
        asr_text: &str,
    ) -> Option<(&'c Candidate, SpanMatch)> {
        let mut best: Option<(&Candidate, SpanMatch)> = None;
        for candidate in candidates {
            let span = self.span_search.search(&candidate.line, asr_text);
            let perfect = span.score >= 1.0;
            let improves = best
                .as_ref()
                .map_or(span.score > 0.0, |(_, current)| span.score > current.score);
            if improves {
                best = Some((candidate, span));
            }
            if perfect {
                break;
            }
        }
        best
    }

    fn decide(&self, candidate: &Candidate, span: SpanMatch, asr_text: &str) -> AlignmentResult {
        let restore = |text: &str| {
            restore_sentence_final(
                text,
                &self.config.verb_final_endings,
                self.config.sentence_final_mark,
            )
        };

        tracing::debug!(
            candidate_index = candidate.index,
            candidate_score = candidate.score,
            span_score = span.score,
            span_resolved = span.resolved,
            span = span.text.as_str(),
            "span search finished"
        );

        if span.resolved
            && !span.text.trim().is_empty()
            && span.score >= self.config.score_threshold
        {
            return AlignmentResult::Aligned(restore(span.text.trim()));
        }

        let length_gap = sequence_length(&candidate.line).abs_diff(sequence_length(asr_text));
        if length_gap > self.config.length_tolerance {
            tracing::debug!(
                length_gap,
                length_tolerance = self.config.length_tolerance,
                "candidate line too far from transcript length"
            );
            return AlignmentResult::Unresolved(asr_text.to_string());
        }

        let guess = restore(candidate.line.trim());
        if guess.is_empty() {
            return AlignmentResult::Unresolved(asr_text.to_string());
        }
        AlignmentResult::Ambiguous {
            guess,
            asr_text: asr_text.to_string(),
        }
    }
}
