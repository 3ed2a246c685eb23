use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::alignment::report::{summarize, BatchReport};
use crate::error::AlignmentError;
use crate::pipeline::runtime::TranscriptAligner;
use crate::types::AlignmentResult;

/// Shared stop flag. Clips that have not started when it is raised are skipped.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub mapping: BTreeMap<String, AlignmentResult>,
    pub report: BatchReport,
}

enum ClipOutcome {
    Decided(AlignmentResult),
    Failed(AlignmentResult),
    Skipped,
}

type ProgressFn<'a> = Box<dyn Fn(&str) + Send + Sync + 'a>;

/// Aligns every clip of a recognition mapping in parallel.
///
/// Clips are independent; results are merged into a sorted mapping on the
/// calling thread, so the output does not depend on scheduling.
pub struct BatchRunner<'a> {
    aligner: &'a TranscriptAligner,
    cancellation: CancellationToken,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(aligner: &'a TranscriptAligner) -> Self {
        Self {
            aligner,
            cancellation: CancellationToken::new(),
            progress: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Called with the clip key after each clip is decided.
    pub fn with_progress(mut self, progress: impl Fn(&str) + Send + Sync + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn run(&self, recognition: &BTreeMap<String, String>) -> Result<BatchOutcome, AlignmentError> {
        tracing::info!(
            clips = recognition.len(),
            strategy = self.aligner.strategy_name(),
            threads = ?self.aligner.config().threads,
            "starting batch alignment"
        );

        let outcomes = match self.aligner.config().threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| AlignmentError::runtime("build alignment worker pool", e))?
                .install(|| self.align_all(recognition)),
            None => self.align_all(recognition),
        };

        let mut mapping = BTreeMap::new();
        let mut failed_clips = Vec::new();
        let mut skipped = 0usize;
        for (clip, outcome) in outcomes {
            match outcome {
                ClipOutcome::Decided(result) => {
                    mapping.insert(clip.clone(), result);
                }
                ClipOutcome::Failed(result) => {
                    failed_clips.push(clip.clone());
                    mapping.insert(clip.clone(), result);
                }
                ClipOutcome::Skipped => skipped += 1,
            }
        }

        let report = summarize(&mapping, failed_clips, skipped);
        tracing::info!(
            processed = report.counts.processed,
            aligned = report.counts.aligned,
            ambiguous = report.counts.ambiguous,
            unresolved = report.counts.unresolved,
            failed = report.counts.failed,
            skipped = report.counts.skipped,
            "batch alignment finished"
        );
        Ok(BatchOutcome { mapping, report })
    }

    fn align_all<'r>(&self, recognition: &'r BTreeMap<String, String>) -> Vec<(&'r String, ClipOutcome)> {
        recognition
            .par_iter()
            .map(|(clip, asr_text)| (clip, self.align_one(clip, asr_text)))
            .collect()
    }

    fn align_one(&self, clip: &str, asr_text: &str) -> ClipOutcome {
        if self.cancellation.is_cancelled() {
            return ClipOutcome::Skipped;
        }
        let outcome = match self.aligner.align_clip(clip, asr_text) {
            Ok(result) => ClipOutcome::Decided(result),
            Err(err) => {
                tracing::warn!(clip, error = %err, "reference document unavailable; clip left unresolved");
                ClipOutcome::Failed(AlignmentResult::Unresolved(asr_text.to_string()))
            }
        };
        if let Some(progress) = &self.progress {
            progress(clip);
        }
        outcome
    }
}
