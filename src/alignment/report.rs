use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::AlignmentResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchCounts {
    /// Clips that went through the aligner (cancelled clips excluded).
    pub processed: u32,
    pub aligned: u32,
    pub ambiguous: u32,
    pub unresolved: u32,
    /// Clips whose reference document could not be read; also counted as unresolved.
    pub failed: u32,
    /// Clips never started because the run was cancelled.
    pub skipped: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub counts: BatchCounts,
    /// Share of processed clips with an aligned or ambiguous result.
    pub found_ratio: f64,
    /// Share of processed clips with an aligned result.
    pub exact_ratio: f64,
    pub failed_clips: Vec<String>,
}

impl BatchReport {
    pub fn found_count(&self) -> u32 {
        self.counts.aligned + self.counts.ambiguous
    }
}

pub fn summarize(
    mapping: &BTreeMap<String, AlignmentResult>,
    mut failed_clips: Vec<String>,
    skipped: usize,
) -> BatchReport {
    let mut counts = BatchCounts {
        processed: to_u32(mapping.len()),
        failed: to_u32(failed_clips.len()),
        skipped: to_u32(skipped),
        ..BatchCounts::default()
    };
    for result in mapping.values() {
        match result {
            AlignmentResult::Aligned(_) => counts.aligned += 1,
            AlignmentResult::Ambiguous { .. } => counts.ambiguous += 1,
            AlignmentResult::Unresolved(_) => counts.unresolved += 1,
        }
    }
    failed_clips.sort();

    BatchReport {
        found_ratio: ratio(counts.aligned + counts.ambiguous, counts.processed),
        exact_ratio: ratio(counts.aligned, counts.processed),
        counts,
        failed_clips,
    }
}

fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
