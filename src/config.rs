use std::path::Path;

use serde::Deserialize;

use crate::corpus::resolve_encoding;
use crate::error::AlignmentError;

/// Which span search the aligner commits to for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanStrategy {
    /// Exhaustive search over every contiguous word window of the line.
    Windowed,
    /// Locate the transcript's first and last words and trim the line to them.
    BoundaryRepair,
}

impl SpanStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windowed => "windowed",
            Self::BoundaryRepair => "boundary-repair",
        }
    }
}

/// How many ranked candidates the span search is run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateScope {
    /// Only the top candidate, gated by the score margin over the runner-up.
    TopRanked,
    /// Every candidate in rank order; the best span score wins.
    Exhaustive,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    pub score_threshold: f64,
    pub min_score_margin: f64,
    /// Maximum token-sequence length difference tolerated for an ambiguous guess.
    pub length_tolerance: usize,
    pub strategy: SpanStrategy,
    pub candidate_scope: CandidateScope,
    pub verb_final_endings: Vec<String>,
    pub sentence_final_mark: char,
    pub recognition_encoding: String,
    pub reference_encoding: String,
    pub audio_dir_name: String,
    pub assets_dir_name: String,
    pub reference_extension: String,
    pub threads: Option<usize>,
}

impl AlignerConfig {
    pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.4;
    pub const DEFAULT_LENGTH_TOLERANCE: usize = 10;
    pub const DEFAULT_ENCODING: &'static str = "cp949";

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read aligner config", e))?;
        serde_json::from_str(&data).map_err(|e| AlignmentError::json("parse aligner config", e))
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(AlignmentError::invalid_input(format!(
                "score_threshold must be within [0, 1], got {}",
                self.score_threshold
            )));
        }
        if !self.min_score_margin.is_finite() || self.min_score_margin < 0.0 {
            return Err(AlignmentError::invalid_input(format!(
                "min_score_margin must be a non-negative number, got {}",
                self.min_score_margin
            )));
        }
        if self.threads == Some(0) {
            return Err(AlignmentError::invalid_input("threads must be >= 1"));
        }
        if self.audio_dir_name.is_empty() || self.assets_dir_name.is_empty() {
            return Err(AlignmentError::invalid_input(
                "audio and assets directory names must not be empty",
            ));
        }
        resolve_encoding(&self.recognition_encoding)?;
        resolve_encoding(&self.reference_encoding)?;
        Ok(())
    }
}

/// Settings given explicitly on the command line or in the environment.
/// Unset fields leave the underlying config untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub score_threshold: Option<f64>,
    pub recognition_encoding: Option<String>,
    pub reference_encoding: Option<String>,
    pub strategy: Option<SpanStrategy>,
    pub candidate_scope: Option<CandidateScope>,
    pub length_tolerance: Option<usize>,
    pub audio_dir_name: Option<String>,
    pub assets_dir_name: Option<String>,
    pub threads: Option<usize>,
}

impl AlignerConfig {
    /// File values (or defaults without a file), then `overrides`, then validation.
    pub fn resolve(file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, AlignmentError> {
        let base = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(value) = overrides.score_threshold {
            self.score_threshold = value;
        }
        if let Some(value) = overrides.recognition_encoding {
            self.recognition_encoding = value;
        }
        if let Some(value) = overrides.reference_encoding {
            self.reference_encoding = value;
        }
        if let Some(value) = overrides.strategy {
            self.strategy = value;
        }
        if let Some(value) = overrides.candidate_scope {
            self.candidate_scope = value;
        }
        if let Some(value) = overrides.length_tolerance {
            self.length_tolerance = value;
        }
        if let Some(value) = overrides.audio_dir_name {
            self.audio_dir_name = value;
        }
        if let Some(value) = overrides.assets_dir_name {
            self.assets_dir_name = value;
        }
        if overrides.threads.is_some() {
            self.threads = overrides.threads;
        }
        self
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            score_threshold: Self::DEFAULT_SCORE_THRESHOLD,
            min_score_margin: 0.0,
            length_tolerance: Self::DEFAULT_LENGTH_TOLERANCE,
            strategy: SpanStrategy::BoundaryRepair,
            candidate_scope: CandidateScope::TopRanked,
            verb_final_endings: vec!["다".to_string()],
            sentence_final_mark: '.',
            recognition_encoding: Self::DEFAULT_ENCODING.to_string(),
            reference_encoding: Self::DEFAULT_ENCODING.to_string(),
            audio_dir_name: "audio".to_string(),
            assets_dir_name: "assets".to_string(),
            reference_extension: "txt".to_string(),
            threads: None,
        }
    }
}
