use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::pipeline::defaults::{span_search_for, FileReferenceSource};
use crate::pipeline::runtime::{TranscriptAligner, TranscriptAlignerParts};
use crate::pipeline::traits::{ReferenceSource, SpanSearch};

pub struct TranscriptAlignerBuilder {
    config: AlignerConfig,
    span_search: Option<Box<dyn SpanSearch>>,
    reference_source: Option<Box<dyn ReferenceSource>>,
}

impl TranscriptAlignerBuilder {
    pub fn new(config: AlignerConfig) -> Self {
        Self {
            config,
            span_search: None,
            reference_source: None,
        }
    }

    /// Overrides the span search picked from `AlignerConfig::strategy`.
    pub fn with_span_search(mut self, span_search: Box<dyn SpanSearch>) -> Self {
        self.span_search = Some(span_search);
        self
    }

    pub fn with_reference_source(mut self, reference_source: Box<dyn ReferenceSource>) -> Self {
        self.reference_source = Some(reference_source);
        self
    }

    pub fn build(self) -> Result<TranscriptAligner, AlignmentError> {
        self.config.validate()?;

        let reference_source = match self.reference_source {
            Some(source) => source,
            None => Box::new(FileReferenceSource::from_config(&self.config)?),
        };
        let span_search = self
            .span_search
            .unwrap_or_else(|| span_search_for(self.config.strategy));

        tracing::debug!(
            strategy = span_search.name(),
            score_threshold = self.config.score_threshold,
            candidate_scope = ?self.config.candidate_scope,
            "transcript aligner configured"
        );

        Ok(TranscriptAligner::from_parts(TranscriptAlignerParts {
            config: self.config,
            span_search,
            reference_source,
        }))
    }
}
