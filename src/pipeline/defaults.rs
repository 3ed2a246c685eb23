use std::path::PathBuf;

use encoding_rs::Encoding;

use crate::alignment::span::{search_boundary_repair, search_windowed};
use crate::config::{AlignerConfig, SpanStrategy};
use crate::corpus::{read_reference_lines, reference_path, resolve_encoding};
use crate::error::AlignmentError;
use crate::pipeline::traits::{ReferenceSource, SpanSearch};
use crate::types::SpanMatch;

pub struct WindowedSpanSearch;

impl SpanSearch for WindowedSpanSearch {
    fn search(&self, found_text: &str, recognition_text: &str) -> SpanMatch {
        search_windowed(found_text, recognition_text)
    }

    fn name(&self) -> &'static str {
        SpanStrategy::Windowed.as_str()
    }
}

pub struct BoundaryRepairSpanSearch;

impl SpanSearch for BoundaryRepairSpanSearch {
    fn search(&self, found_text: &str, recognition_text: &str) -> SpanMatch {
        search_boundary_repair(found_text, recognition_text)
    }

    fn name(&self) -> &'static str {
        SpanStrategy::BoundaryRepair.as_str()
    }
}

pub fn span_search_for(strategy: SpanStrategy) -> Box<dyn SpanSearch> {
    match strategy {
        SpanStrategy::Windowed => Box::new(WindowedSpanSearch),
        SpanStrategy::BoundaryRepair => Box::new(BoundaryRepairSpanSearch),
    }
}

/// Reads each clip's reference document from the assets directory next to its audio.
pub struct FileReferenceSource {
    audio_dir_name: String,
    assets_dir_name: String,
    extension: String,
    encoding: &'static Encoding,
}

impl FileReferenceSource {
    pub fn from_config(config: &AlignerConfig) -> Result<Self, AlignmentError> {
        Ok(Self {
            audio_dir_name: config.audio_dir_name.clone(),
            assets_dir_name: config.assets_dir_name.clone(),
            extension: config.reference_extension.clone(),
            encoding: resolve_encoding(&config.reference_encoding)?,
        })
    }

    pub fn path_for(&self, clip: &str) -> PathBuf {
        reference_path(
            clip,
            &self.audio_dir_name,
            &self.assets_dir_name,
            &self.extension,
        )
    }
}

impl ReferenceSource for FileReferenceSource {
    fn reference_lines(&self, clip: &str) -> Result<Vec<String>, AlignmentError> {
        read_reference_lines(&self.path_for(clip), self.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_search_for_matches_strategy() {
        assert_eq!(span_search_for(SpanStrategy::Windowed).name(), "windowed");
        assert_eq!(
            span_search_for(SpanStrategy::BoundaryRepair).name(),
            "boundary-repair"
        );
    }

    #[test]
    fn strategies_delegate_to_span_engine() {
        let line = "the quick brown fox jumps over the lazy dog";
        let asr = "quick brown fox jump over lazy";
        assert_eq!(WindowedSpanSearch.search(line, asr), search_windowed(line, asr));
        assert_eq!(
            BoundaryRepairSpanSearch.search(line, asr),
            search_boundary_repair(line, asr)
        );
    }

    #[test]
    fn file_reference_source_resolves_assets_path() {
        let config = AlignerConfig {
            reference_encoding: "utf-8".to_string(),
            ..AlignerConfig::default()
        };
        let source = FileReferenceSource::from_config(&config).unwrap();
        assert_eq!(
            source.path_for("corpus/audio/news.0001.wav"),
            PathBuf::from("corpus/assets/news.txt")
        );
    }

    #[test]
    fn file_reference_source_reports_missing_document() {
        let source = FileReferenceSource::from_config(&AlignerConfig::default()).unwrap();
        let err = source
            .reference_lines("/nonexistent/audio/clip.0001.wav")
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
