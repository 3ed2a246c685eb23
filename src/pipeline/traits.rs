use crate::error::AlignmentError;
use crate::types::SpanMatch;

/// Finds the part of a reference line that a transcript covers.
pub trait SpanSearch: Send + Sync {
    fn search(&self, found_text: &str, recognition_text: &str) -> SpanMatch;

    fn name(&self) -> &'static str;
}

/// Supplies the candidate reference lines for a clip.
pub trait ReferenceSource: Send + Sync {
    fn reference_lines(&self, clip: &str) -> Result<Vec<String>, AlignmentError>;
}
