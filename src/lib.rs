pub mod alignment;
pub mod config;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::normalize::{normalize_plain, normalize_spaced};
pub use alignment::report::{BatchCounts, BatchReport};
pub use alignment::similarity::similarity;
pub use config::{AlignerConfig, CandidateScope, ConfigOverrides, SpanStrategy};
pub use error::AlignmentError;
pub use pipeline::batch::{BatchOutcome, BatchRunner, CancellationToken};
pub use pipeline::builder::TranscriptAlignerBuilder;
pub use pipeline::runtime::TranscriptAligner;
pub use pipeline::traits::{ReferenceSource, SpanSearch};
pub use types::{AlignmentResult, Candidate, SpanMatch};
