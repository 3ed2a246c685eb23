pub mod candidates;
pub mod normalize;
pub mod report;
pub mod similarity;
pub mod span;
pub mod tokenization;
