use serde::{Deserialize, Serialize};

/// Outcome of aligning one clip.
///
/// Serialized the way the corpus mapping stores it: a bare string for
/// `Aligned`, `[guess, asr_text]` for `Ambiguous`, `[asr_text]` for
/// `Unresolved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ResultRepr", from = "ResultRepr")]
pub enum AlignmentResult {
    Aligned(String),
    Ambiguous { guess: String, asr_text: String },
    Unresolved(String),
}

impl AlignmentResult {
    pub fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned(_))
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Aligned(_) => "aligned",
            Self::Ambiguous { .. } => "ambiguous",
            Self::Unresolved(_) => "unresolved",
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ResultRepr {
    Text(String),
    Pair(String, String),
    Single((String,)),
}

impl From<AlignmentResult> for ResultRepr {
    fn from(result: AlignmentResult) -> Self {
        match result {
            AlignmentResult::Aligned(text) => Self::Text(text),
            AlignmentResult::Ambiguous { guess, asr_text } => Self::Pair(guess, asr_text),
            AlignmentResult::Unresolved(asr_text) => Self::Single((asr_text,)),
        }
    }
}

impl From<ResultRepr> for AlignmentResult {
    fn from(repr: ResultRepr) -> Self {
        match repr {
            ResultRepr::Text(text) => Self::Aligned(text),
            ResultRepr::Pair(guess, asr_text) => Self::Ambiguous { guess, asr_text },
            ResultRepr::Single((asr_text,)) => Self::Unresolved(asr_text),
        }
    }
}

/// One reference line with its whole-line similarity to the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub line: String,
    pub score: f64,
    /// Position of the line in the reference document after cleanup.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpanMatch {
    pub text: String,
    /// Similarity of `text` to the transcript, in [0, 1].
    pub score: f64,
    /// False when the boundaries could not be confirmed and the span is only a hint.
    pub resolved: bool,
}

impl SpanMatch {
    pub(crate) fn empty() -> Self {
        Self {
            text: String::new(),
            score: 0.0,
            resolved: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_serialize_to_corpus_shapes() {
        let aligned = AlignmentResult::Aligned("안녕하세요.".to_string());
        let ambiguous = AlignmentResult::Ambiguous {
            guess: "guess".to_string(),
            asr_text: "asr".to_string(),
        };
        let unresolved = AlignmentResult::Unresolved("asr".to_string());

        assert_eq!(serde_json::to_string(&aligned).unwrap(), r#""안녕하세요.""#);
        assert_eq!(serde_json::to_string(&ambiguous).unwrap(), r#"["guess","asr"]"#);
        assert_eq!(serde_json::to_string(&unresolved).unwrap(), r#"["asr"]"#);
    }

    #[test]
    fn results_deserialize_from_corpus_shapes() {
        let parsed: Vec<AlignmentResult> =
            serde_json::from_str(r#"["text", ["a", "b"], ["c"]]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                AlignmentResult::Aligned("text".to_string()),
                AlignmentResult::Ambiguous {
                    guess: "a".to_string(),
                    asr_text: "b".to_string()
                },
                AlignmentResult::Unresolved("c".to_string()),
            ]
        );
    }
}
