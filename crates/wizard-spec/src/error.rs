use thiserror::Error;

use crate::flatten::QuestionPosition;

/// Errors raised by the flow core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// A flattened position no longer resolves against the application tree.
    #[error("question position {position} does not exist in the application tree")]
    MalformedTree { position: QuestionPosition },
    /// `jump_to` was given an index outside the visible questions.
    #[error("question index {index} is out of range (visible questions: {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
