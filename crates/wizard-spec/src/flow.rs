use tracing::debug;

use crate::answers::{AnswerMap, AnswerValue};
use crate::error::FlowError;
use crate::flatten::{FlatQuestion, flatten};
use crate::navigator::{find_next, find_previous, first_unanswered, unanswered_count};
use crate::spec::application::Application;
use crate::visibility::filter_visible;

/// Whether any visible question still needs an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    InProgress,
    Complete,
}

impl FlowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowState::InProgress => "in_progress",
            FlowState::Complete => "complete",
        }
    }
}

/// Owns the answers and cursor for one editing session.
///
/// The application tree is never mutated, so the flattened and visible
/// sequences are computed once. Answered state is always read from the
/// answer map.
#[derive(Debug, Clone)]
pub struct FlowController {
    application: Application,
    questions: Vec<FlatQuestion>,
    visible: Vec<FlatQuestion>,
    answers: AnswerMap,
    cursor: usize,
}

impl FlowController {
    /// Starts a session from persisted answers when available, otherwise
    /// from the application's initial values.
    pub fn initialize(
        application: Application,
        persisted: Option<AnswerMap>,
    ) -> Result<Self, FlowError> {
        let answers = persisted.unwrap_or_else(|| application.values.clone());
        let questions = flatten(&application.forms);
        let visible = filter_visible(&questions, &application.forms)?;
        let cursor = first_unanswered(&visible, &answers).unwrap_or(0);
        debug!(
            total = questions.len(),
            visible = visible.len(),
            cursor,
            "initialized flow"
        );
        Ok(Self {
            application,
            questions,
            visible,
            answers,
            cursor,
        })
    }

    pub fn application(&self) -> &Application {
        &self.application
    }

    /// Every question in document order, hidden ones included.
    pub fn questions(&self) -> &[FlatQuestion] {
        &self.questions
    }

    pub fn visible(&self) -> &[FlatQuestion] {
        &self.visible
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Question under the cursor, `None` when nothing is visible.
    pub fn current(&self) -> Option<&FlatQuestion> {
        self.visible.get(self.cursor)
    }

    pub fn current_value(&self) -> Option<&AnswerValue> {
        self.current()
            .and_then(|question| self.answers.get(&question.question_id))
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.is_answered(question_id)
    }

    /// Replaces the stored answer. The cursor stays where it is, even when the
    /// new value clears a previously answered question.
    pub fn set_answer(&mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) {
        let question_id = question_id.into();
        let value = value.into();
        debug!(question_id = %question_id, answered = value.is_answered(), "answer updated");
        self.answers.set(question_id, value);
    }

    pub fn can_go_next(&self) -> bool {
        find_next(self.cursor, &self.visible, &self.answers).is_some()
    }

    pub fn can_go_previous(&self) -> bool {
        find_previous(self.cursor, &self.visible, &self.answers).is_some()
    }

    /// Moves to the next unanswered question. Returns `false` and leaves the
    /// cursor untouched when there is none.
    pub fn go_next(&mut self) -> bool {
        match find_next(self.cursor, &self.visible, &self.answers) {
            Some(index) => {
                debug!(from = self.cursor, to = index, "moved to next unanswered question");
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    pub fn go_previous(&mut self) -> bool {
        match find_previous(self.cursor, &self.visible, &self.answers) {
            Some(index) => {
                debug!(from = self.cursor, to = index, "moved to previous unanswered question");
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    /// Skipping leaves the current answer as is and behaves like `go_next`.
    pub fn skip(&mut self) -> bool {
        self.go_next()
    }

    /// Jumps to any visible question, answered or not.
    pub fn jump_to(&mut self, index: usize) -> Result<(), FlowError> {
        let len = self.visible.len();
        if index >= len {
            return Err(FlowError::IndexOutOfRange { index, len });
        }
        debug!(from = self.cursor, to = index, "jumped to question");
        self.cursor = index;
        Ok(())
    }

    /// Restores the application's initial values and rewinds the cursor.
    pub fn reset(&mut self) {
        self.answers = self.application.values.clone();
        self.cursor = 0;
        debug!("flow reset to initial values");
    }

    pub fn unanswered_count(&self) -> usize {
        unanswered_count(&self.visible, &self.answers)
    }

    pub fn answered_count(&self) -> usize {
        self.visible.len() - self.unanswered_count()
    }

    pub fn is_complete(&self) -> bool {
        first_unanswered(&self.visible, &self.answers).is_none()
    }

    pub fn state(&self) -> FlowState {
        if self.is_complete() {
            FlowState::Complete
        } else {
            FlowState::InProgress
        }
    }

    /// Fraction of visible questions answered, `1.0` when nothing is visible.
    pub fn progress(&self) -> f64 {
        let total = self.visible.len();
        if total == 0 {
            return 1.0;
        }
        self.answered_count() as f64 / total as f64
    }
}
