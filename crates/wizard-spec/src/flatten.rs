use std::fmt;

use serde::{Deserialize, Serialize};

use crate::spec::form::Form;

/// Location of a question inside the application tree.
///
/// Ordering follows document order: form first, then section, then question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionPosition {
    pub form: usize,
    pub section: usize,
    pub question: usize,
}

impl QuestionPosition {
    pub fn new(form: usize, section: usize, question: usize) -> Self {
        Self {
            form,
            section,
            question,
        }
    }
}

impl fmt::Display for QuestionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.form, self.section, self.question)
    }
}

/// Denormalized question reference produced by [`flatten`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatQuestion {
    pub question_id: String,
    pub form_name: String,
    pub section_name: String,
    pub position: QuestionPosition,
}

/// Flattens the form tree into document order.
pub fn flatten(forms: &[Form]) -> Vec<FlatQuestion> {
    let mut flattened = Vec::new();
    for (form_index, form) in forms.iter().enumerate() {
        for (section_index, section) in form.sections.iter().enumerate() {
            for (question_index, question) in section.questions.iter().enumerate() {
                flattened.push(FlatQuestion {
                    question_id: question.id.clone(),
                    form_name: form.name.clone(),
                    section_name: section.name.clone(),
                    position: QuestionPosition::new(form_index, section_index, question_index),
                });
            }
        }
    }
    flattened
}
