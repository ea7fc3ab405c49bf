use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerMap;
use crate::spec::form::Form;

/// Immutable application template: the form tree plus the initial answers.
///
/// `values` is only ever read as the baseline for a fresh or reset flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Application {
    #[serde(default)]
    pub values: AnswerMap,
    #[serde(default)]
    pub forms: Vec<Form>,
}

impl Application {
    pub fn question_count(&self) -> usize {
        self.forms.iter().map(Form::question_count).sum()
    }
}
