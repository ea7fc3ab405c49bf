use std::collections::BTreeMap;

use crate::error::FlowError;
use crate::flatten::{FlatQuestion, QuestionPosition};
use crate::spec::{form::Form, question::Question};

/// Question id to visibility flag.
pub type VisibilityMap = BTreeMap<String, bool>;

/// Looks a flattened position back up in the tree.
pub fn resolve(forms: &[Form], position: QuestionPosition) -> Result<&Question, FlowError> {
    forms
        .get(position.form)
        .and_then(|form| form.sections.get(position.section))
        .and_then(|section| section.questions.get(position.question))
        .ok_or(FlowError::MalformedTree { position })
}

/// Keeps the questions whose `hide` flag is unset, in their original order.
pub fn filter_visible(flat: &[FlatQuestion], forms: &[Form]) -> Result<Vec<FlatQuestion>, FlowError> {
    let mut visible = Vec::with_capacity(flat.len());
    for question in flat {
        if !resolve(forms, question.position)?.hide {
            visible.push(question.clone());
        }
    }
    Ok(visible)
}

pub fn visibility_map(flat: &[FlatQuestion], forms: &[Form]) -> Result<VisibilityMap, FlowError> {
    let mut map = VisibilityMap::new();
    for question in flat {
        let visible = !resolve(forms, question.position)?.hide;
        map.insert(question.question_id.clone(), visible);
    }
    Ok(map)
}
