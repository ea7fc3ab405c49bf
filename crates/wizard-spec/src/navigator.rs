use crate::answers::AnswerMap;
use crate::flatten::FlatQuestion;

fn is_open(question: &FlatQuestion, answers: &AnswerMap) -> bool {
    !answers.is_answered(&question.question_id)
}

/// First unanswered index strictly after `cursor`.
pub fn find_next(cursor: usize, visible: &[FlatQuestion], answers: &AnswerMap) -> Option<usize> {
    let start = cursor.checked_add(1)?;
    (start..visible.len()).find(|&index| is_open(&visible[index], answers))
}

/// Last unanswered index strictly before `cursor`.
pub fn find_previous(
    cursor: usize,
    visible: &[FlatQuestion],
    answers: &AnswerMap,
) -> Option<usize> {
    let end = cursor.min(visible.len());
    (0..end)
        .rev()
        .find(|&index| is_open(&visible[index], answers))
}

/// First unanswered index in the whole sequence.
pub fn first_unanswered(visible: &[FlatQuestion], answers: &AnswerMap) -> Option<usize> {
    visible
        .iter()
        .position(|question| is_open(question, answers))
}

pub fn unanswered<'a>(visible: &'a [FlatQuestion], answers: &AnswerMap) -> Vec<&'a FlatQuestion> {
    visible
        .iter()
        .filter(|question| is_open(question, answers))
        .collect()
}

pub fn unanswered_count(visible: &[FlatQuestion], answers: &AnswerMap) -> usize {
    visible
        .iter()
        .filter(|question| is_open(question, answers))
        .count()
}
