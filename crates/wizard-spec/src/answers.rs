use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Value stored for a single question.
///
/// Serialized untagged: `null`, a string, or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    Absent,
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    /// Empty text, empty lists and `null` all count as unanswered.
    ///
    /// A list is answered as soon as it has an element, whatever the
    /// element contents are.
    pub fn is_answered(&self) -> bool {
        match self {
            AnswerValue::Absent => false,
            AnswerValue::Text(text) => !text.is_empty(),
            AnswerValue::List(items) => !items.is_empty(),
        }
    }

    /// Text shown by presenters; lists are joined with `", "`.
    pub fn display(&self) -> String {
        match self {
            AnswerValue::Absent => String::new(),
            AnswerValue::Text(text) => text.clone(),
            AnswerValue::List(items) => items.join(", "),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::List(value)
    }
}

/// Answered predicate over an optional lookup result; a missing key is
/// unanswered.
pub fn is_answered(value: Option<&AnswerValue>) -> bool {
    value.is_some_and(AnswerValue::is_answered)
}

/// Answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, AnswerValue>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    /// Inserts or replaces the value for `question_id`.
    pub fn set(&mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(question_id.into(), value.into());
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        is_answered(self.get(question_id))
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerMap
where
    K: Into<String>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
