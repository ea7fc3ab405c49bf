use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single question leaf in the application tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    /// Identifier unique across the whole application.
    pub id: String,
    /// Hidden questions are skipped by the wizard entirely.
    #[serde(default)]
    pub hide: bool,
}

impl Question {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hide: false,
        }
    }

    pub fn hidden(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hide: true,
        }
    }
}
