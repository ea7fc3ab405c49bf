#![allow(missing_docs)]

pub mod answers;
pub mod error;
pub mod flatten;
pub mod flow;
pub mod navigator;
pub mod render;
pub mod spec;
pub mod store;
pub mod visibility;

pub use answers::{AnswerMap, AnswerValue, is_answered};
pub use error::FlowError;
pub use flatten::{FlatQuestion, QuestionPosition, flatten};
pub use flow::{FlowController, FlowState};
pub use navigator::{find_next, find_previous, first_unanswered, unanswered, unanswered_count};
pub use render::{
    RenderPayload, RenderProgress, RenderQuestion, RenderStatus, build_render_payload,
    render_json_ui, render_text,
};
pub use spec::{Application, Form, Question, Section};
pub use store::{
    AnswerStore, MemoryStore, StoreError, load_or_none, remove_or_log, save_or_log,
};
pub use visibility::{VisibilityMap, filter_visible, resolve, visibility_map};
