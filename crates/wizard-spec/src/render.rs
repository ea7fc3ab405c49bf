use serde_json::{Map, Value, json};

use crate::answers::AnswerValue;
use crate::flow::FlowController;

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// At least one visible question is unanswered.
    NeedInput,
    /// All visible questions are answered.
    Complete,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::NeedInput => "need_input",
            RenderStatus::Complete => "complete",
        }
    }
}

/// Progress counters exposed to renderers.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    pub answered: usize,
    pub total: usize,
    pub fraction: f64,
}

impl RenderProgress {
    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }
}

/// Sidebar entry for one visible question.
#[derive(Debug, Clone)]
pub struct RenderQuestion {
    pub index: usize,
    pub id: String,
    pub form_name: String,
    pub section_name: String,
    pub answered: bool,
    pub current: bool,
    pub value: Option<AnswerValue>,
}

/// Everything a presenter needs to draw the current state of a flow.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub status: RenderStatus,
    pub cursor: Option<usize>,
    pub current: Option<RenderQuestion>,
    pub can_go_next: bool,
    pub can_go_previous: bool,
    pub progress: RenderProgress,
    pub questions: Vec<RenderQuestion>,
}

/// Builds the payload from the live flow state.
pub fn build_render_payload(flow: &FlowController) -> RenderPayload {
    let answers = flow.answers();
    let cursor = flow.current().map(|_| flow.cursor());

    let questions = flow
        .visible()
        .iter()
        .enumerate()
        .map(|(index, question)| RenderQuestion {
            index,
            id: question.question_id.clone(),
            form_name: question.form_name.clone(),
            section_name: question.section_name.clone(),
            answered: answers.is_answered(&question.question_id),
            current: Some(index) == cursor,
            value: answers.get(&question.question_id).cloned(),
        })
        .collect::<Vec<_>>();

    let current = cursor.and_then(|index| questions.get(index).cloned());

    let status = if flow.is_complete() {
        RenderStatus::Complete
    } else {
        RenderStatus::NeedInput
    };

    RenderPayload {
        status,
        cursor,
        current,
        can_go_next: flow.can_go_next(),
        can_go_previous: flow.can_go_previous(),
        progress: RenderProgress {
            answered: flow.answered_count(),
            total: flow.visible().len(),
            fraction: flow.progress(),
        },
        questions,
    }
}

fn question_json(question: &RenderQuestion) -> Value {
    let mut map = Map::new();
    map.insert("index".into(), json!(question.index));
    map.insert("id".into(), Value::String(question.id.clone()));
    map.insert("form_name".into(), Value::String(question.form_name.clone()));
    map.insert(
        "section_name".into(),
        Value::String(question.section_name.clone()),
    );
    map.insert("answered".into(), Value::Bool(question.answered));
    map.insert("current".into(), Value::Bool(question.current));
    if let Some(value) = &question.value {
        map.insert(
            "value".into(),
            serde_json::to_value(value).unwrap_or(Value::Null),
        );
    }
    Value::Object(map)
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let questions = payload
        .questions
        .iter()
        .map(question_json)
        .collect::<Vec<_>>();

    json!({
        "status": payload.status.as_str(),
        "cursor": payload.cursor,
        "current": payload.current.as_ref().map(question_json),
        "can_go_next": payload.can_go_next,
        "can_go_previous": payload.can_go_previous,
        "progress": {
            "answered": payload.progress.answered,
            "total": payload.progress.total,
            "fraction": payload.progress.fraction,
        },
        "questions": questions,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Status: {} ({}/{}, {:.0}%)",
        payload.status.as_str(),
        payload.progress.answered,
        payload.progress.total,
        payload.progress.percent()
    ));

    match (&payload.current, payload.status) {
        (_, RenderStatus::Complete) => {
            lines.push("All visible questions have been answered.".to_string());
        }
        (Some(current), RenderStatus::NeedInput) => {
            lines.push(format!(
                "Current question: {} ({} / {})",
                current.id, current.form_name, current.section_name
            ));
            if let Some(value) = &current.value
                && value.is_answered()
            {
                lines.push(format!("  Current value: {}", value.display()));
            }
        }
        (None, RenderStatus::NeedInput) => {
            lines.push("No questions available".to_string());
        }
    }

    lines.push("Questions:".to_string());
    for question in &payload.questions {
        let marker = if question.current {
            '>'
        } else if question.answered {
            '✓'
        } else {
            ' '
        };
        lines.push(format!(
            "{} {:>3}. {} / {} [{}]",
            marker,
            question.index + 1,
            question.form_name,
            question.section_name,
            question.id
        ));
    }

    lines.join("\n")
}
