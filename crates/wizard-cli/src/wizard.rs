use std::fmt::Write;

use wizard_spec::{AnswerMap, RenderPayload, RenderProgress, RenderQuestion};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: question prompts only.
    Clean,
    /// Verbose output: status, question list, navigation hints.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

pub const COMMAND_HELP: &str =
    "Type an answer and press Enter. Commands: :next :skip :prev :jump N :list :clear :reset :quit";

/// Prints prompts and state for the interactive flow.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
    show_answers_json: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity, show_answers_json: bool) -> Self {
        Self {
            verbosity,
            header_printed: false,
            show_answers_json,
        }
    }

    pub fn show_header(&mut self, payload: &RenderPayload) {
        if self.header_printed {
            return;
        }
        println!(
            "Form wizard: {} visible questions, {} answered",
            payload.progress.total, payload.progress.answered
        );
        println!("{}", COMMAND_HELP);
        self.header_printed = true;
    }

    pub fn show_status(&self, payload: &RenderPayload) {
        if self.verbosity.is_verbose() {
            println!(
                "Status: {} ({}/{}, {:.0}%)",
                payload.status.as_str(),
                payload.progress.answered,
                payload.progress.total,
                payload.progress.percent()
            );
            self.show_questions(payload);
        }
    }

    /// Sidebar-style list of visible questions.
    pub fn show_questions(&self, payload: &RenderPayload) {
        println!("Questions:");
        for question in &payload.questions {
            let marker = if question.current {
                ">"
            } else if question.answered {
                "✓"
            } else {
                " "
            };
            println!(
                "{} {:>3}. {} / {} [{}]",
                marker,
                question.index + 1,
                question.form_name,
                question.section_name,
                question.id
            );
        }
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        println!("{} / {}", prompt.form_name, prompt.section_name);
        println!(
            "{}/{} Question ID: {}",
            prompt.answered, prompt.total, prompt.question_id
        );
        if let Some(value) = &prompt.current_value {
            println!("Current value: {}", value);
        }
        if self.verbosity.is_verbose() {
            let mut moves = Vec::new();
            if prompt.can_go_previous {
                moves.push(":prev");
            }
            if prompt.can_go_next {
                moves.push(":next");
            }
            if !moves.is_empty() {
                println!("Navigation: {}", moves.join(" "));
            }
        }
    }

    pub fn show_notice(&self, message: &str) {
        println!("{}", message);
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid input: {}", error.user_message);
        if let Some(debug) = &error.debug_message {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_empty(&self) {
        println!("No questions available");
    }

    pub fn show_completion(&self, answers: &AnswerMap) {
        println!("All Complete! ✅");
        println!("All visible questions have been answered.");
        match answers.to_cbor() {
            Ok(bytes) => {
                println!("Answers (CBOR hex): {}", encode_hex(&bytes));
            }
            Err(err) => {
                eprintln!("Failed to serialize answers to CBOR: {}", err);
            }
        }
        if self.show_answers_json {
            match answers.to_json_pretty() {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => {
                    eprintln!("Failed to serialize answers to JSON: {}", err);
                }
            }
        }
    }
}

/// Context used to format a single prompt.
pub struct PromptContext {
    pub answered: usize,
    pub total: usize,
    pub question_id: String,
    pub form_name: String,
    pub section_name: String,
    pub current_value: Option<String>,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}

impl PromptContext {
    pub fn new(question: &RenderQuestion, payload: &RenderPayload) -> Self {
        let RenderProgress {
            answered, total, ..
        } = payload.progress;
        let current_value = question
            .value
            .as_ref()
            .filter(|value| value.is_answered())
            .map(|value| value.display());
        Self {
            answered,
            total,
            question_id: question.id.clone(),
            form_name: question.form_name.clone(),
            section_name: question.section_name.clone(),
            current_value,
            can_go_next: payload.can_go_next,
            can_go_previous: payload.can_go_previous,
        }
    }
}

/// Error produced when parsing a line of user input.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(&mut encoded, "{:02x}", byte);
    }
    encoded
}
