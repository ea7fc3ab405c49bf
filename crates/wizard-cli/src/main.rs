mod store;
mod wizard;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use store::FileStore;
use wizard::{AnswerParseError, PromptContext, Verbosity, WizardPresenter};
use wizard_spec::{
    AnswerStore, AnswerValue, Application, FlowController, build_render_payload, load_or_none,
    remove_or_log, render_json_ui, render_text, save_or_log,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const DEFAULT_APPLICATION: &str =
    include_str!("../../wizard-spec/tests/fixtures/application.json");
const DEFAULT_KEY: &str = "wizard";
const STORE_DIR_ENV: &str = "FORM_WIZARD_STORE_DIR";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Text-based form wizard",
    long_about = "Walks the unanswered visible questions of a form application and persists answers between runs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

/// Options shared by every command that opens a flow.
#[derive(clap::Args)]
struct FlowArgs {
    /// Application JSON (forms, sections, questions and initial values). Defaults to the bundled sample.
    #[arg(long, value_name = "APP")]
    app: Option<PathBuf>,
    /// Directory holding persisted answers (defaults to FORM_WIZARD_STORE_DIR or the current directory).
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,
    /// Storage key the answers are saved under.
    #[arg(long, default_value = DEFAULT_KEY)]
    key: String,
}

#[derive(Subcommand)]
enum Command {
    /// Answer questions interactively, resuming from persisted answers.
    Run {
        #[command(flatten)]
        flow: FlowArgs,
        /// Show verbose output (status, question list, navigation hints).
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Also emit answer JSON on completion.
        #[arg(long)]
        answers_json: bool,
        /// Render output mode for the wizard display.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Print the current state of the flow once.
    Status {
        #[command(flatten)]
        flow: FlowArgs,
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Remove persisted answers so the next run starts from the initial values.
    Reset {
        #[command(flatten)]
        flow: FlowArgs,
    },
    /// Print the JSON schema of application files.
    Schema,
}

/// One line of user input, interpreted.
#[derive(Debug, PartialEq)]
enum WizardInput {
    Answer(AnswerValue),
    Next,
    Skip,
    Previous,
    Jump(usize),
    List,
    Clear,
    Reset,
    Quit,
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            flow,
            verbose,
            answers_json,
            format,
        } => run_wizard(flow, verbose, answers_json, format),
        Command::Status { flow, format } => run_status(flow, format),
        Command::Reset { flow } => run_reset(flow),
        Command::Schema => run_schema(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, prelude::*};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    if let Err(err) = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("tracing already initialized: {}", err);
    }
}

fn load_application(path: Option<&PathBuf>) -> CliResult<Application> {
    let contents = match path {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_APPLICATION.to_string(),
    };
    Ok(serde_json::from_str(&contents)?)
}

fn resolve_store_dir(dir: Option<PathBuf>) -> CliResult<PathBuf> {
    let candidate = match dir {
        Some(path) => path,
        None => env::var_os(STORE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    if candidate.as_os_str().is_empty() {
        return Err("store directory cannot be empty".into());
    }
    Ok(candidate)
}

/// Keys become file names, so only a conservative character set is accepted.
fn validate_key(key: &str) -> CliResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(format!(
            "invalid storage key '{}'; use letters, digits, '-', '_' or '.'",
            key
        )
        .into())
    }
}

fn open_flow(args: &FlowArgs) -> CliResult<(FlowController, FileStore)> {
    validate_key(&args.key)?;
    let application = load_application(args.app.as_ref())?;
    let store = FileStore::new(resolve_store_dir(args.store_dir.clone())?);
    let persisted = load_or_none(&store, &args.key);
    tracing::debug!(
        key = %args.key,
        store = %store.dir().display(),
        resumed = persisted.is_some(),
        "opening flow"
    );
    let flow = FlowController::initialize(application, persisted)?;
    Ok((flow, store))
}

fn run_status(args: FlowArgs, format: RenderMode) -> CliResult<()> {
    let (flow, _store) = open_flow(&args)?;
    let payload = build_render_payload(&flow);
    match format {
        RenderMode::Text => println!("{}", render_text(&payload)),
        RenderMode::Json => println!("{}", serde_json::to_string_pretty(&render_json_ui(&payload))?),
    }
    Ok(())
}

fn run_reset(args: FlowArgs) -> CliResult<()> {
    validate_key(&args.key)?;
    let mut store = FileStore::new(resolve_store_dir(args.store_dir)?);
    store.remove(&args.key)?;
    println!(
        "Cleared persisted answers '{}' in {}",
        args.key,
        store.dir().display()
    );
    Ok(())
}

fn run_schema() -> CliResult<()> {
    let schema = schemars::schema_for!(Application);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn run_wizard(
    args: FlowArgs,
    verbose: bool,
    answers_json: bool,
    format: RenderMode,
) -> CliResult<()> {
    let (mut flow, mut store) = open_flow(&args)?;
    let key = args.key.as_str();
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose), answers_json);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        if flow.visible().is_empty() {
            presenter.show_empty();
            return Ok(());
        }
        if flow.is_complete() {
            presenter.show_completion(flow.answers());
            return Ok(());
        }

        let payload = build_render_payload(&flow);
        match format {
            RenderMode::Text => {
                presenter.show_header(&payload);
                presenter.show_status(&payload);
            }
            RenderMode::Json => println!("{}", render_json_ui(&payload)),
        }
        let current = payload
            .current
            .as_ref()
            .ok_or("wizard has no current question")?;
        let question_id = current.id.clone();
        presenter.show_prompt(&PromptContext::new(current, &payload));

        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            presenter.show_notice("End of input; answers saved.");
            return Ok(());
        }

        let command = match parse_input(line.trim()) {
            Ok(command) => command,
            Err(err) => {
                presenter.show_parse_error(&err);
                continue;
            }
        };

        match command {
            WizardInput::Answer(value) => {
                flow.set_answer(question_id, value);
                save_or_log(&mut store, key, flow.answers());
                if !flow.is_complete() && !flow.go_next() {
                    presenter.show_notice("No later unanswered question; use :prev to go back.");
                }
            }
            WizardInput::Next => {
                if !flow.go_next() {
                    presenter.show_notice("No later unanswered question.");
                }
            }
            WizardInput::Skip => {
                if !flow.skip() {
                    presenter.show_notice("No later unanswered question to skip to.");
                }
            }
            WizardInput::Previous => {
                if !flow.go_previous() {
                    presenter.show_notice("No earlier unanswered question.");
                }
            }
            WizardInput::Jump(position) => {
                if let Err(err) = flow.jump_to(position - 1) {
                    presenter.show_notice(&format!("Cannot jump: {}", err));
                }
            }
            WizardInput::List => presenter.show_questions(&payload),
            WizardInput::Clear => {
                flow.set_answer(question_id, "");
                save_or_log(&mut store, key, flow.answers());
            }
            WizardInput::Reset => {
                if confirm(&mut input, "Are you sure you want to reset all answers? (y/N)")? {
                    flow.reset();
                    remove_or_log(&mut store, key);
                    presenter.show_notice("Answers reset.");
                }
            }
            WizardInput::Quit => {
                presenter.show_notice("Answers saved; run again to resume.");
                return Ok(());
            }
        }
    }
}

fn confirm(input: &mut impl BufRead, question: &str) -> CliResult<bool> {
    print!("{} ", question);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn parse_input(raw: &str) -> Result<WizardInput, AnswerParseError> {
    if raw.is_empty() {
        return Ok(WizardInput::Next);
    }
    if raw.eq_ignore_ascii_case("exit") {
        return Ok(WizardInput::Quit);
    }
    if let Some(command) = raw.strip_prefix(':') {
        return parse_command(command.trim());
    }
    if raw.starts_with('[') {
        return parse_list(raw).map(WizardInput::Answer);
    }
    Ok(WizardInput::Answer(AnswerValue::Text(raw.to_string())))
}

fn parse_command(command: &str) -> Result<WizardInput, AnswerParseError> {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let argument = parts.next();
    match name.as_str() {
        "next" | "n" => Ok(WizardInput::Next),
        "skip" | "s" => Ok(WizardInput::Skip),
        "prev" | "previous" | "p" => Ok(WizardInput::Previous),
        "list" | "l" => Ok(WizardInput::List),
        "clear" => Ok(WizardInput::Clear),
        "reset" => Ok(WizardInput::Reset),
        "quit" | "q" => Ok(WizardInput::Quit),
        "jump" | "j" => {
            let position = argument
                .and_then(|value| value.parse::<usize>().ok())
                .filter(|value| *value >= 1)
                .ok_or_else(|| {
                    AnswerParseError::new(
                        "Please give the question number to jump to.",
                        Some("expected :jump N with N >= 1 as shown by :list".to_string()),
                    )
                })?;
            Ok(WizardInput::Jump(position))
        }
        other => Err(AnswerParseError::new(
            format!("Unknown command ':{}'.", other),
            Some(wizard::COMMAND_HELP.to_string()),
        )),
    }
}

fn parse_list(raw: &str) -> Result<AnswerValue, AnswerParseError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| {
        AnswerParseError::new(
            "Please enter a JSON list of strings.",
            Some(format!("invalid JSON: {}", err)),
        )
    })?;
    let items = value
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(String::from))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| {
            AnswerParseError::new(
                "List answers may only contain strings.",
                Some(r#"expected ["a", "b"]"#.to_string()),
            )
        })?;
    Ok(AnswerValue::List(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    #[test]
    fn parse_input_treats_text_as_answer() {
        assert_eq!(
            parse_input("hello world").unwrap(),
            WizardInput::Answer(AnswerValue::Text("hello world".into()))
        );
    }

    #[test]
    fn parse_input_empty_line_moves_next() {
        assert_eq!(parse_input("").unwrap(), WizardInput::Next);
    }

    #[test]
    fn parse_input_list_accepts_string_array() {
        assert_eq!(
            parse_input(r#"["a", ""]"#).unwrap(),
            WizardInput::Answer(AnswerValue::List(vec!["a".into(), String::new()]))
        );
        assert_eq!(
            parse_input("[]").unwrap(),
            WizardInput::Answer(AnswerValue::List(vec![]))
        );
    }

    #[test]
    fn parse_input_list_rejects_non_strings() {
        assert!(parse_input("[1, 2]").is_err());
        assert!(parse_input("[oops").is_err());
    }

    #[test]
    fn parse_input_recognizes_commands() {
        assert_eq!(parse_input(":prev").unwrap(), WizardInput::Previous);
        assert_eq!(parse_input(":skip").unwrap(), WizardInput::Skip);
        assert_eq!(parse_input(":jump 3").unwrap(), WizardInput::Jump(3));
        assert_eq!(parse_input("exit").unwrap(), WizardInput::Quit);
        assert!(parse_input(":jump 0").is_err());
        assert!(parse_input(":jump").is_err());
        assert!(parse_input(":bogus").is_err());
    }

    #[test]
    fn validate_key_rejects_path_segments() {
        assert!(validate_key("wizard").is_ok());
        assert!(validate_key("team.form-1").is_ok());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
    }

    #[test]
    fn resolve_store_dir_prefers_explicit_path() {
        let temp_dir = TempDir::new().expect("temp dir");
        let resolved = resolve_store_dir(Some(temp_dir.path().to_path_buf())).expect("dir");
        assert_eq!(resolved, temp_dir.path());
        assert!(resolve_store_dir(Some(PathBuf::new())).is_err());
    }

    #[test]
    fn bundled_application_parses() {
        let application = load_application(None).expect("application");
        assert_eq!(application.forms.len(), 3);
        assert_eq!(application.question_count(), 8);
    }

    #[test]
    fn run_answers_every_question_and_persists() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let answers = [
            "Ada",
            "ada@example.com",
            r#"["rust", "wasm"]"#,
            "no notes",
            "looks good",
        ];
        let stdin = format!("{}\n", answers.join("\n"));

        let output = Command::cargo_bin("form-wizard")?
            .arg("run")
            .arg("--store-dir")
            .arg(workspace.path())
            .write_stdin(stdin)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let stdout = String::from_utf8(output)?;
        assert!(stdout.contains("All Complete!"));
        assert!(stdout.contains("Answers (CBOR hex):"));

        let saved = fs::read_to_string(workspace.child("wizard.json").path())?;
        let saved: Value = serde_json::from_str(&saved)?;
        assert_eq!(saved["applicant.name"], "Ada");
        assert_eq!(saved["prefs.topics"], json!(["rust", "wasm"]));
        assert_eq!(saved["review.rating"], "bar");
        Ok(())
    }

    #[test]
    fn run_resumes_from_persisted_answers() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;

        Command::cargo_bin("form-wizard")?
            .arg("run")
            .arg("--key")
            .arg("session")
            .env(STORE_DIR_ENV, workspace.path())
            .write_stdin("Ada\n:quit\n")
            .assert()
            .success();
        assert!(workspace.child("session.json").path().exists());

        let output = Command::cargo_bin("form-wizard")?
            .args(["status", "--format", "json", "--key", "session"])
            .arg("--store-dir")
            .arg(workspace.path())
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let status: Value = serde_json::from_slice(&output)?;
        assert_eq!(status["cursor"], 1);
        assert_eq!(status["progress"]["answered"], 3);
        assert_eq!(status["current"]["id"], "applicant.email");
        Ok(())
    }

    #[test]
    fn reset_command_clears_persisted_answers() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        workspace.child("wizard.json").write_str(r#"{"applicant.name": "Ada"}"#)?;

        Command::cargo_bin("form-wizard")?
            .arg("reset")
            .arg("--store-dir")
            .arg(workspace.path())
            .assert()
            .success();
        assert!(!workspace.child("wizard.json").path().exists());
        Ok(())
    }

    #[test]
    fn corrupt_store_falls_back_to_initial_values() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        workspace.child("wizard.json").write_str("not json")?;

        let output = Command::cargo_bin("form-wizard")?
            .args(["status", "--format", "json"])
            .arg("--store-dir")
            .arg(workspace.path())
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let status: Value = serde_json::from_slice(&output)?;
        assert_eq!(status["progress"]["answered"], 2);
        assert_eq!(status["cursor"], 0);
        Ok(())
    }

    #[test]
    fn schema_command_describes_forms() -> Result<(), Box<dyn std::error::Error>> {
        let output = Command::cargo_bin("form-wizard")?
            .arg("schema")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let schema: Value = serde_json::from_slice(&output)?;
        assert!(schema["properties"].get("forms").is_some());
        Ok(())
    }
}
