// src/view.rs
//! Pure projection of a [`Session`] into the structures the browser shell renders.

use serde::Serialize;

use crate::language::{Language, editor_mode_for};
use crate::session::{RunResult, RunStatus, Session};

pub const INPUT_PLACEHOLDER: &str = "Type input here, separate lines with newline...";
pub const OUTPUT_PLACEHOLDER: &str = "No output yet — run your code.";
pub const TIMEOUT_INDICATOR: &str = "⚠️ Execution timed out";
/// Joins the timeout indicator and the exit code on the status line.
pub const STATUS_SEPARATOR: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguagePicker {
    pub selected: &'static str,
    pub options: Vec<LanguageOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorView {
    pub mode: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputView {
    pub text: String,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum OutputBlock {
    Stdout(String),
    Stderr(String),
    Placeholder(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPanel {
    pub blocks: Vec<OutputBlock>,
    pub status_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    pub enabled: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub status: RunStatus,
    pub picker: LanguagePicker,
    pub editor: EditorView,
    pub input: InputView,
    pub output: OutputPanel,
    pub run: Control,
    pub save: Control,
}

pub fn render(session: &Session) -> View {
    View {
        status: session.status(),
        picker: language_picker(session.language()),
        editor: editor(session.language().as_str(), session.source()),
        input: InputView {
            text: session.input().to_string(),
            placeholder: INPUT_PLACEHOLDER,
        },
        output: output_panel(session.result()),
        run: run_control(session.status()),
        save: Control { enabled: true, label: "Save" },
    }
}

pub fn language_picker(selected: Language) -> LanguagePicker {
    LanguagePicker {
        selected: selected.as_str(),
        options: Language::ALL
            .iter()
            .map(|lang| LanguageOption { id: lang.as_str(), label: lang.label() })
            .collect(),
    }
}

/// Takes the raw language token so that anything the editor does not know renders as
/// plain text.
pub fn editor(language_token: &str, text: &str) -> EditorView {
    EditorView {
        mode: editor_mode_for(language_token),
        text: text.to_string(),
    }
}

pub fn output_panel(result: &RunResult) -> OutputPanel {
    let mut blocks = Vec::new();
    if !result.stdout.is_empty() {
        blocks.push(OutputBlock::Stdout(result.stdout.clone()));
    }
    if !result.stderr.is_empty() {
        blocks.push(OutputBlock::Stderr(result.stderr.clone()));
    }
    if blocks.is_empty() {
        blocks.push(OutputBlock::Placeholder(OUTPUT_PLACEHOLDER));
    }

    OutputPanel { blocks, status_line: status_line(result) }
}

/// Timeout indicator and exit code, each only when there is something to say.
pub fn status_line(result: &RunResult) -> String {
    let mut parts = Vec::new();
    if result.timed_out {
        parts.push(TIMEOUT_INDICATOR.to_string());
    }
    if let Some(code) = result.exit_code {
        parts.push(format!("Exit code: {}", code));
    }
    parts.join(STATUS_SEPARATOR)
}

pub fn run_control(status: RunStatus) -> Control {
    match status {
        RunStatus::Pending => Control { enabled: false, label: "Running..." },
        RunStatus::Idle | RunStatus::Completed => Control { enabled: true, label: "Run" },
    }
}
