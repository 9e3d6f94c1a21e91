//! Console output for conversation turns

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use toolchat_application::{TurnProgressNotifier, tool_args_preview};
use toolchat_domain::{ToolCall, ToolResult, TurnOutcome};

/// Formats turn output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Line printed for a finished turn, if any.
    ///
    /// Empty model text prints nothing.
    pub fn format_outcome(outcome: &TurnOutcome) -> Option<String> {
        match outcome {
            TurnOutcome::Text(text) if text.is_empty() => None,
            TurnOutcome::Text(text) => Some(format!("Gemini: {}", text)),
            TurnOutcome::NoResponse => Some("No response candidates".to_string()),
        }
    }

    pub fn format_tool_call(call: &ToolCall) -> String {
        let preview = tool_args_preview(call);
        if preview.is_empty() {
            format!("{} {}", "->".cyan(), call.tool_name.bold())
        } else {
            format!(
                "{} {}({})",
                "->".cyan(),
                call.tool_name.bold(),
                preview.dimmed()
            )
        }
    }

    pub fn format_tool_result(result: &ToolResult, duration_ms: u64) -> String {
        match result.error() {
            None => format!("   {} {}ms", "v".green(), duration_ms),
            Some(err) => format!(
                "   {} {}: {}",
                "x".red(),
                err.code.red(),
                err.message
            ),
        }
    }
}

/// Prints tool-call notices and shows a spinner while the model is working
pub struct ConsoleProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&self, message: String) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(old) = slot.take() {
                old.finish_and_clear();
            }
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.set_message(message);
            pb.enable_steady_tick(Duration::from_millis(100));
            *slot = Some(pb);
        }
    }

    /// Clear any spinner left from the current turn
    pub fn finish(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ConsoleProgress {
    fn on_model_request(&self, round: usize) {
        let message = if round == 0 {
            "Thinking...".to_string()
        } else {
            format!("Sending tool results (round {})...", round)
        };
        self.start_spinner(message);
    }

    fn on_tool_call(&self, call: &ToolCall) {
        self.finish();
        println!("{}", ConsoleFormatter::format_tool_call(call));
    }

    fn on_tool_result(&self, _call: &ToolCall, result: &ToolResult, duration_ms: u64) {
        println!("{}", ConsoleFormatter::format_tool_result(result, duration_ms));
    }
}
