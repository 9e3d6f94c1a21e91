//! Process execution value objects.
//!
//! - [`ExitOutcome`]: decoded terminal status of a spawned command
//! - [`CommandReport`]: the result fields the shell-command tool reports
//!
//! The field names and sentinels produced by [`CommandReport::into_fields`]
//! form a stable contract with the model and must not change.

use crate::tool::value_objects::ResultFields;
use serde_json::Value;

/// Text reported when no error occurred.
pub const NO_ERROR: &str = "(none)";

/// Directory reported when the command ran in the project root.
pub const ROOT_DIRECTORY: &str = "(root)";

/// Numeric sentinel for absent exit code, signal or process group.
pub const SENTINEL: i64 = -1;

/// Decoded terminal status of a process.
///
/// `exit_code` and `signal` are never both present: a process either exits
/// or is killed by a signal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExitOutcome {
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
    pub error: Option<String>,
}

impl ExitOutcome {
    /// Clean exit with status 0.
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            signal: None,
            error: None,
        }
    }

    /// Normal exit with a non-zero status.
    pub fn exited(code: i32, error: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            signal: None,
            error: Some(error.into()),
        }
    }

    /// Termination by a signal.
    pub fn signaled(signal: i32, error: impl Into<String>) -> Self {
        Self {
            exit_code: None,
            signal: Some(signal),
            error: Some(error.into()),
        }
    }

    /// Failure that is not a process exit at all (e.g. the wait itself failed).
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            exit_code: None,
            signal: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0) && self.error.is_none()
    }

    pub fn exit_code_or_sentinel(&self) -> i64 {
        self.exit_code.map(i64::from).unwrap_or(SENTINEL)
    }

    pub fn signal_or_sentinel(&self) -> i64 {
        self.signal.map(i64::from).unwrap_or(SENTINEL)
    }

    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or(NO_ERROR)
    }
}

/// Everything the shell-command tool reports about one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    pub command: String,
    /// Directory relative to the project root, `None` for the root itself
    pub directory: Option<String>,
    pub stdout: String,
    pub stderr: String,
    pub outcome: ExitOutcome,
    pub background_pids: Vec<u32>,
    pub process_group: Option<i32>,
}

impl CommandReport {
    pub const COMMAND: &'static str = "Command";
    pub const DIRECTORY: &'static str = "Directory";
    pub const STDOUT: &'static str = "Stdout";
    pub const STDERR: &'static str = "Stderr";
    pub const ERROR: &'static str = "Error";
    pub const EXIT_CODE: &'static str = "Exit Code";
    pub const SIGNAL: &'static str = "Signal";
    pub const BACKGROUND_PIDS: &'static str = "Background PIDs";
    pub const PROCESS_GROUP: &'static str = "Process Group PGID";

    /// Convert into the result field mapping handed back to the model.
    pub fn into_fields(self) -> ResultFields {
        let mut fields = ResultFields::new();
        fields.insert(Self::COMMAND.into(), Value::from(self.command));
        fields.insert(
            Self::DIRECTORY.into(),
            Value::from(
                self.directory
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| ROOT_DIRECTORY.to_string()),
            ),
        );
        fields.insert(Self::STDOUT.into(), Value::from(self.stdout));
        fields.insert(Self::STDERR.into(), Value::from(self.stderr));
        fields.insert(Self::ERROR.into(), Value::from(self.outcome.error_text()));
        fields.insert(
            Self::EXIT_CODE.into(),
            Value::from(self.outcome.exit_code_or_sentinel()),
        );
        fields.insert(
            Self::SIGNAL.into(),
            Value::from(self.outcome.signal_or_sentinel()),
        );
        fields.insert(
            Self::BACKGROUND_PIDS.into(),
            Value::Array(self.background_pids.into_iter().map(Value::from).collect()),
        );
        fields.insert(
            Self::PROCESS_GROUP.into(),
            Value::from(self.process_group.map(i64::from).unwrap_or(SENTINEL)),
        );
        fields
    }
}
