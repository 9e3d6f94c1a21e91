//! Command execution tool: run_shell_command

use async_trait::async_trait;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use toolchat_application::ports::tool_executor::Tool;
use toolchat_domain::tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ResultFields, ToolError},
};
use toolchat_domain::CommandReport;
use tracing::{debug, info};

use super::process::{ProcessError, ProcessExecutor};

/// Tool name constant
pub const RUN_SHELL_COMMAND: &str = "run_shell_command";

/// Get the tool definition for run_shell_command
pub fn run_shell_command_definition(shell: &str) -> ToolDefinition {
    ToolDefinition::new(
        RUN_SHELL_COMMAND,
        format!(
            "This tool executes a given shell command as `{shell} -c <command>`. \
             Command can start background processes using `&`. \
             Command is executed as a subprocess that leads its own process group. \
             Command process group can be terminated as `kill -- -PGID` or signaled as `kill -s SIGNAL -- -PGID`. \
             The following information is returned: \
             Command: Executed command. \
             Directory: Directory (relative to project root) where command was executed, or `(root)`. \
             Stdout: Output on stdout stream. Can be empty or partial on error and for any unwaited background processes. \
             Stderr: Output on stderr stream. Can be empty or partial on error and for any unwaited background processes. \
             Error: Error or `(none)` if no error was reported for the subprocess. \
             Exit Code: Exit code or -1 if terminated by signal. \
             Signal: Signal number or -1 if no signal was received. \
             Background PIDs: List of background processes started. \
             Process Group PGID: Process group started or -1"
        ),
    )
    .with_parameter(
        ToolParameter::new(
            "command",
            format!("Exact {shell} command to execute as `{shell} -c <command>`"),
            true,
        ),
    )
    .with_parameter(ToolParameter::new(
        "description",
        "Brief description of the command for the user. Be specific and concise. \
         Ideally a single sentence. Can be up to 3 sentences for clarity. No line breaks.",
        false,
    ))
    .with_parameter(ToolParameter::new(
        "directory",
        "(OPTIONAL) Directory to run the command in, if not the project root directory. \
         Must be relative to the project root directory and must already exist.",
        false,
    ))
    .with_response_field(ToolParameter::new(CommandReport::COMMAND, "", false))
    .with_response_field(ToolParameter::new(CommandReport::DIRECTORY, "", false))
    .with_response_field(ToolParameter::new(CommandReport::STDOUT, "", false))
    .with_response_field(ToolParameter::new(CommandReport::STDERR, "", false))
    .with_response_field(ToolParameter::new(CommandReport::ERROR, "", false))
    .with_response_field(
        ToolParameter::new(CommandReport::EXIT_CODE, "", false).with_type(ParamType::Number),
    )
    .with_response_field(
        ToolParameter::new(CommandReport::SIGNAL, "", false).with_type(ParamType::Number),
    )
    .with_response_field(
        ToolParameter::new(CommandReport::BACKGROUND_PIDS, "", false)
            .with_type(ParamType::array_of(ParamType::Number)),
    )
    .with_response_field(
        ToolParameter::new(CommandReport::PROCESS_GROUP, "", false).with_type(ParamType::Number),
    )
}

/// Runs shell commands relative to a fixed project root.
///
/// `directory` is joined under the root as given; nothing stops it from
/// pointing outside the root.
pub struct RunShellCommandTool {
    definition: ToolDefinition,
    project_root: PathBuf,
    executor: ProcessExecutor,
}

impl RunShellCommandTool {
    pub fn new(project_root: impl Into<PathBuf>, executor: ProcessExecutor) -> Self {
        Self {
            definition: run_shell_command_definition(executor.shell()),
            project_root: project_root.into(),
            executor,
        }
    }
}

#[async_trait]
impl Tool for RunShellCommandTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        call: &ToolCall,
        cancel: &CancellationToken,
    ) -> Result<ResultFields, ToolError> {
        let command = call
            .require_string("command")
            .map_err(ToolError::invalid_argument)?;
        // Informational only
        if let Some(description) = call.get_string("description") {
            debug!("run_shell_command: {}", description);
        }
        let directory = call
            .get_string("directory")
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let working_dir = match &directory {
            Some(dir) => self.project_root.join(dir),
            None => self.project_root.clone(),
        };

        info!("Running command: {}", command);
        let output = self
            .executor
            .run(command, working_dir, cancel)
            .await
            .map_err(|e| match e {
                ProcessError::Cancelled => ToolError::cancelled(),
                ProcessError::Spawn(_) => ToolError::execution_failed(e.to_string()),
            })?;

        debug!(
            exit_code = output.outcome.exit_code_or_sentinel(),
            signal = output.outcome.signal_or_sentinel(),
            "Command finished"
        );

        Ok(CommandReport {
            command: command.to_string(),
            directory,
            stdout: output.stdout,
            stderr: output.stderr,
            outcome: output.outcome,
            background_pids: Vec::new(),
            process_group: output.process_group,
        }
        .into_fields())
    }
}
