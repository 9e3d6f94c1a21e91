//! Tool implementations
//!
//! Concrete [`Tool`](toolchat_application::ports::tool_executor::Tool)
//! implementations and the registry that dispatches to them:
//!
//! - `run_shell_command`: runs `<shell> -c <command>` in its own process group
//! - `read_many_files`: concatenates files and glob matches under the project root

pub mod command;
pub mod process;
pub mod read_many_files;

mod registry;
mod schema;

pub use command::RunShellCommandTool;
pub use process::{ProcessError, ProcessExecutor, ProcessOutput};
pub use read_many_files::ReadManyFilesTool;
pub use registry::ToolRegistry;
pub use schema::GeminiToolConverter;

use std::path::PathBuf;

/// Build the registry with every built-in tool rooted at `project_root`.
pub fn default_registry(project_root: impl Into<PathBuf>, shell: &str) -> ToolRegistry {
    let project_root = project_root.into();
    ToolRegistry::new()
        .register(RunShellCommandTool::new(
            project_root.clone(),
            ProcessExecutor::new(shell),
        ))
        .register(ReadManyFilesTool::new(project_root))
}
