//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for toolchat
#[derive(Parser, Debug)]
#[command(name = "toolchat")]
#[command(author, version, about = "Chat with Gemini, letting it run shell commands and read files")]
#[command(long_about = r#"
toolchat is an interactive chat with a Gemini model that may call local tools:

  run_shell_command   Runs `<shell> -c <command>` under the project root
  read_many_files     Reads files and glob matches under the project root

Each line you type is one turn. The model may call tools any number of times
before it answers. Press Ctrl-C during a turn to cancel it; type `quit` (or
send end-of-input) to exit.

The API key is read from GEMINI_API_KEY.

Configuration files are loaded from (in priority order):
1. TOOLCHAT_* environment variables (e.g. TOOLCHAT_MODEL__NAME)
2. --config <path>     Explicit config file
3. ./toolchat.toml     Project-level config
4. ~/.config/toolchat/config.toml   Global config

Example:
  toolchat
  toolchat --model gemini-1.5-pro --project-root ~/src/app
  toolchat --max-tool-rounds 10 -vv
"#)]
pub struct Cli {
    /// Gemini model to chat with (overrides config)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Directory tools run in and resolve paths against (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Maximum tool round-trips per turn (default: unlimited)
    #[arg(long, value_name = "N")]
    pub max_tool_rounds: Option<usize>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress tool-call notices and the waiting spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
