//! CLI entrypoint for toolchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use toolchat_application::{LlmGateway, RunTurnUseCase, ToolExecutorPort, ToolSchemaPort};
use toolchat_infrastructure::{
    ConfigLoader, FileConfig, GeminiLlmGateway, GeminiToolConverter, JsonlConversationLogger,
    default_registry,
};
use toolchat_presentation::{ChatRepl, Cli};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        println!("Effective configuration:");
        print!(
            "{}",
            config
                .to_toml_string()
                .context("Failed to render configuration")?
        );
        return Ok(());
    }

    // Held until exit so buffered log lines reach the file
    let _log_guard = init_logging(cli.verbose, config.logging.log_file.as_deref())?;

    info!("Starting toolchat");

    let api_key = match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => bail!("{} environment variable not set", API_KEY_VAR),
    };

    // === Dependency Injection ===
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let project_root = config.tools.resolve_project_root(cwd);
    info!(
        project_root = %project_root.display(),
        shell = %config.tools.shell,
        "Tools rooted"
    );

    let registry = Arc::new(default_registry(project_root, &config.tools.shell));
    let declarations = GeminiToolConverter.all_tools_schema(registry.tool_spec());

    let gateway = GeminiLlmGateway::new(api_key, &config.model.name, &config.model.api_base)
        .context("Failed to create Gemini client")?
        .with_system_prompt(config.model.system_prompt.clone());
    let session = gateway.create_session(declarations).await?;

    let mut use_case = RunTurnUseCase::new(registry);
    if let Some(path) = &config.logging.conversation_log
        && let Some(logger) = JsonlConversationLogger::open(path)
    {
        info!("Conversation transcript: {}", path);
        use_case = use_case.with_conversation_logger(Arc::new(logger));
    }

    let repl = ChatRepl::new(use_case, session)
        .with_execution(config.execution.to_execution_params())
        .with_progress(!cli.quiet);

    repl.run().await.context("Error reading input")?;
    Ok(())
}

/// Load configuration files, then apply command-line overrides.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if let Some(model) = &cli.model {
        config.model.name = model.clone();
    }
    if let Some(root) = &cli.project_root {
        config.tools.project_root = Some(root.to_string_lossy().into_owned());
    }
    if let Some(rounds) = cli.max_tool_rounds {
        config.execution.max_tool_rounds = Some(rounds);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Initialize logging based on verbosity level.
///
/// With a log file configured, diagnostics go there instead of stderr.
fn init_logging(verbose: u8, log_file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(log_file) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let path = Path::new(log_file);
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("logging.log_file has no file name: {}", log_file))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(Some(guard))
}
