//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::console::{ConsoleFormatter, ConsoleProgress};
use colored::Colorize;
use std::future::Future;
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use toolchat_application::{
    ExecutionParams, LlmSession, NoTurnProgress, RunTurnInput, RunTurnUseCase,
    TurnProgressNotifier,
};
use tracing::{error, info, warn};

const QUIT_COMMAND: &str = "quit";

/// Input lines as they arrive from the reader thread
pub type LineReceiver = mpsc::Receiver<io::Result<String>>;

/// Read `reader` line by line on a dedicated thread.
///
/// Blocking reads stay off the runtime so shutdown never waits for the
/// next line. The channel closes at end of input or after the first read
/// error.
pub fn spawn_line_reader<R>(reader: R) -> io::Result<LineReceiver>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    std::thread::Builder::new()
        .name("toolchat-input".to_string())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: RunTurnUseCase,
    session: Box<dyn LlmSession>,
    execution: ExecutionParams,
    progress: ConsoleProgress,
    show_progress: bool,
}

impl ChatRepl {
    /// Create a new ChatRepl over an open session
    pub fn new(use_case: RunTurnUseCase, session: Box<dyn LlmSession>) -> Self {
        Self {
            use_case,
            session,
            execution: ExecutionParams::default(),
            progress: ConsoleProgress::new(),
            show_progress: true,
        }
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    /// Set whether to show tool notices and the spinner
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL on standard input
    pub async fn run(&self) -> io::Result<()> {
        let lines = spawn_line_reader(io::BufReader::new(io::stdin()))?;
        self.run_with(lines, tokio::signal::ctrl_c).await
    }

    /// Run the loop over any line source.
    ///
    /// Returns `Ok` on `quit`, end of input, or when `interrupt` resolves
    /// while waiting at the prompt. A read error ends the loop and is
    /// returned.
    pub async fn run_with<F, Fut>(&self, mut lines: LineReceiver, interrupt: F) -> io::Result<()>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = io::Result<()>>,
    {
        println!("Enter your messages (type '{}' to exit):", QUIT_COMMAND);

        loop {
            print!("> ");
            io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.recv() => line,
                Ok(()) = interrupt() => {
                    println!();
                    break;
                }
            };

            let line = match line {
                Some(Ok(line)) => line,
                None => break,
                Some(Err(e)) => {
                    error!("Error reading input: {}", e);
                    return Err(e);
                }
            };

            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            if text == QUIT_COMMAND {
                break;
            }

            self.process_message(text).await;
        }

        Ok(())
    }

    fn notifier(&self) -> &dyn TurnProgressNotifier {
        if self.show_progress {
            &self.progress
        } else {
            &NoTurnProgress
        }
    }

    async fn process_message(&self, text: &str) {
        let cancel = CancellationToken::new();

        // Ctrl-C cancels only the turn in flight.
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let input = RunTurnInput::new(text, self.execution.clone());
        let result = self
            .use_case
            .execute(self.session.as_ref(), input, self.notifier(), &cancel)
            .await;

        watcher.abort();
        self.progress.finish();

        match result {
            Ok(turn) => {
                info!(
                    rounds = turn.rounds.len(),
                    tool_calls = turn.tool_call_count(),
                    "Turn finished"
                );
                if let Some(line) = ConsoleFormatter::format_outcome(&turn.outcome) {
                    println!("{}", line);
                }
            }
            Err(e) if e.is_cancelled() => {
                println!("{}", "Cancelled.".yellow());
            }
            Err(e) => {
                warn!("Turn failed: {}", e);
                eprintln!("Error sending message: {}", e);
            }
        }
    }
}
