//! Interactive chat module
//!
//! Provides the line-based interactive loop over standard input.

mod repl;

pub use repl::{ChatRepl, LineReceiver, spawn_line_reader};
