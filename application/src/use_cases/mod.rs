//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_turn;
pub(crate) mod shared;
pub mod tool_helpers;
