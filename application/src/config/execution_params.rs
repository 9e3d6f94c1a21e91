//! Execution parameters: turn loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control the
//! tool loop in [`RunTurnUseCase`](crate::use_cases::run_turn::RunTurnUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};

/// Turn loop control parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of tool-result submissions within one turn.
    /// `None` lets the model call tools for as long as it wants.
    pub max_tool_rounds: Option<usize>,
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_tool_rounds(mut self, max: usize) -> Self {
        self.max_tool_rounds = Some(max);
        self
    }

    /// Whether `rounds` completed tool rounds exhaust the budget.
    pub fn rounds_exhausted(&self, rounds: usize) -> bool {
        self.max_tool_rounds.is_some_and(|max| rounds >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let params = ExecutionParams::default();
        assert!(params.max_tool_rounds.is_none());
        assert!(!params.rounds_exhausted(10_000));
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default().with_max_tool_rounds(3);
        assert_eq!(params.max_tool_rounds, Some(3));
        assert!(!params.rounds_exhausted(2));
        assert!(params.rounds_exhausted(3));
    }
}
