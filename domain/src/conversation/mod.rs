//! Conversation turn entities.
//!
//! A [`ConversationTurn`] records everything exchanged for one user input:
//! the tool round-trips in order and how the turn ended.

use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model answered with text and requested no further tools.
    /// The text may be empty.
    Text(String),
    /// The model returned no candidates. Benign, not an error.
    NoResponse,
}

impl TurnOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            TurnOutcome::Text(text) => Some(text),
            TurnOutcome::NoResponse => None,
        }
    }
}

/// One batch of tool calls and the results submitted back for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRound {
    pub calls: Vec<ToolCall>,
    pub results: Vec<ToolResult>,
}

/// The ordered exchange for one user input.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub user_text: String,
    pub rounds: Vec<ToolRound>,
    pub outcome: TurnOutcome,
}

impl ConversationTurn {
    /// Total number of tool calls dispatched during the turn
    pub fn tool_call_count(&self) -> usize {
        self.rounds.iter().map(|r| r.calls.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::ToolError;

    #[test]
    fn test_turn_outcome_text() {
        assert_eq!(TurnOutcome::Text("hi".to_string()).text(), Some("hi"));
        assert_eq!(TurnOutcome::NoResponse.text(), None);
    }

    #[test]
    fn test_tool_call_count() {
        let round = ToolRound {
            calls: vec![ToolCall::new("a"), ToolCall::new("b")],
            results: vec![
                ToolResult::failure("a", ToolError::unknown_tool("a")),
                ToolResult::failure("b", ToolError::unknown_tool("b")),
            ],
        };
        let turn = ConversationTurn {
            user_text: "go".to_string(),
            rounds: vec![round.clone(), round],
            outcome: TurnOutcome::Text(String::new()),
        };
        assert_eq!(turn.tool_call_count(), 4);
    }
}
