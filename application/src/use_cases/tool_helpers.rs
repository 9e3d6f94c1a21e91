//! Shared helpers for tool use cases.

use std::time::Duration;
use toolchat_domain::tool::entities::ToolCall;

/// Extract a short preview string from tool call arguments.
///
/// Looks for well-known keys (`command`, `paths`, `directory`) first, then
/// falls back to the first string value found. Array arguments are joined
/// with `, `.
pub fn tool_args_preview(call: &ToolCall) -> String {
    let keys = ["command", "paths", "directory"];
    for key in &keys {
        match call.arguments.get(*key) {
            Some(serde_json::Value::String(s)) => return truncate_preview(s, 50),
            Some(serde_json::Value::Array(items)) => {
                let joined = items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                return truncate_preview(&joined, 50);
            }
            _ => {}
        }
    }
    // Fallback: first string value
    for value in call.arguments.values() {
        if let Some(s) = value.as_str() {
            return truncate_preview(s, 50);
        }
    }
    String::new()
}

/// Shorten `s` to at most `max_len` characters, marking the cut with `…`.
/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
pub(crate) fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_key_preferred() {
        let call = ToolCall::new("run_shell_command")
            .with_arg("description", "list files")
            .with_arg("command", "ls -la");
        assert_eq!(tool_args_preview(&call), "ls -la");
    }

    #[test]
    fn test_paths_array_joined() {
        let call = ToolCall::new("read_many_files").with_arg("paths", json!(["a.txt", "src/*.rs"]));
        assert_eq!(tool_args_preview(&call), "a.txt, src/*.rs");
    }

    #[test]
    fn test_non_string_entries_skipped() {
        let call = ToolCall::new("read_many_files").with_arg("paths", json!(["a.txt", 7]));
        assert_eq!(tool_args_preview(&call), "a.txt");
    }

    #[test]
    fn test_fallback_to_first_string() {
        let call = ToolCall::new("other").with_arg("foo", "bar");
        assert_eq!(tool_args_preview(&call), "bar");
    }

    #[test]
    fn test_empty_args() {
        assert_eq!(tool_args_preview(&ToolCall::new("other")), "");
    }

    #[test]
    fn test_no_string_values() {
        let call = ToolCall::new("other").with_arg("count", 42);
        assert_eq!(tool_args_preview(&call), "");
    }

    #[test]
    fn test_truncation() {
        let call = ToolCall::new("run_shell_command").with_arg("command", "a".repeat(100));
        let result = tool_args_preview(&call);
        assert_eq!(result.chars().count(), 50);
        assert!(result.ends_with('…'));
    }

    #[test]
    fn test_duration_ms_saturates() {
        assert_eq!(duration_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(duration_ms(Duration::from_micros(999)), 0);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }
}
