//! Multi-file read tool: read_many_files
//!
//! Expands paths and glob patterns under the project root and concatenates
//! every file into one string. Each entry is introduced by a marker:
//!
//! | Case | Output |
//! |------|--------|
//! | missing | `---<path> (Not Found)---` |
//! | stat failure | `---<path> (Error: <msg>)---` |
//! | directory | `---<path> (Directory)---` |
//! | read failure | `---<path> (Error reading: <msg>)---` |
//! | contains a NUL byte | `---<path> (Binary File, content not included)---` |
//! | text | `---<path> --- <content>` |
//!
//! Every entry ends with a newline. There is no size limit.

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio_util::sync::CancellationToken;
use toolchat_application::ports::tool_executor::Tool;
use toolchat_domain::tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ResultFields, ToolError},
};
use tracing::{debug, info};

/// Tool name constant
pub const READ_MANY_FILES: &str = "read_many_files";

const GLOB_METACHARACTERS: &[char] = &['*', '?', '[', ']'];

/// Get the tool definition for read_many_files
pub fn read_many_files_definition() -> ToolDefinition {
    let string_list = || ParamType::array_of(ParamType::String);

    ToolDefinition::new(
        READ_MANY_FILES,
        "Reads content from multiple files specified by paths or glob patterns within a \
         configured target directory. For text files, it concatenates their content into a \
         single string, separated by '--- {filePath} ---'. Binary files (images, PDFs, etc.) \
         will be listed by their path with a note that their content is not included. Glob \
         patterns like 'src/**/*.js' are supported. Paths are relative to the project root. \
         Avoid using for single files if a more specific single-file reading tool is available, \
         unless the user specifically requests to process a list containing just one file via \
         this tool.",
    )
    .with_parameter(
        ToolParameter::new(
            "paths",
            "Required. An array of glob patterns or paths relative to the tool's target \
             directory. Examples: ['src/**/*.ts'], ['README.md', 'docs/']",
            true,
        )
        .with_type(string_list()),
    )
    .with_parameter(
        ToolParameter::new(
            "exclude",
            "Optional. Glob patterns for files/directories to exclude. Added to default \
             excludes if useDefaultExcludes is true. Example: \"**/*.log\", \"temp/\"",
            false,
        )
        .with_type(string_list()),
    )
    .with_parameter(
        ToolParameter::new(
            "include",
            "Optional. Additional glob patterns to include. These are merged with `paths`. \
             Example: \"*.test.ts\" to specifically add test files if they were broadly excluded.",
            false,
        )
        .with_type(string_list()),
    )
    .with_parameter(
        ToolParameter::new(
            "recursive",
            "Optional. Whether to search recursively (primarily controlled by `**` in glob \
             patterns). Defaults to true.",
            false,
        )
        .with_type(ParamType::Boolean),
    )
    .with_parameter(
        ToolParameter::new(
            "useDefaultExcludes",
            "Optional. Whether to apply a list of default exclusion patterns (e.g., \
             node_modules, .git, binary files). Defaults to true.",
            false,
        )
        .with_type(ParamType::Boolean),
    )
    .with_parameter(
        ToolParameter::new(
            "file_filtering_options",
            "Whether to respect ignore patterns from .gitignore or .geminiignore (not fully \
             implemented in this version)",
            false,
        )
        .with_type(ParamType::object(vec![
            ToolParameter::new(
                "respect_gemini_ignore",
                "Optional: Whether to respect .geminiignore patterns when listing files. \
                 Defaults to true.",
                false,
            )
            .with_type(ParamType::Boolean),
            ToolParameter::new(
                "respect_git_ignore",
                "Optional: Whether to respect .gitignore patterns when listing files. Only \
                 available in git repositories. Defaults to true.",
                false,
            )
            .with_type(ParamType::Boolean),
        ])),
    )
    .with_response_field(ToolParameter::new(
        "content",
        "Concatenated markers and file contents",
        false,
    ))
}

/// Reads files and glob matches relative to a fixed project root.
///
/// `exclude`, `include`, `recursive`, `useDefaultExcludes` and
/// `file_filtering_options` are accepted but have no effect.
pub struct ReadManyFilesTool {
    definition: ToolDefinition,
    project_root: PathBuf,
}

impl ReadManyFilesTool {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            definition: read_many_files_definition(),
            project_root: project_root.into(),
        }
    }

    /// Expand every entry into concrete paths, deduplicated in first-seen order.
    fn resolve_paths(&self, entries: &[serde_json::Value]) -> Result<Vec<PathBuf>, ToolError> {
        let mut resolved = Vec::new();

        for entry in entries {
            let pattern = entry.as_str().ok_or_else(|| {
                ToolError::invalid_argument(format!("invalid path pattern: {}", entry))
            })?;
            let joined = clean_join(&self.project_root, pattern);

            if pattern.contains(GLOB_METACHARACTERS) {
                let matches = glob::glob(&self.glob_pattern(&joined)).map_err(|e| {
                    ToolError::invalid_argument(format!(
                        "error globbing pattern {}: {}",
                        pattern, e
                    ))
                })?;
                for entry in matches {
                    match entry {
                        Ok(path) => resolved.push(path),
                        Err(e) => debug!("Skipping unreadable glob match: {}", e),
                    }
                }
            } else {
                resolved.push(joined);
            }
        }

        let mut seen = HashSet::new();
        resolved.retain(|p| seen.insert(p.clone()));
        Ok(resolved)
    }

    /// Glob pattern for `joined` with the project root matched literally.
    ///
    /// A pattern that climbs out of the root with `..` is used as is.
    fn glob_pattern(&self, joined: &Path) -> String {
        let root = clean_join(&self.project_root, "");
        match joined.strip_prefix(&root) {
            Ok(rest) => Path::new(&glob::Pattern::escape(&root.to_string_lossy()))
                .join(rest)
                .to_string_lossy()
                .into_owned(),
            Err(_) => joined.to_string_lossy().into_owned(),
        }
    }
}

/// Join `relative` under `root` and resolve `.` and `..` lexically.
///
/// A leading `/` in `relative` does not escape the root, but `..` can.
fn clean_join(root: &Path, relative: &str) -> PathBuf {
    let relative = Path::new(relative).components().filter(|c| {
        !matches!(c, Component::RootDir | Component::Prefix(_))
    });

    let mut cleaned = PathBuf::new();
    for component in root.components().chain(relative) {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(
                    cleaned.components().next_back(),
                    Some(Component::Normal(_))
                ) {
                    cleaned.pop();
                } else if !cleaned.has_root() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Render the marker or content block for one path.
async fn render_entry(path: &Path, out: &mut String) {
    let shown = path.display();

    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let _ = writeln!(out, "---{} (Not Found)---", shown);
            return;
        }
        Err(e) => {
            let _ = writeln!(out, "---{} (Error: {})---", shown, e);
            return;
        }
    };

    if metadata.is_dir() {
        let _ = writeln!(out, "---{} (Directory)---", shown);
        return;
    }

    match tokio::fs::read(path).await {
        Err(e) => {
            let _ = writeln!(out, "---{} (Error reading: {})---", shown, e);
        }
        Ok(data) if data.contains(&0) => {
            let _ = writeln!(out, "---{} (Binary File, content not included)---", shown);
        }
        Ok(data) => {
            let _ = writeln!(
                out,
                "---{} --- {}",
                shown,
                String::from_utf8_lossy(&data)
            );
        }
    }
}

#[async_trait]
impl Tool for ReadManyFilesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        call: &ToolCall,
        cancel: &CancellationToken,
    ) -> Result<ResultFields, ToolError> {
        let entries = call.get_array("paths").ok_or_else(|| {
            ToolError::invalid_argument("missing or invalid 'paths' argument")
        })?;

        let paths = self.resolve_paths(entries)?;
        info!("Reading {} paths", paths.len());

        let mut content = String::new();
        for path in &paths {
            if cancel.is_cancelled() {
                return Err(ToolError::cancelled());
            }
            render_entry(path, &mut content).await;
        }

        let mut fields = ResultFields::new();
        fields.insert("content".to_string(), serde_json::Value::String(content));
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn read(paths: serde_json::Value) -> ToolCall {
        ToolCall::new(READ_MANY_FILES).with_arg("paths", paths)
    }

    async fn content(root: &Path, paths: serde_json::Value) -> String {
        let fields = ReadManyFilesTool::new(root)
            .execute(&read(paths), &CancellationToken::new())
            .await
            .unwrap();
        fields["content"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_clean_join() {
        let root = Path::new("/project");
        assert_eq!(clean_join(root, "a/./b"), PathBuf::from("/project/a/b"));
        assert_eq!(clean_join(root, "a/../b"), PathBuf::from("/project/b"));
        assert_eq!(clean_join(root, "/etc/hosts"), PathBuf::from("/project/etc/hosts"));
        assert_eq!(clean_join(root, "../outside"), PathBuf::from("/outside"));
        assert_eq!(clean_join(root, "docs/"), PathBuf::from("/project/docs"));
        assert_eq!(clean_join(Path::new("."), "x"), PathBuf::from("x"));
    }

    #[tokio::test]
    async fn test_text_missing_and_directory_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.txt"), "alpha").unwrap();
        fs::create_dir(root.join("sub")).unwrap();

        let out = content(root, json!(["a.txt", "missing.txt", "sub"])).await;

        let expected = format!(
            "---{a} --- alpha\n---{m} (Not Found)---\n---{s} (Directory)---\n",
            a = root.join("a.txt").display(),
            m = root.join("missing.txt").display(),
            s = root.join("sub").display(),
        );
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn test_dedupe_across_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.txt"), "alpha").unwrap();
        fs::write(root.join("b.txt"), "beta").unwrap();

        let out = content(root, json!(["b.txt", "*.txt", "./a.txt"])).await;

        assert_eq!(out.matches("--- alpha").count(), 1);
        assert_eq!(out.matches("--- beta").count(), 1);
        // First-seen order: b.txt from the literal, then a.txt from the glob.
        let b = out.find("beta").unwrap();
        let a = out.find("alpha").unwrap();
        assert!(b < a);
    }

    #[tokio::test]
    async fn test_recursive_glob() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/deep")).unwrap();
        fs::write(root.join("src/deep/x.rs"), "fn x() {}").unwrap();
        fs::write(root.join("src/y.md"), "not rust").unwrap();

        let out = content(root, json!(["src/**/*.rs"])).await;

        assert!(out.contains("fn x() {}"));
        assert!(!out.contains("not rust"));
    }

    #[tokio::test]
    async fn test_glob_treats_root_metacharacters_literally() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj[1]");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("inside.txt"), "inside").unwrap();
        // `proj[1]` read as a pattern would match this sibling instead.
        fs::create_dir(dir.path().join("proj1")).unwrap();
        fs::write(dir.path().join("proj1/outside.txt"), "outside").unwrap();

        let out = content(&root, json!(["*.txt"])).await;

        assert_eq!(
            out,
            format!("---{} --- inside\n", root.join("inside.txt").display())
        );
    }

    #[tokio::test]
    async fn test_glob_without_matches_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let out = content(dir.path(), json!(["*.nothing"])).await;
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn test_null_byte_is_binary_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("notes.txt"), b"abc\0def").unwrap();

        let out = content(root, json!(["notes.txt"])).await;

        assert_eq!(
            out,
            format!(
                "---{} (Binary File, content not included)---\n",
                root.join("notes.txt").display()
            )
        );
    }

    #[tokio::test]
    async fn test_paths_not_array() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReadManyFilesTool::new(dir.path())
            .execute(&read(json!("a.txt")), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ToolError::INVALID_ARGUMENT);
        assert_eq!(err.message, "missing or invalid 'paths' argument");
    }

    #[tokio::test]
    async fn test_non_string_entry() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReadManyFilesTool::new(dir.path())
            .execute(&read(json!(["a.txt", 5])), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ToolError::INVALID_ARGUMENT);
        assert_eq!(err.message, "invalid path pattern: 5");
    }

    #[tokio::test]
    async fn test_malformed_glob() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReadManyFilesTool::new(dir.path())
            .execute(&read(json!(["src/[.rs"])), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ToolError::INVALID_ARGUMENT);
        assert!(err.message.starts_with("error globbing pattern src/[.rs"));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_item() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = ReadManyFilesTool::new(dir.path())
            .execute(&read(json!(["a.txt"])), &cancel)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
    }
}
