use anyhow::bail;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

pub mod file_read;
pub mod file_write;
pub mod list_dir;
pub mod shell;

pub use file_read::FileReadTool;
pub use file_write::FileWriteTool;
pub use list_dir::ListDirectoryTool;
pub use shell::ShellTool;

pub fn extract_string_arg(args: &Value, key: &str) -> anyhow::Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", key))
        .map(|s| s.to_string())
}

pub fn extract_string_arg_opt(args: &Value, key: &str, default: &str) -> String {
    args.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

/// Joins a model-supplied relative path onto the workspace, refusing anything
/// that could land outside it.
pub fn workspace_path(workspace: &Path, relative: &str) -> anyhow::Result<PathBuf> {
    let candidate = Path::new(relative);
    for component in candidate.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => bail!("Path '{}' must stay inside the workspace", relative),
        }
    }
    Ok(workspace.join(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn workspace_path_accepts_relative() {
        let path = workspace_path(Path::new("/ws"), "notes/a.txt").unwrap();
        assert_eq!(path, Path::new("/ws/notes/a.txt"));
        assert_eq!(workspace_path(Path::new("/ws"), ".").unwrap(), Path::new("/ws/."));
    }

    #[test]
    fn workspace_path_rejects_escapes() {
        assert!(workspace_path(Path::new("/ws"), "../etc/passwd").is_err());
        assert!(workspace_path(Path::new("/ws"), "a/../../b").is_err());
        assert!(workspace_path(Path::new("/ws"), "/etc/passwd").is_err());
    }

    #[test]
    fn string_args() {
        let args = json!({"path": "x", "n": 1});
        assert_eq!(extract_string_arg(&args, "path").unwrap(), "x");
        assert!(extract_string_arg(&args, "n").is_err());
        assert_eq!(extract_string_arg_opt(&args, "missing", "."), ".");
    }
}
