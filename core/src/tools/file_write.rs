use crate::tools::{extract_string_arg, workspace_path};
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;

pub struct FileWriteTool {
    workspace: std::path::PathBuf,
}

impl FileWriteTool {
    pub fn new(workspace: impl AsRef<std::path::Path>) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Tool for FileWriteTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file in the workspace, creating parent directories"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path of the file, relative to the workspace"
                },
                "content": {
                    "type": "string",
                    "description": "Content to write to the file"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let path = extract_string_arg(&args, "path")?;
        let content = extract_string_arg(&args, "content")?;
        let full_path = workspace_path(&self.workspace, &path)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        match tokio::fs::write(&full_path, &content).await {
            Ok(_) => Ok(ToolResult::success(format!(
                "Wrote {} bytes to {}",
                content.len(),
                path
            ))),
            Err(e) => Ok(ToolResult::error(format!("Failed to write file: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_nested_file() {
        let tmp = TempDir::new().unwrap();
        let result = FileWriteTool::new(tmp.path())
            .execute(json!({"path": "deep/dir/out.txt", "content": "abc"}))
            .await
            .unwrap();

        assert!(!result.is_error);
        let written = std::fs::read_to_string(tmp.path().join("deep/dir/out.txt")).unwrap();
        assert_eq!(written, "abc");
    }

    #[tokio::test]
    async fn refuses_to_escape_workspace() {
        let tmp = TempDir::new().unwrap();
        let err = FileWriteTool::new(tmp.path())
            .execute(json!({"path": "../escape.txt", "content": "x"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("inside the workspace"));
    }
}
