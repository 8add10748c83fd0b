use crate::tools::{extract_string_arg_opt, workspace_path};
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;

pub struct ListDirectoryTool {
    workspace: std::path::PathBuf,
}

impl ListDirectoryTool {
    pub fn new(workspace: impl AsRef<std::path::Path>) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List the entries of a workspace directory"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory relative to the workspace (defaults to the workspace root)"
                }
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let path = extract_string_arg_opt(&args, "path", ".");
        let full_path = workspace_path(&self.workspace, &path)?;

        let mut reader = match tokio::fs::read_dir(&full_path).await {
            Ok(reader) => reader,
            Err(e) => return Ok(ToolResult::error(format!("Failed to list directory: {}", e))),
        };

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            entries.push(json!({"name": name, "dir": is_dir}));
        }
        entries.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));

        Ok(ToolResult::structured(json!({ "path": path, "entries": entries })))
    }
}
