use crate::agent::ToolRegistry;
use crate::config::RegistryConfig;
use crate::error::AgentError;
use crate::providers::BuiltinProvider;
use crate::tools::{FileReadTool, FileWriteTool, ListDirectoryTool, ShellTool};
use crate::traits::ToolProvider;
use anyhow::{Result, anyhow};
use std::path::Path;
use std::sync::Arc;

pub const BUILTIN_PROVIDERS: &[&str] = &["filesystem", "shell"];

pub fn create_builtin_provider(name: &str, workspace: &Path) -> Result<Arc<dyn ToolProvider>> {
    match name.to_lowercase().as_str() {
        "filesystem" => Ok(Arc::new(
            BuiltinProvider::new("filesystem")
                .with_tool(FileReadTool::new(workspace))
                .with_tool(FileWriteTool::new(workspace))
                .with_tool(ListDirectoryTool::new(workspace)),
        )),
        "shell" => Ok(Arc::new(
            BuiltinProvider::new("shell").with_tool(ShellTool::new(workspace)),
        )),
        _ => Err(anyhow!(
            "Unknown tool provider: {}. Available: {}",
            name,
            BUILTIN_PROVIDERS.join(", ")
        )),
    }
}

/// Connects every configured provider, in order, into a fresh registry.
pub async fn build_registry(
    config: &RegistryConfig,
    workspace: &Path,
) -> std::result::Result<ToolRegistry, AgentError> {
    let mut registry = ToolRegistry::new(config.mode, config.separator.clone());

    for configured in &config.providers {
        let name = configured.trim().to_lowercase();
        let handle = create_builtin_provider(&name, workspace).map_err(|e| {
            AgentError::ProviderConnection {
                provider: configured.clone(),
                message: e.to_string(),
            }
        })?;
        registry.connect(&name, handle).await?;
    }

    Ok(registry)
}
