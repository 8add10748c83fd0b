use crate::agent::ToolRegistry;
use std::fmt::Write;
use std::path::Path;

const DEFAULT_IDENTITY: &str = "You are a helpful assistant with access to external tools. \
Call a tool whenever it helps answer the user, then answer using its results.";

/// Builds the system prompt sent alongside the conversation history.
pub struct ContextBuilder {
    pub workspace: std::path::PathBuf,
    pub identity: Option<String>,
    pub tag_protocol: bool,
}

impl ContextBuilder {
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
            identity: None,
            tag_protocol: false,
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Also describe the `<tool_call>` text protocol, for models without
    /// native tool calling.
    pub fn with_tag_protocol(mut self, enabled: bool) -> Self {
        self.tag_protocol = enabled;
        self
    }

    pub fn build_system_prompt(&self, registry: &ToolRegistry) -> String {
        let mut parts = vec![
            self.identity
                .clone()
                .unwrap_or_else(|| DEFAULT_IDENTITY.to_string()),
            self.get_runtime_context(),
        ];

        if let Some(tools) = self.get_tool_context(registry) {
            parts.push(tools);
        }

        parts.join("\n\n---\n\n")
    }

    fn get_runtime_context(&self) -> String {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M (%A)");

        format!(
            "## Runtime Context

### Current Time
{}

### Workspace
{}",
            timestamp,
            self.workspace.display()
        )
    }

    fn get_tool_context(&self, registry: &ToolRegistry) -> Option<String> {
        if registry.is_empty() {
            return None;
        }

        let mut context = String::from("## Tools\n\n");
        let _ = writeln!(
            context,
            "Tool providers: {}",
            registry.provider_ids().join(", ")
        );

        if self.tag_protocol {
            context.push_str("\nTo use a tool, wrap a JSON object in <tool_call> tags:\n\n");
            context.push_str("```\n<tool_call>\n{\"name\": \"tool_name\", \"arguments\": {\"param\": \"value\"}}\n</tool_call>\n```\n\n");
            context.push_str("You may use multiple tool calls in a single response.\n\n");
            for entry in registry.entries() {
                let descriptor = &entry.descriptor;
                let _ = writeln!(
                    context,
                    "**{}**: {}\nParameters: `{}`\n",
                    descriptor.name, descriptor.description, descriptor.input_schema
                );
            }
        }

        Some(context)
    }
}
