use crate::traits::{Tool, ToolArgs, ToolDescriptor, ToolProvider, ToolResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Exposes a fixed set of in-process tools as one tool provider.
pub struct BuiltinProvider {
    name: String,
    tools: Vec<Arc<dyn Tool>>,
}

impl BuiltinProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ToolProvider for BuiltinProvider {
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolDescriptor>> {
        Ok(self.tools.iter().map(|t| t.descriptor()).collect())
    }

    async fn invoke(&self, local_name: &str, args: ToolArgs) -> anyhow::Result<ToolResult> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == local_name)
            .ok_or_else(|| {
                anyhow::anyhow!("'{}' has no tool named '{}'", self.name, local_name)
            })?;

        tool.execute(serde_json::Value::Object(args)).await
    }
}
