use crate::traits::{ToolDescriptor, ToolResult};
use async_trait::async_trait;

pub type ToolArgs = serde_json::Map<String, serde_json::Value>;

/// An opaque capability source. The registry owns one handle per provider id
/// and only the dispatcher calls `invoke`.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolDescriptor>>;

    async fn invoke(&self, local_name: &str, args: ToolArgs) -> anyhow::Result<ToolResult>;

    async fn close(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
