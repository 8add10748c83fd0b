use crate::agent::ConversationTurn;
use crate::traits::{ToolArgs, ToolDescriptor};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    ToolRequest {
        id: String,
        name: String,
        args: ToolArgs,
    },
    /// A tool call whose arguments could not be decoded into an object.
    InvalidToolRequest {
        id: String,
        name: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    pub blocks: Vec<ContentBlock>,
}

impl ModelResponse {
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        Self { blocks }
    }

    pub fn has_tool_requests(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| {
                matches!(
                    b,
                    ContentBlock::ToolRequest { .. } | ContentBlock::InvalidToolRequest { .. }
                )
            })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub system: Option<&'a str>,
    pub history: &'a [ConversationTurn],
    /// `None` when the catalog is empty, so the request carries no tool list.
    pub tools: Option<&'a [ToolDescriptor]>,
}

#[async_trait]
pub trait Model: Send + Sync {
    async fn send(&self, request: ModelRequest<'_>) -> anyhow::Result<ModelResponse>;

    fn name(&self) -> &str {
        "model"
    }
}
