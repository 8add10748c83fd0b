pub mod agent;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod tools;
pub mod traits;

#[cfg(test)]
mod testing;

pub use agent::{AgentLoop, ContextBuilder, ConversationHistory, ConversationTurn, ToolRegistry};
pub use config::{Config, RegistryConfig};
pub use error::{AgentError, Result};
pub use models::{OpenAIModel, create_model, split_tagged_tool_calls};
pub use providers::{BUILTIN_PROVIDERS, BuiltinProvider, build_registry, create_builtin_provider};
pub use tools::{FileReadTool, FileWriteTool, ListDirectoryTool, ShellTool};
pub use traits::{
    ContentBlock, Model, ModelRequest, ModelResponse, Tool, ToolArgs, ToolContent, ToolDescriptor,
    ToolProvider, ToolResult,
};
