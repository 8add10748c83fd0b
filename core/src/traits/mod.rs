pub mod model;
pub mod provider;
pub mod tool;

pub use model::{ContentBlock, Model, ModelRequest, ModelResponse};
pub use provider::{ToolArgs, ToolProvider};
pub use tool::{Tool, ToolContent, ToolDescriptor, ToolResult};
