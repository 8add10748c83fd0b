use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum AgentError {
    /// A tool provider could not be reached or listed during startup.
    #[error("Failed to connect tool provider '{provider}': {message}")]
    ProviderConnection { provider: String, message: String },

    /// Registration was refused (duplicate id, bad id, second provider in single mode).
    #[error("Invalid tool provider: {0}")]
    InvalidProvider(String),

    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    #[error("No tool provider registered as '{0}'")]
    ProviderNotFound(String),

    #[error("Tool '{tool}' failed: {message}")]
    ToolInvocation { tool: String, message: String },

    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Model request failed: {0}")]
    ModelRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AgentError {
    pub fn tool_invocation(tool: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::ToolInvocation {
            tool: tool.into(),
            message: message.to_string(),
        }
    }

    /// Errors that end the current query. Per-tool failures are recorded in
    /// history instead and never unwind the loop.
    pub fn is_fatal_to_query(&self) -> bool {
        !matches!(
            self,
            AgentError::ToolNotFound(_)
                | AgentError::ProviderNotFound(_)
                | AgentError::ToolInvocation { .. }
                | AgentError::InvalidArguments { .. }
        )
    }
}
