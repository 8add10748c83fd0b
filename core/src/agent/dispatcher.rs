use crate::agent::registry::{DEFAULT_PROVIDER_ID, RegistryMode, ToolRegistry};
use crate::error::{AgentError, Result};
use crate::traits::{ToolArgs, ToolProvider, ToolResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Routes effective tool names to the provider that owns them.
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    timeout: Option<Duration>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Splits an effective name into its provider handle and local tool name.
    ///
    /// Only the first separator is significant: local names may contain it.
    pub fn route<'n>(&self, effective_name: &'n str) -> Result<(&Arc<dyn ToolProvider>, &'n str)> {
        match self.registry.mode() {
            RegistryMode::Single => self
                .registry
                .sole_provider()
                .map(|handle| (handle, effective_name))
                .ok_or_else(|| AgentError::ProviderNotFound(DEFAULT_PROVIDER_ID.to_string())),
            RegistryMode::Multi => {
                let (provider_id, local_name) = effective_name
                    .split_once(self.registry.separator())
                    .ok_or_else(|| AgentError::ProviderNotFound(effective_name.to_string()))?;
                self.registry
                    .provider(provider_id)
                    .map(|handle| (handle, local_name))
                    .ok_or_else(|| AgentError::ProviderNotFound(provider_id.to_string()))
            }
        }
    }

    pub async fn dispatch(&self, effective_name: &str, args: ToolArgs) -> Result<ToolResult> {
        let (handle, local_name) = self.route(effective_name)?;
        debug!(tool = %effective_name, local = %local_name, "Dispatching tool call");

        let call = handle.invoke(local_name, args);
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                AgentError::tool_invocation(
                    effective_name,
                    format!("timed out after {}s", limit.as_secs_f64()),
                )
            })?,
            None => call.await,
        };

        outcome.map_err(|e| AgentError::tool_invocation(effective_name, e))
    }
}
