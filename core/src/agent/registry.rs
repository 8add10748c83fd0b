use crate::error::{AgentError, Result};
use crate::traits::{ToolDescriptor, ToolProvider};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_PROVIDER_ID: &str = "default";
pub const DEFAULT_SEPARATOR: &str = "_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryMode {
    /// One provider, tools keep their own names.
    Single,
    /// Any number of providers, tool names prefixed with the provider id.
    Multi,
}

impl fmt::Display for RegistryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub provider_id: String,
    pub local_name: String,
    /// Descriptor as the model sees it, carrying the effective name.
    pub descriptor: ToolDescriptor,
}

impl CatalogEntry {
    pub fn effective_name(&self) -> &str {
        &self.descriptor.name
    }
}

pub struct ToolRegistry {
    mode: RegistryMode,
    separator: String,
    providers: HashMap<String, Arc<dyn ToolProvider>>,
    provider_order: Vec<String>,
    entries: Vec<CatalogEntry>,
}

impl ToolRegistry {
    pub fn new(mode: RegistryMode, separator: impl Into<String>) -> Self {
        Self {
            mode,
            separator: separator.into(),
            providers: HashMap::new(),
            provider_order: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn single() -> Self {
        Self::new(RegistryMode::Single, DEFAULT_SEPARATOR)
    }

    pub fn multi(separator: impl Into<String>) -> Self {
        Self::new(RegistryMode::Multi, separator)
    }

    pub fn mode(&self) -> RegistryMode {
        self.mode
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Lists the provider's tools and registers them under `provider_id`.
    pub async fn connect(
        &mut self,
        provider_id: &str,
        handle: Arc<dyn ToolProvider>,
    ) -> Result<usize> {
        let descriptors =
            handle
                .list_tools()
                .await
                .map_err(|e| AgentError::ProviderConnection {
                    provider: provider_id.to_string(),
                    message: e.to_string(),
                })?;
        let count = descriptors.len();
        self.register(provider_id, handle, descriptors)?;
        Ok(count)
    }

    pub fn register(
        &mut self,
        provider_id: &str,
        handle: Arc<dyn ToolProvider>,
        descriptors: Vec<ToolDescriptor>,
    ) -> Result<()> {
        let provider_id = self.validate_provider_id(provider_id)?;

        let mut added = 0;
        for descriptor in descriptors {
            let local_name = descriptor.name.clone();
            if local_name.trim().is_empty() {
                warn!(provider = %provider_id, "Skipping tool with an empty name");
                continue;
            }
            if self
                .entries
                .iter()
                .any(|e| e.provider_id == provider_id && e.local_name == local_name)
            {
                warn!(provider = %provider_id, tool = %local_name, "Duplicate tool name, keeping the first");
                continue;
            }

            let effective_name = match self.mode {
                RegistryMode::Single => local_name.clone(),
                RegistryMode::Multi => format!("{}{}{}", provider_id, self.separator, local_name),
            };

            self.entries.push(CatalogEntry {
                provider_id: provider_id.clone(),
                local_name,
                descriptor: ToolDescriptor {
                    name: effective_name,
                    ..descriptor
                },
            });
            added += 1;
        }

        info!(provider = %provider_id, tools = added, mode = %self.mode, "Registered tool provider");

        self.providers.insert(provider_id.clone(), handle);
        self.provider_order.push(provider_id);
        Ok(())
    }

    fn validate_provider_id(&self, provider_id: &str) -> Result<String> {
        match self.mode {
            RegistryMode::Single => {
                if !self.providers.is_empty() {
                    return Err(AgentError::InvalidProvider(format!(
                        "single-provider mode already has a provider, cannot add '{}'",
                        provider_id
                    )));
                }
                Ok(DEFAULT_PROVIDER_ID.to_string())
            }
            RegistryMode::Multi => {
                if self.separator.is_empty() {
                    return Err(AgentError::InvalidProvider(
                        "multi-provider mode needs a non-empty separator".to_string(),
                    ));
                }
                if provider_id.trim().is_empty() {
                    return Err(AgentError::InvalidProvider(
                        "provider id must not be empty".to_string(),
                    ));
                }
                if provider_id.contains(&self.separator) {
                    return Err(AgentError::InvalidProvider(format!(
                        "provider id '{}' contains the separator '{}'",
                        provider_id, self.separator
                    )));
                }
                if self.providers.contains_key(provider_id) {
                    return Err(AgentError::InvalidProvider(format!(
                        "provider '{}' is already registered",
                        provider_id
                    )));
                }
                Ok(provider_id.to_string())
            }
        }
    }

    /// Effective-name descriptors in registration order.
    pub fn catalog(&self) -> Vec<ToolDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn provider_ids(&self) -> &[String] {
        &self.provider_order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn provider(&self, provider_id: &str) -> Option<&Arc<dyn ToolProvider>> {
        self.providers.get(provider_id)
    }

    pub(crate) fn sole_provider(&self) -> Option<&Arc<dyn ToolProvider>> {
        self.provider_order
            .first()
            .and_then(|id| self.providers.get(id))
    }

    pub async fn close_all(&self) {
        let closing = self.provider_order.iter().filter_map(|id| {
            self.providers
                .get(id)
                .map(|handle| async move { (id, handle.close().await) })
        });

        for (id, result) in join_all(closing).await {
            if let Err(e) = result {
                warn!(provider = %id, "Failed to close tool provider: {}", e);
            }
        }
    }
}
