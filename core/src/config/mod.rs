use crate::agent::{DEFAULT_MAX_ITERATIONS, DEFAULT_SEPARATOR, RegistryMode};
use crate::error::AgentError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const SWITCHBOARD_DIR: &str = ".switchboard";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    pub mode: RegistryMode,
    pub separator: String,
    /// Built-in tool providers to register, in catalog order.
    pub providers: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            mode: RegistryMode::Multi,
            separator: DEFAULT_SEPARATOR.to_string(),
            providers: vec!["filesystem".to_string(), "shell".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_iterations: usize,
    pub model_timeout_secs: u64,
    pub tool_timeout_secs: u64,
    pub system_prompt: Option<String>,
    pub tag_protocol: bool,
    pub workspace_dir: PathBuf,
    pub registry: RegistryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            base_url: None,
            model: "gpt-4o".to_string(),
            temperature: 1.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model_timeout_secs: 120,
            tool_timeout_secs: 60,
            system_prompt: None,
            tag_protocol: false,
            workspace_dir: get_switchboard_dir().join("workspace"),
            registry: RegistryConfig::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        if config_exists() {
            load_config()
        } else {
            Ok(Config::default())
        }
    }

    pub fn validate(&self) -> std::result::Result<(), AgentError> {
        if self.max_iterations == 0 {
            return Err(AgentError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        match self.registry.mode {
            RegistryMode::Single if self.registry.providers.len() > 1 => {
                Err(AgentError::Config(format!(
                    "single mode takes one tool provider, {} configured",
                    self.registry.providers.len()
                )))
            }
            RegistryMode::Multi if self.registry.separator.is_empty() => Err(
                AgentError::Config("registry.separator must not be empty".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// A zero timeout disables the deadline.
    pub fn model_timeout(&self) -> Option<Duration> {
        (self.model_timeout_secs > 0).then(|| Duration::from_secs(self.model_timeout_secs))
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        (self.tool_timeout_secs > 0).then(|| Duration::from_secs(self.tool_timeout_secs))
    }
}

pub fn get_switchboard_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(SWITCHBOARD_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_switchboard_dir().join("config.toml")
}

pub fn ensure_switchboard_dir() -> Result<PathBuf> {
    let dir = get_switchboard_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).with_context(|| {
            format!("Failed to create switchboard directory at {}", dir.display())
        })?;
    }

    Ok(dir)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found. Run 'switchboard init' to create {}",
                config_path.display()
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", config_path.display(), e)
        }
    })?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    Ok(config)
}

pub fn save_config(config: &Config) -> Result<()> {
    ensure_switchboard_dir()?;
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}
