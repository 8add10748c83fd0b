use crate::config::Config;
use crate::models::OpenAIModel;
use crate::traits::Model;
use anyhow::{Result, anyhow};
use std::sync::Arc;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

pub fn create_model(config: &Config) -> Result<Arc<dyn Model>> {
    let provider_name = config.provider.as_deref().unwrap_or("openai");

    let model = match provider_name.to_lowercase().as_str() {
        "openai" => {
            let api_key = resolve_api_key_with_fallback(
                &["OPENAI_API_KEY", "SWITCHBOARD_OPENAI_API_KEY"],
                &config.api_key,
            )?;
            OpenAIModel::new(Some(api_key))
        }
        "openrouter" => {
            let api_key = resolve_api_key_with_fallback(
                &["OPENROUTER_API_KEY", "SWITCHBOARD_OPENROUTER_API_KEY"],
                &config.api_key,
            )?;
            OpenAIModel::new(Some(api_key)).with_base_url(OPENROUTER_BASE_URL)
        }
        "ollama" => OpenAIModel::new(None).with_base_url(OLLAMA_BASE_URL),
        _ => {
            return Err(anyhow!(
                "Unknown model provider: {}. Available: openai, openrouter, ollama",
                provider_name
            ));
        }
    };

    let mut model = model
        .with_model(config.model.clone())
        .with_temperature(config.temperature);
    if let Some(base_url) = &config.base_url {
        model = model.with_base_url(base_url.clone());
    }

    Ok(Arc::new(model))
}

fn resolve_api_key_with_fallback(env_vars: &[&str], config_key: &str) -> Result<String> {
    for var_name in env_vars {
        if let Ok(key) = std::env::var(var_name)
            && !key.trim().is_empty()
        {
            return Ok(key);
        }
    }
    if !config_key.is_empty() {
        Ok(config_key.to_string())
    } else {
        Err(anyhow!(
            "No API key found. Set {} or api_key in the config file",
            env_vars.join(" or ")
        ))
    }
}
