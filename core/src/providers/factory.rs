use crate::config::Config;
use crate::providers::OpenAIProvider;
use crate::providers::openai::OPENAI_BASE_URL;
use crate::traits::Provider;
use anyhow::{Result, anyhow};
use std::time::Duration;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

pub const AVAILABLE_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama"];

pub fn create_provider(config: &Config) -> Result<Box<dyn Provider>> {
    let provider_name = config.provider.as_deref().unwrap_or("openai");

    let (api_key, default_base_url) = match provider_name.to_lowercase().as_str() {
        "openai" => (
            resolve_api_key_with_fallback(
                &["OPENAI_API_KEY", "TASKPILOT_OPENAI_API_KEY"],
                &config.api_key,
            )?,
            OPENAI_BASE_URL,
        ),
        "openrouter" => (
            resolve_api_key_with_fallback(
                &["OPENROUTER_API_KEY", "TASKPILOT_OPENROUTER_API_KEY"],
                &config.api_key,
            )?,
            OPENROUTER_BASE_URL,
        ),
        "ollama" => (config.api_key.clone(), OLLAMA_BASE_URL),
        _ => {
            return Err(anyhow!(
                "Unknown provider: {}. Available: {}",
                provider_name,
                AVAILABLE_PROVIDERS.join(", ")
            ));
        }
    };

    let provider = OpenAIProvider::new(api_key)
        .with_base_url(config.base_url.as_deref().unwrap_or(default_base_url))
        .with_timeout(Duration::from_secs(config.request_timeout_secs));

    Ok(Box::new(provider))
}

fn resolve_api_key_with_fallback(env_vars: &[&str], config_key: &str) -> Result<String> {
    for var_name in env_vars {
        if let Ok(key) = resolve_api_key_from_env(var_name) {
            return Ok(key);
        }
    }
    if !config_key.is_empty() {
        Ok(config_key.to_string())
    } else {
        Err(anyhow!(
            "No API key found. Set {} or add api_key to the config file",
            env_vars.join(" or ")
        ))
    }
}

fn resolve_api_key_from_env(var_name: &str) -> Result<String> {
    std::env::var(var_name)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| anyhow!("Environment variable {} not set", var_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_rejected() {
        let config = Config {
            provider: Some("carrier-pigeon".into()),
            ..Config::default()
        };

        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown provider: carrier-pigeon"));
    }

    #[test]
    fn ollama_needs_no_api_key() {
        let config = Config {
            provider: Some("ollama".into()),
            ..Config::default()
        };

        assert!(create_provider(&config).is_ok());
    }

    #[test]
    fn config_key_is_used_when_env_is_unset() {
        let key = resolve_api_key_with_fallback(
            &["TASKPILOT_TEST_UNSET_VARIABLE"],
            "sk-from-config",
        )
        .unwrap();
        assert_eq!(key, "sk-from-config");

        assert!(resolve_api_key_with_fallback(&["TASKPILOT_TEST_UNSET_VARIABLE"], "").is_err());
    }
}
