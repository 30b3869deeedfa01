use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const TASKPILOT_DIR: &str = ".taskpilot";

pub const DEFAULT_OBJECTIVE: &str = "Help the user solve problems using available tools";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub objective: String,
    pub system_message: Option<String>,
    pub max_turns: usize,
    pub history_file: Option<PathBuf>,
    pub history_size: usize,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            objective: DEFAULT_OBJECTIVE.to_string(),
            system_message: None,
            max_turns: 10,
            history_file: None,
            history_size: 1000,
            request_timeout_secs: 120,
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

    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| get_taskpilot_dir().join("history"))
    }
}

pub fn get_taskpilot_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(TASKPILOT_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_taskpilot_dir().join("config.toml")
}

pub fn ensure_taskpilot_dir() -> Result<PathBuf> {
    let taskpilot_dir = get_taskpilot_dir();

    if !taskpilot_dir.exists() {
        std::fs::create_dir_all(&taskpilot_dir).with_context(|| {
            format!(
                "Failed to create taskpilot directory at {}",
                taskpilot_dir.display()
            )
        })?;
    }

    Ok(taskpilot_dir)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found at {}. Run 'taskpilot init' to create one.",
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
    ensure_taskpilot_dir()?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_preserves_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let config = Config {
            provider: Some("openrouter".into()),
            model: "openai/gpt-4o".into(),
            system_message: Some("Be brief.".into()),
            max_turns: 3,
            ..Config::default()
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "model = \"gpt-4o\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_turns, 10);
        assert_eq!(config.objective, DEFAULT_OBJECTIVE);
        assert_eq!(config.history_size, 1000);
    }

    #[test]
    fn missing_file_points_to_init() {
        let tmp = TempDir::new().unwrap();
        let err = load_config_from(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("taskpilot init"));
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "max_turns = \"many\"").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn explicit_history_file_wins() {
        let config = Config {
            history_file: Some(PathBuf::from("/tmp/taskpilot-history")),
            ..Config::default()
        };
        assert_eq!(config.history_path(), PathBuf::from("/tmp/taskpilot-history"));
    }
}
