use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Simple configuration for snip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub analyzer: AnalyzerSettings,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Where to load the rules resource from: a file path or an
    /// http(s) URL. None means use the built-in set directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// How long to wait for the external resource before installing the
    /// built-in fallback set.
    #[serde(default = "default_fallback_delay_ms")]
    pub fallback_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerSettings {
    #[serde(default = "default_block_threshold")]
    pub block_threshold: usize,

    #[serde(default = "default_blocking_rules")]
    pub blocking_rules: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Similarity scoring endpoint. None disables remote analysis and
    /// the gate resolves against local rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_block_above")]
    pub block_above: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            analyzer: AnalyzerSettings::default(),
            remote: RemoteConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            source: None,
            fallback_delay_ms: default_fallback_delay_ms(),
        }
    }
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            block_threshold: default_block_threshold(),
            blocking_rules: default_blocking_rules(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            block_above: default_block_above(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_fallback_delay_ms() -> u64 {
    3000
}

fn default_block_threshold() -> usize {
    5
}

fn default_blocking_rules() -> Vec<String> {
    vec!["politeness".to_string(), "greeting".to_string()]
}

fn default_block_above() -> f64 {
    0.8
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    17474
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "snip", "snip") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.snip/config.toml")
        }
    }
}
