//! Configuration management for wakumo
//!
//! Handles loading and parsing of `wakumo.toml` configuration file.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Tokenization settings
    #[serde(default)]
    pub tokenize: TokenizeConfig,

    /// Co-occurrence network settings
    #[serde(default)]
    pub network: NetworkConfig,

    /// Frequency chart settings
    #[serde(default)]
    pub chart: ChartConfig,

    /// Word cloud settings
    #[serde(default)]
    pub cloud: CloudConfig,
}

/// Tokenization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeConfig {
    /// Minimum token length in characters
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Use the built-in Japanese stopword list
    #[serde(default = "default_true")]
    pub use_default_stopwords: bool,

    /// Extra stopword file, one word per line
    #[serde(default)]
    pub stopword_file: Option<PathBuf>,
}

impl Default for TokenizeConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            use_default_stopwords: true,
            stopword_file: None,
        }
    }
}

/// Co-occurrence network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Window mode: "sliding" or "line"
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Sliding window size
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Number of most frequent pairs to keep
    #[serde(default = "default_max_edges")]
    pub max_edges: usize,

    /// Minimum co-occurrence count per pair
    #[serde(default = "default_min_count")]
    pub min_count: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            window_size: default_window_size(),
            max_edges: default_max_edges(),
            min_count: default_min_count(),
        }
    }
}

/// Frequency chart configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Number of words shown in the chart
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

/// Word cloud configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    #[serde(default = "default_cloud_width")]
    pub width: u32,

    #[serde(default = "default_cloud_height")]
    pub height: u32,

    /// Japanese font file used by the external renderer
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            width: default_cloud_width(),
            height: default_cloud_height(),
            font_path: None,
        }
    }
}

fn default_min_chars() -> usize {
    2
}

fn default_mode() -> String {
    "sliding".to_string()
}

fn default_window_size() -> usize {
    5
}

fn default_max_edges() -> usize {
    50
}

fn default_min_count() -> usize {
    1
}

fn default_top_n() -> usize {
    30
}

fn default_cloud_width() -> u32 {
    1000
}

fn default_cloud_height() -> u32 {
    600
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "wakumo")
            .map(|dirs| dirs.config_dir().join("wakumo.toml"))
    }

    /// Load configuration from default path or workspace
    pub fn load_from_default() -> Self {
        // Try workspace path first
        let workspace_path = PathBuf::from("wakumo.toml");
        if workspace_path.exists() {
            if let Ok(config) = Self::load(&workspace_path) {
                return config;
            }
        }

        // Try user config directory
        if let Some(default_path) = Self::default_path() {
            if let Ok(config) = Self::load(&default_path) {
                return config;
            }
        }

        Config::default()
    }
}
