//! Configuration loading and management

use crate::core::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind (e.g., "127.0.0.1:3000")
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Admin panel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSettings {
    /// URL prefix under which every resource is mounted
    #[serde(default = "default_panel_path")]
    pub path: String,

    /// ISO currency code used by money columns
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_panel_path() -> String {
    "/admin".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            path: default_panel_path(),
            currency: default_currency(),
        }
    }
}

/// Table pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_per_page")]
    pub default_per_page: usize,

    #[serde(default = "default_per_page_options")]
    pub per_page_options: Vec<usize>,
}

fn default_per_page() -> usize {
    10
}

fn default_per_page_options() -> Vec<usize> {
    vec![5, 10, 25, 50]
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            per_page_options: default_per_page_options(),
        }
    }
}

/// Complete configuration for the panel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub panel: PanelSettings,

    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl PanelConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.panel.path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                key: "panel.path".to_string(),
                message: format!("must start with '/' (got '{}')", self.panel.path),
            });
        }
        if self.pagination.per_page_options.contains(&0) {
            return Err(ConfigError::InvalidValue {
                key: "pagination.per_page_options".to_string(),
                message: "page sizes must be positive".to_string(),
            });
        }
        if !self
            .pagination
            .per_page_options
            .contains(&self.pagination.default_per_page)
        {
            return Err(ConfigError::InvalidValue {
                key: "pagination.default_per_page".to_string(),
                message: format!(
                    "{} is not one of {:?}",
                    self.pagination.default_per_page, self.pagination.per_page_options
                ),
            });
        }
        Ok(())
    }

    /// Panel path without a trailing slash, `""` for a root mount
    pub fn panel_path(&self) -> &str {
        self.panel.path.trim_end_matches('/')
    }
}
