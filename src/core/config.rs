use serde::{Deserialize, Serialize};

use crate::model::ModelName;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Dashboard settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory (native) or URL prefix (web) holding both data files.
    pub data_dir: String,
    pub institutions_file: String,
    pub importance_file: String,
    /// Model selected at startup.
    pub default_model: ModelName,
    /// Model whose risk category feeds the "Actual" bar in risk mode.
    pub reference_model: ModelName,
    pub map_height: f64,
    pub importance_height: f64,
    pub comparison_height: f64,
    pub trend_height: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            institutions_file: "institutions.json".to_string(),
            importance_file: "feature_importance.json".to_string(),
            default_model: ModelName::RandomForest,
            reference_model: ModelName::Linear,
            map_height: 500.0,
            importance_height: 500.0,
            comparison_height: 100.0,
            trend_height: 80.0,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    #[cfg(feature = "std")]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// `data_dir` joined with a file name using `/`, which works both as a
    /// relative URL and as a path.
    pub fn resource_url(&self, file: &str) -> String {
        let dir = self.data_dir.trim_end_matches('/');
        if dir.is_empty() {
            file.to_string()
        } else {
            format!("{dir}/{file}")
        }
    }

    pub fn institutions_url(&self) -> String {
        self.resource_url(&self.institutions_file)
    }

    pub fn importance_url(&self) -> String {
        self.resource_url(&self.importance_file)
    }
}
