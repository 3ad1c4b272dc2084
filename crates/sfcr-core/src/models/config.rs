//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use super::field::Field;

/// Main configuration for the sfcr pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SfcrConfig {
    /// Question-answering service configuration.
    pub service: ServiceConfig,

    /// Answer extraction configuration.
    pub extraction: ExtractionConfig,

    /// Comparison and export configuration.
    pub report: ReportConfig,
}

/// Question-answering service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the ChatPDF-compatible API.
    pub base_url: String,

    /// API key. Prefer the environment variable below.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable read when `api_key` is not set.
    pub api_key_env: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.chatpdf.com/v1".to_string(),
            api_key: None,
            api_key_env: "CHATPDF_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ServiceConfig {
    /// Resolve the API key from the config or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Answer extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Send the per-schema formatting guidance along with each question.
    pub send_guidance: bool,

    /// Prefix of the company key used when the base answer names no company.
    pub unknown_company_prefix: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            send_guidance: true,
            unknown_company_prefix: "Société inconnue".to_string(),
        }
    }
}

impl ExtractionConfig {
    /// Company key for a document whose base answer named no company.
    pub fn unknown_company(&self, filename: &str) -> String {
        format!("{} ({})", self.unknown_company_prefix, filename)
    }
}

/// Comparison table and export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Company label of the synthetic average row.
    pub average_label: String,

    /// Fields summarized in the statistics table.
    pub statistics_fields: Vec<Field>,

    /// Cell text for unavailable values.
    pub unavailable_marker: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            average_label: "Moyenne".to_string(),
            statistics_fields: vec![Field::Scr, Field::Mcr, Field::SolvencyRatio],
            unavailable_marker: String::new(),
        }
    }
}

impl SfcrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"report": {"average_label": "Average"}}"#).unwrap();

        let config = SfcrConfig::from_file(&path).unwrap();
        assert_eq!(config.report.average_label, "Average");
        assert_eq!(config.report.statistics_fields, vec![Field::Scr, Field::Mcr, Field::SolvencyRatio]);
        assert_eq!(config.service.api_key_env, "CHATPDF_API_KEY");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SfcrConfig::default();
        config.extraction.send_guidance = false;
        config.save(&path).unwrap();

        let loaded = SfcrConfig::from_file(&path).unwrap();
        assert!(!loaded.extraction.send_guidance);
        assert!(loaded.service.api_key.is_none());
    }

    #[test]
    fn test_unknown_company_key() {
        let config = ExtractionConfig::default();
        assert_eq!(config.unknown_company("rapport.pdf"), "Société inconnue (rapport.pdf)");
    }

    #[test]
    fn test_configured_api_key_wins() {
        let config = ServiceConfig {
            api_key: Some("sec_123".to_string()),
            api_key_env: "SFCR_TEST_UNSET_VARIABLE".to_string(),
            ..ServiceConfig::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sec_123"));

        let empty = ServiceConfig {
            api_key: None,
            api_key_env: "SFCR_TEST_UNSET_VARIABLE".to_string(),
            ..ServiceConfig::default()
        };
        assert_eq!(empty.resolve_api_key(), None);
    }
}
