use crate::cost::CostModel;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = ".pipeprof.toml";

/// Substrings the rules look for. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleMarkers {
    /// Marks an oversized runner label, e.g. `ubuntu-latest-4xlarge`.
    pub expensive_tier: String,
    /// Marks a caching action reference, e.g. `actions/cache@v4`.
    pub cache_action: String,
    /// Searched for in the raw document text.
    pub concurrency: String,
}

impl Default for RuleMarkers {
    fn default() -> Self {
        Self {
            expensive_tier: "large".to_string(),
            cache_action: "cache".to_string(),
            concurrency: "concurrency".to_string(),
        }
    }
}

/// Analyzer configuration loaded from `.pipeprof.toml`.
///
/// ```toml
/// [cost]
/// minutes_per_job = 8
/// price_per_minute = 0.016
/// runs_per_month = 500
///
/// [rules]
/// expensive_tier = "xlarge"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub cost: CostModel,
    pub rules: RuleMarkers,
}

impl AnalyzerConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse configuration from TOML text not backed by a file.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cost_fields = [
            ("cost.minutes_per_job", self.cost.minutes_per_job),
            ("cost.price_per_minute", self.cost.price_per_minute),
            ("cost.runs_per_month", self.cost.runs_per_month),
        ];
        for (field, value) in cost_fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a finite, non-negative number (got {value})"),
                });
            }
        }

        let markers = [
            ("rules.expensive_tier", &self.rules.expensive_tier),
            ("rules.cache_action", &self.rules.cache_action),
            ("rules.concurrency", &self.rules.concurrency),
        ];
        for (field, marker) in markers {
            if marker.is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "marker must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = AnalyzerConfig::from_toml("[cost]\nruns_per_month = 500\n").unwrap();
        assert_eq!(config.cost.runs_per_month, 500.0);
        assert_eq!(config.cost.minutes_per_job, 5.0);
        assert_eq!(config.cost.price_per_minute, 0.008);
        assert_eq!(config.rules, RuleMarkers::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(AnalyzerConfig::from_toml("").unwrap(), AnalyzerConfig::default());
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = AnalyzerConfig::from_toml("[cost]\nprice_per_minute = -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "cost.price_per_minute",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_marker_rejected() {
        let err = AnalyzerConfig::from_toml("[rules]\ncache_action = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("rules.cache_action"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rules]\nexpensive_tier = \"xlarge\"").unwrap();

        let config = AnalyzerConfig::load(file.path()).unwrap();
        assert_eq!(config.rules.expensive_tier, "xlarge");
        assert_eq!(config.rules.cache_action, "cache");
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cost\nbroken").unwrap();

        let err = AnalyzerConfig::load(file.path()).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, file.path()),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnalyzerConfig::load(Path::new("/nonexistent/.pipeprof.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
