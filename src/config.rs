use crate::layers::twin_management::TwinQueryModel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `TWIN_COST__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "TWIN_COST";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["text", "json"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub twin_management: TwinManagementConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PricingConfig {
    /// Pricing document loaded once at startup
    #[serde(default = "default_pricing_path")]
    pub path: PathBuf,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            path: default_pricing_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TwinManagementConfig {
    #[serde(default)]
    pub query_model: TwinQueryModel,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_pricing_path() -> PathBuf {
    PathBuf::from("pricing.json")
}

/// Load configuration from `path` (optional) and `TWIN_COST__*` environment overrides
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if !LOG_LEVELS.contains(&cfg.logging.level.to_lowercase().as_str()) {
        anyhow::bail!(
            "Invalid log level '{}'. Must be one of: {}",
            cfg.logging.level,
            LOG_LEVELS.join(", ")
        );
    }

    if !LOG_FORMATS.contains(&cfg.logging.format.as_str()) {
        anyhow::bail!(
            "Invalid log format '{}'. Must be one of: {}",
            cfg.logging.format,
            LOG_FORMATS.join(", ")
        );
    }

    if cfg.pricing.path.as_os_str().is_empty() {
        anyhow::bail!("Pricing path cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.pricing.path, PathBuf::from("pricing.json"));
        assert_eq!(cfg.twin_management.query_model, TwinQueryModel::Dashboard);
    }

    #[test]
    fn test_file_values_are_read() {
        let file = write_config(
            r#"
[logging]
level = "debug"
format = "json"

[pricing]
path = "/etc/twin-cost/pricing.json"

[twin_management]
query_model = "continuous-polling"
"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.pricing.path, PathBuf::from("/etc/twin-cost/pricing.json"));
        assert_eq!(cfg.twin_management.query_model, TwinQueryModel::ContinuousPolling);
    }

    #[test]
    fn test_validate_config_rejects_unknown_format() {
        let mut cfg = Config::default();
        cfg.logging.format = "xml".to_string();

        let result = validate_config(&cfg);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_validate_config_rejects_unknown_level() {
        let mut cfg = Config::default();
        cfg.logging.level = "loud".to_string();
        assert!(validate_config(&cfg).is_err());

        cfg.logging.level = "DEBUG".to_string();
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_validate_config_rejects_empty_pricing_path() {
        let mut cfg = Config::default();
        cfg.pricing.path = PathBuf::new();

        let result = validate_config(&cfg);
        assert!(result.unwrap_err().to_string().contains("Pricing path cannot be empty"));
    }

    #[test]
    fn test_unknown_query_model_fails_to_load() {
        let file = write_config("[twin_management]\nquery_model = \"hourly\"\n");
        assert!(load_config(file.path()).is_err());
    }
}
