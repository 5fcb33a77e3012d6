use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::info;
use twin_cost::config::Config;

/// Execute the config show command
///
/// Prints the effective configuration (file plus environment overrides) as TOML
pub fn show(cfg: &Config) -> Result<()> {
    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(cfg)?;
    println!("{}", toml_string);

    info!("Configuration displayed successfully");
    Ok(())
}

/// Execute the config validate command
pub fn validate(path: &Path, cfg: &Config) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };
    println!("  {}: {}", "File".cyan(), source);
    println!("  {}: {}", "Log Level".cyan(), cfg.logging.level);
    println!("  {}: {}", "Log Format".cyan(), cfg.logging.format);
    println!("  {}: {}", "Pricing".cyan(), cfg.pricing.path.display());
    println!(
        "  {}: {}",
        "Twin Query Model".cyan(),
        query_model_name(cfg)
    );

    info!("Configuration validation successful");
    Ok(())
}

fn query_model_name(cfg: &Config) -> String {
    serde_json::to_value(cfg.twin_management.query_model)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use twin_cost::layers::twin_management::TwinQueryModel;

    #[test]
    fn test_default_config_renders_as_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(rendered.contains("[logging]"));
        assert!(rendered.contains("query_model = \"dashboard\""));
    }

    #[test]
    fn test_query_model_name() {
        let mut cfg = Config::default();
        assert_eq!(query_model_name(&cfg), "dashboard");
        cfg.twin_management.query_model = TwinQueryModel::ContinuousPolling;
        assert_eq!(query_model_name(&cfg), "continuous-polling");
    }
}
