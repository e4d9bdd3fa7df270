use std::path::Path;
use std::fs;
use log::debug;

use crate::config::types::Config;
use crate::config::validation;
use crate::utils::error::{BoxResult, ChmError};

/// Load converter configuration from an optional config file.
///
/// Without a file the defaults are used. The format is chosen by extension
/// (`.yml`/`.yaml`, `.toml`, `.json`); files without an extension are read
/// as YAML. Fields missing from the file keep their defaults.
pub fn load_config(config_file: Option<&Path>) -> BoxResult<Config> {
    let config = match config_file {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            parse_config_file(path)?
        }
        None => {
            debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    validation::validate_config(&config)?;

    debug!("Configuration loaded: {:?}", config);
    Ok(config)
}

/// Read and parse a configuration file
fn parse_config_file(config_path: &Path) -> BoxResult<Config> {
    if !config_path.exists() {
        return Err(ChmError::Config(format!(
            "Configuration file not found: {}", config_path.display()
        )).into());
    }

    let content = fs::read_to_string(config_path)
        .map_err(|e| ChmError::Config(format!(
            "Failed to read configuration file {}: {}", config_path.display(), e
        )))?;

    let ext = config_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "yml".to_string());

    match ext.as_str() {
        "yml" | "yaml" => parse_yaml_config(&content, config_path),
        "toml" => parse_toml_config(&content, config_path),
        "json" => parse_json_config(&content, config_path),
        other => Err(ChmError::Config(format!(
            "Unsupported configuration file format: {}", other
        )).into()),
    }
}

/// Parse a YAML configuration file
fn parse_yaml_config(content: &str, path: &Path) -> BoxResult<Config> {
    // An empty YAML document means "all defaults"
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_yaml::from_str(content)
        .map_err(|e| ChmError::Config(format!(
            "Failed to parse YAML configuration ({}): {}", path.display(), e
        )).into())
}

/// Parse a TOML configuration file
fn parse_toml_config(content: &str, path: &Path) -> BoxResult<Config> {
    toml::from_str(content)
        .map_err(|e| ChmError::Config(format!(
            "Failed to parse TOML configuration ({}): {}", path.display(), e
        )).into())
}

/// Parse a JSON configuration file
fn parse_json_config(content: &str, path: &Path) -> BoxResult<Config> {
    serde_json::from_str(content)
        .map_err(|e| ChmError::Config(format!(
            "Failed to parse JSON configuration ({}): {}", path.display(), e
        )).into())
}
