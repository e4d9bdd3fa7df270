use encoding_rs::Encoding;
use log::warn;

use crate::config::Config;
use crate::utils::error::{BoxResult, ChmError};

/// Validate the configuration
pub fn validate_config(config: &Config) -> BoxResult<()> {
    validate_encodings(config)?;
    validate_theme(config)?;

    if config.search_content_max_length == 0 {
        return Err(ChmError::Config(
            "search_content_max_length must be greater than zero".to_string()
        ).into());
    }

    Ok(())
}

/// Every encoding label must be known
fn validate_encodings(config: &Config) -> BoxResult<()> {
    if config.encodings.is_empty() {
        return Err(ChmError::Config("At least one encoding must be configured".to_string()).into());
    }

    for label in &config.encodings {
        if Encoding::for_label(label.as_bytes()).is_none() {
            return Err(ChmError::Config(format!("Unknown encoding label: {}", label)).into());
        }
    }

    Ok(())
}

/// Light and dark candidates are paired by position
fn validate_theme(config: &Config) -> BoxResult<()> {
    let theme = &config.theme;
    if theme.light_candidates.len() != theme.dark_candidates.len() {
        return Err(ChmError::Config(format!(
            "Theme candidates must pair up: {} light vs {} dark",
            theme.light_candidates.len(),
            theme.dark_candidates.len()
        )).into());
    }

    if theme.light_candidates.is_empty() {
        warn!("No theme stylesheet candidates configured, theme switching is disabled");
    }

    Ok(())
}
