use std::path::Path;

use log::info;

use crate::builder;
use crate::config::{self, Config};
use crate::utils::error::BoxResult;

/// Apply command-line overrides on top of the loaded configuration
pub fn convert_config(
    input: &Path,
    output: &Path,
    title: Option<&str>,
    config_file: Option<&Path>,
    sequential: bool,
) -> BoxResult<Config> {
    let mut config = config::load_config(config_file)?;
    config.source = input.to_path_buf();
    config.destination = output.to_path_buf();
    if let Some(title) = title {
        config.title = Some(title.to_string());
    }
    if sequential {
        config.parallel = false;
    }
    Ok(config)
}

/// Handle the convert command
pub fn handle_convert_command(
    input: &Path,
    output: &Path,
    title: Option<&str>,
    config_file: Option<&Path>,
    sequential: bool,
) -> BoxResult<()> {
    let config = convert_config(input, output, title, config_file, sequential)?;

    info!("Converting {}...", config.source.display());
    let report = builder::build_site(&config)?;

    info!("Site \"{}\" built at {}", report.title, config.destination.display());
    info!(
        "{} folders, {} files, {} documents converted, {} copied unchanged, {} missing, {} searchable pages",
        report.folders,
        report.files,
        report.transformed,
        report.fallbacks,
        report.skipped,
        report.search_entries
    );
    info!("Open {} in a browser", config.destination.join("index.html").display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("chmsite.yml");
        fs::write(&file, "title: From file\nparallel: true\nsearch_content_max_length: 200\n").unwrap();

        let config = convert_config(
            Path::new("help"),
            Path::new("out"),
            Some("From flag"),
            Some(&file),
            true,
        )
        .unwrap();

        assert_eq!(config.title.as_deref(), Some("From flag"));
        assert!(!config.parallel);
        assert_eq!(config.search_content_max_length, 200);
        assert_eq!(config.source, Path::new("help"));
    }

    #[test]
    fn test_file_title_kept_without_flag() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("chmsite.toml");
        fs::write(&file, "title = \"From file\"\n").unwrap();

        let config = convert_config(Path::new("help"), Path::new("out"), None, Some(&file), false).unwrap();
        assert_eq!(config.title.as_deref(), Some("From file"));
        assert!(config.parallel);
    }
}
