//! Configuration file loading for the CLI
//!
//! Finds and loads the TOML configuration from an explicit path, the local
//! project directory or the platform configuration directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use tapeloom::{TapeloomError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for TapeloomError {
    fn from(err: ConfigError) -> Self {
        TapeloomError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (tapeloom/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or names invalid colors
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, TapeloomError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("tapeloom/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "tapeloom", "tapeloom") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load and validate configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, TapeloomError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    // Colors are kept as strings until here; reject bad ones before replay starts.
    config
        .style()
        .background_color()
        .and_then(|_| config.style().head_palette())
        .map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_explicit_path_is_loaded() {
        let file = config_file(
            r#"
            [geometry]
            grid_pitch = 20.0

            [style]
            head_palette = ["teal", "orange"]
            "#,
        );

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.geometry().grid_pitch(), 20.0);
        assert_eq!(config.style().head_palette().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_explicit_path() {
        let err = load_config(Some("/nonexistent/tapeloom.toml")).unwrap_err();
        assert!(matches!(err, TapeloomError::Config(message) if message.contains("Missing")));
    }

    #[test]
    fn test_malformed_toml() {
        let file = config_file("[geometry\ngrid_pitch = ");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, TapeloomError::Config(message) if message.contains("parse")));
    }

    #[test]
    fn test_invalid_palette_color() {
        let file = config_file("[style]\nhead_palette = [\"not-a-color\"]\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, TapeloomError::Config(message) if message.contains("Validation")));
    }
}
