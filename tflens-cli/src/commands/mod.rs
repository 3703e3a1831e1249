//! Command handlers -- one module per subcommand

pub mod config;
pub mod parse;

use std::path::{Path, PathBuf};

use tflens_core::config::TflensConfig;

use crate::cli::DEFAULT_CONFIG_PATH;
use crate::error::CliError;

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from this file.
    File(PathBuf),
    /// No file; defaults plus environment overrides.
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Without one, `tflens.toml` in the working
/// directory is used when present, otherwise defaults with env overrides.
pub async fn load_config(
    explicit: Option<&Path>,
) -> Result<(TflensConfig, ConfigSource), CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !tokio::fs::try_exists(&default).await.unwrap_or(false) {
                let mut config = TflensConfig::default();
                config.apply_env_overrides();
                config.validate()?;
                return Ok((config, ConfigSource::Defaults));
            }
            default
        }
    };

    let config = TflensConfig::load(&path).await?;
    Ok((config, ConfigSource::File(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_explicit_missing_file_is_config_error() {
        let err = load_config(Some(Path::new("/nonexistent/tflens.toml")))
            .await
            .expect_err("missing explicit file should fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_explicit_file_is_loaded() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("tflens.toml");
        std::fs::write(&path, "[parser]\nmax_line_bytes = 4096\n").expect("write config");

        let (config, source) = load_config(Some(&path)).await.expect("load");
        assert_eq!(config.parser.max_line_bytes, 4096);
        assert_eq!(source, ConfigSource::File(path));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(ConfigSource::Defaults.to_string(), "built-in defaults");
        assert_eq!(
            ConfigSource::File(PathBuf::from("a/tflens.toml")).to_string(),
            "a/tflens.toml"
        );
    }
}
