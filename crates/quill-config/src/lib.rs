//! Configuration management for Quill.
//!
//! Parses `quill.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `highlight.theme`
//! - `highlight.remote_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override highlighting theme.
    pub theme: Option<String>,
    /// Override highlighting backend.
    pub backend: Option<HighlightBackend>,
    /// Override remote highlighting service URL.
    pub remote_url: Option<String>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Longest accepted remote highlighting timeout.
const MAX_TIMEOUT_SECS: u64 = 300;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Code highlighting configuration.
    pub highlight: HighlightConfig,
    /// Cache configuration.
    pub cache: CacheConfig,
    /// Responsive image configuration.
    pub images: ImagesConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Which backend renders code blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightBackend {
    /// In-process syntect grammars.
    #[default]
    Syntect,
    /// HTTP highlighting service at `highlight.remote_url`.
    Remote,
}

impl FromStr for HighlightBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "syntect" => Ok(Self::Syntect),
            "remote" => Ok(Self::Remote),
            other => Err(format!(
                "unknown highlight backend '{other}' (valid: syntect, remote)"
            )),
        }
    }
}

/// Code highlighting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Theme name passed to the backend.
    pub theme: String,
    /// Backend selection.
    pub backend: HighlightBackend,
    /// Remote highlighting service URL (required for the remote backend).
    pub remote_url: Option<String>,
    /// Remote request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_owned(),
            backend: HighlightBackend::default(),
            remote_url: None,
            timeout_secs: 10,
        }
    }
}

impl HighlightConfig {
    /// Remote request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether highlighted markup is cached.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Responsive image configuration.
///
/// Unset fields use the media defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Widths to generate variants for.
    pub breakpoints: Option<Vec<u32>>,
    /// Width divided by height.
    pub aspect_ratio: Option<f64>,
    /// Value of the `sizes` attribute.
    pub sizes: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`highlight.remote_url`").
        field: String,
        /// Error message.
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading and validated together with the
    /// file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            tracing::debug!(path = %discovered.display(), "discovered config file");
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(theme) = &settings.theme {
            self.highlight.theme.clone_from(theme);
        }
        if let Some(backend) = settings.backend {
            self.highlight.backend = backend;
        }
        if let Some(remote_url) = &settings.remote_url {
            self.highlight.remote_url = Some(remote_url.clone());
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache.enabled = cache_enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(current)
    }

    fn discover_config_from(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_highlight()?;
        self.validate_images()?;
        Ok(())
    }

    /// Validate highlight configuration.
    fn validate_highlight(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.highlight.theme, "highlight.theme")?;

        if self.highlight.backend == HighlightBackend::Remote {
            let url = self.highlight.remote_url.as_deref().ok_or_else(|| {
                ConfigError::Validation(
                    "highlight.backend = \"remote\" requires highlight.remote_url".to_owned(),
                )
            })?;
            require_non_empty(url, "highlight.remote_url")?;
            require_http_url(url, "highlight.remote_url")?;
        } else if self.highlight.remote_url.is_some() {
            tracing::warn!("highlight.remote_url is set but the syntect backend is in use");
        }

        let timeout = self.highlight.timeout_secs;
        if timeout == 0 {
            return Err(ConfigError::Validation(
                "highlight.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if timeout > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "highlight.timeout_secs cannot exceed {MAX_TIMEOUT_SECS}"
            )));
        }

        Ok(())
    }

    /// Validate images configuration.
    fn validate_images(&self) -> Result<(), ConfigError> {
        if let Some(breakpoints) = &self.images.breakpoints
            && breakpoints.contains(&0)
        {
            return Err(ConfigError::Validation(
                "images.breakpoints cannot contain 0".to_owned(),
            ));
        }

        if let Some(ratio) = self.images.aspect_ratio
            && !(ratio.is_finite() && ratio > 0.0)
        {
            return Err(ConfigError::Validation(
                "images.aspect_ratio must be a positive number".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.highlight.theme = expand::expand_env(&self.highlight.theme, "highlight.theme")?;

        if let Some(ref url) = self.highlight.remote_url {
            self.highlight.remote_url = Some(expand::expand_env(url, "highlight.remote_url")?);
        }

        Ok(())
    }
}
