//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Root configuration for the documentation router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Filesystem locations (channels file, static root, templates).
    pub paths: PathsConfig,

    /// URL layout of the versioned documentation.
    pub versions: VersionsConfig,

    /// Outbound validation of redirect targets.
    pub validation: ValidationConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Filesystem paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Release manifest (JSON or YAML).
    pub channels_file: PathBuf,

    /// Directory with static files.
    pub static_root: PathBuf,

    /// Templates location, relative to the static root and used as URL prefix.
    pub templates: String,

    /// Reload the channels file as soon as it changes on disk.
    pub watch_channels_file: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            channels_file: PathBuf::from("channels.yaml"),
            static_root: PathBuf::from("root"),
            templates: "/includes".to_string(),
            watch_channels_file: false,
        }
    }
}

impl PathsConfig {
    /// Directory holding templates: `<static_root><templates>`.
    pub fn templates_dir(&self) -> PathBuf {
        let mut dir = self.static_root.clone().into_os_string();
        dir.push(&self.templates);
        PathBuf::from(dir)
    }
}

/// How the documentation language is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum I18nMode {
    /// Language comes from the domain name; URLs carry no language segment.
    #[default]
    Domain,
    /// URLs start with `/en` or `/ru`.
    Location,
}

impl FromStr for I18nMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(Self::Domain),
            "location" => Ok(Self::Location),
            other => Err(format!(
                "Unknown localization method specified ({}). It can be 'domain' or 'location'.",
                other
            )),
        }
    }
}

impl fmt::Display for I18nMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain => write!(f, "domain"),
            Self::Location => write!(f, "location"),
        }
    }
}

/// Versioned documentation layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VersionsConfig {
    /// URL location of the versioned docs (e.g., "/documentation").
    pub location: String,

    /// Localization method.
    pub i18n: I18nMode,

    /// Accept and list the `latest` channel.
    pub use_latest_channel: bool,

    /// Group to send visitors to when nothing more specific applies.
    pub default_group: String,

    /// Group whose best version is reported as the root version.
    pub active_release: String,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            location: "/documentation".to_string(),
            i18n: I18nMode::Domain,
            use_latest_channel: false,
            default_group: "v1".to_string(),
            active_release: "v1".to_string(),
        }
    }
}

/// Redirect target validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Check redirect targets before answering.
    pub enabled: bool,

    /// Maximum requests per check, following redirects.
    pub max_attempts: u32,

    /// Per-attempt connect/request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: 3,
            timeout_secs: 10,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time to answer) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 15 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}' (expected 'text' or 'json')", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RouterConfig = toml::from_str(
            r#"
            [versions]
            i18n = "location"
            location = "/docs"
            "#,
        )
        .unwrap();

        assert_eq!(config.versions.i18n, I18nMode::Location);
        assert_eq!(config.versions.location, "/docs");
        assert_eq!(config.versions.default_group, "v1");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.validation.max_attempts, 3);
    }

    #[test]
    fn test_templates_dir() {
        let paths = PathsConfig::default();
        assert_eq!(paths.templates_dir(), PathBuf::from("root/includes"));
    }

    #[test]
    fn test_i18n_mode_from_str() {
        assert_eq!("location".parse::<I18nMode>(), Ok(I18nMode::Location));
        assert!("cookie".parse::<I18nMode>().is_err());
    }
}
