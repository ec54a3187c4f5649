//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "VROUTER_CONFIG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML file into a config without validating it.
pub fn read_config_file(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load configuration: optional TOML file, then `VROUTER_*` overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => RouterConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Config file path from `VROUTER_CONFIG`, if set.
pub fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from)
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Ok(true),
        "0" | "f" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Env {
            var,
            message: format!("'{}' is not a boolean", value),
        }),
    }
}

/// Apply the deployment's environment variables on top of `config`.
///
/// `lookup` abstracts the environment so tests need not mutate process state.
pub fn apply_env_overrides<F>(config: &mut RouterConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let address = lookup("VROUTER_LISTENADDRESS");
    let port = lookup("VROUTER_LISTENPORT");
    if address.is_some() || port.is_some() {
        let current: Option<SocketAddr> = config.listener.bind_address.parse().ok();
        let host = address
            .or_else(|| current.map(|a| a.ip().to_string()))
            .unwrap_or_else(|| "0.0.0.0".to_string());
        let port = port
            .or_else(|| current.map(|a| a.port().to_string()))
            .unwrap_or_else(|| "8080".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }

    if let Some(v) = lookup("VROUTER_LOGLEVEL") {
        config.observability.log_level = v;
    }
    if let Some(v) = lookup("VROUTER_LOGFORMAT") {
        config.observability.log_format = v
            .parse()
            .map_err(|message| ConfigError::Env { var: "VROUTER_LOGFORMAT", message })?;
    }
    if let Some(v) = lookup("VROUTER_PATHCHANNELSFILE") {
        config.paths.channels_file = PathBuf::from(v);
    }
    if let Some(v) = lookup("VROUTER_PATHSTATIC") {
        config.paths.static_root = PathBuf::from(v);
    }
    if let Some(v) = lookup("VROUTER_PATHTPLS") {
        config.paths.templates = v;
    }
    if let Some(v) = lookup("VROUTER_LOCATIONVERSIONS") {
        config.versions.location = v;
    }
    if let Some(v) = lookup("VROUTER_I18NTYPE") {
        config.versions.i18n = v
            .parse()
            .map_err(|message| ConfigError::Env { var: "VROUTER_I18NTYPE", message })?;
    }
    if let Some(v) = lookup("VROUTER_URLVALIDATION") {
        config.validation.enabled = parse_bool("VROUTER_URLVALIDATION", &v)?;
    }
    if let Some(v) = lookup("VROUTER_USELATESTCHANNEL") {
        config.versions.use_latest_channel = parse_bool("VROUTER_USELATESTCHANNEL", &v)?;
    }
    if let Some(v) = lookup("VROUTER_DEFAULTGROUP") {
        config.versions.default_group = v;
    }
    if let Some(v) = lookup("ACTIVE_RELEASE").filter(|v| !v.is_empty()) {
        config.versions.active_release = v;
    }

    Ok(())
}
