//! Configuration for the UniFi exporter.
//!
//! Layered loading (defaults, TOML file, `UNIFI_EXPORTER_*` environment),
//! credential resolution, and translation to
//! `unifi_exporter_core::ControllerConfig`. The binary applies its CLI
//! overrides on top of the loaded `Config`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use unifi_exporter_api::ControllerPlatform;
use unifi_exporter_core::{ControllerConfig, Namespace, TlsVerification};

/// Environment prefix; nested keys use `__` (e.g. `UNIFI_EXPORTER_CONTROLLER__URL`).
pub const ENV_PREFIX: &str = "UNIFI_EXPORTER_";

/// Fallback password variable consulted when `password_env` is unset or empty.
pub const PASSWORD_ENV: &str = "UNIFI_EXPORTER_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing required setting '{field}'")]
    Missing { field: String },

    #[error("no password configured for controller user '{username}'")]
    NoCredentials { username: String },

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config structs ──────────────────────────────────────────────────

/// Top-level exporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Address the metrics server binds to.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Path serving the metrics exposition.
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    /// Prefix applied to every metric name.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default)]
    pub controller: ControllerSection,

    #[serde(default)]
    pub log: LogSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_path: default_metrics_path(),
            namespace: default_namespace(),
            controller: ControllerSection::default(),
            log: LogSection::default(),
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9130))
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_namespace() -> String {
    unifi_exporter_core::metric::DEFAULT_NAMESPACE.into()
}
fn default_timeout_secs() -> u64 {
    5
}

/// Controller connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerSection {
    /// Controller base URL (e.g., "https://192.168.1.1").
    pub url: Option<String>,

    pub username: Option<String>,

    /// Password in plaintext. Prefer `password_env` or `UNIFI_EXPORTER_PASSWORD`.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Site description to monitor; empty monitors every site.
    #[serde(default)]
    pub site: String,

    #[serde(default)]
    pub platform: PlatformChoice,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Per-request budget in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ControllerSection {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            password_env: None,
            site: String::new(),
            platform: PlatformChoice::default(),
            insecure: false,
            ca_cert: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformChoice {
    /// Probe the controller at startup.
    #[default]
    Auto,
    UnifiOs,
    Classic,
}

impl PlatformChoice {
    pub fn resolve(self) -> Option<ControllerPlatform> {
        match self {
            Self::Auto => None,
            Self::UnifiOs => Some(ControllerPlatform::UnifiOs),
            Self::Classic => Some(ControllerPlatform::ClassicController),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogSection {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "unifi-exporter", "unifi-exporter").map_or_else(
        || PathBuf::from("unifi-exporter.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the layered config.
///
/// An explicit `path` must exist; the default path is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound { path: p.to_path_buf() });
        }
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    let config: Config = figment(&path).extract()?;
    config.validate()?;
    Ok(config)
}

fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

impl Config {
    /// Check settings that serde alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.metrics_path.starts_with('/') || self.metrics_path.len() < 2 {
            return Err(ConfigError::Validation {
                field: "metrics_path".into(),
                reason: format!("must be an absolute path below '/', got '{}'", self.metrics_path),
            });
        }
        if self.metrics_path == "/health" {
            return Err(ConfigError::Validation {
                field: "metrics_path".into(),
                reason: "'/health' is reserved".into(),
            });
        }
        if !is_metric_prefix(&self.namespace) {
            return Err(ConfigError::Validation {
                field: "namespace".into(),
                reason: format!(
                    "must match [a-zA-Z_:][a-zA-Z0-9_:]*, got '{}'",
                    self.namespace
                ),
            });
        }
        if self.controller.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "controller.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.namespace.clone())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.controller.timeout_secs)
    }

    /// Build the runtime controller config, resolving credentials.
    pub fn controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        let section = &self.controller;

        let raw_url = section.url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "controller.url".into(),
        })?;
        let url: url::Url = raw_url.parse().map_err(|_| ConfigError::Validation {
            field: "controller.url".into(),
            reason: format!("invalid URL: {raw_url}"),
        })?;

        let username = section.username.clone().ok_or_else(|| ConfigError::Missing {
            field: "controller.username".into(),
        })?;
        let password = resolve_password(section, &username)?;

        let tls = if section.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = section.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        Ok(ControllerConfig {
            url,
            username,
            password,
            platform: section.platform.resolve(),
            tls,
            timeout: self.fetch_timeout(),
        })
    }

    /// Render the effective config as TOML with the password redacted.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.controller.password.is_some() {
            shown.controller.password = Some("<redacted>".into());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

/// An empty prefix is allowed; metric names then start at the subsystem.
fn is_metric_prefix(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    chars.next().is_none_or(|first| {
        (first.is_ascii_alphabetic() || first == '_' || first == ':')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
    })
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the controller password.
///
/// Order: the variable named by `password_env`, then
/// `UNIFI_EXPORTER_PASSWORD`, then plaintext `password`.
pub fn resolve_password(
    section: &ControllerSection,
    username: &str,
) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = section.password_env {
        if let Ok(val) = std::env::var(env_name) {
            if !val.is_empty() {
                return Ok(SecretString::from(val));
            }
        }
    }

    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        if !val.is_empty() {
            return Ok(SecretString::from(val));
        }
    }

    if let Some(ref pw) = section.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        username: username.into(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.listen.to_string(), "0.0.0.0:9130");
        assert_eq!(config.metrics_path, "/metrics");
        assert_eq!(config.namespace, "unifi");
        assert_eq!(config.controller.timeout_secs, 5);
        assert_eq!(config.controller.platform, PlatformChoice::Auto);
        assert_eq!(config.log.format, LogFormat::Text);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_relative_metrics_path() {
        let config = Config {
            metrics_path: "metrics".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn serialized_defaults_keep_timeout() {
        let config: Config = figment::Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .extract()
            .unwrap();
        assert_eq!(config.controller.timeout_secs, 5);
        config.validate().unwrap();
    }

    #[test]
    fn namespace_must_be_a_metric_prefix() {
        for bad in ["my-ns", "9lives", "uni fi"] {
            let config = Config {
                namespace: bad.into(),
                ..Config::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation { ref field, .. }) if field == "namespace"),
                "{bad} should be rejected"
            );
        }
        for good in ["unifi", "lab:edge", "_x1", ""] {
            let config = Config {
                namespace: good.into(),
                ..Config::default()
            };
            config.validate().unwrap();
        }
    }

    #[test]
    fn missing_url_is_reported() {
        let err = Config::default().controller_config().unwrap_err();
        assert_eq!(err.to_string(), "missing required setting 'controller.url'");
    }

    #[test]
    fn tls_follows_insecure_then_ca() {
        let mut config = Config::default();
        config.controller.url = Some("https://10.0.0.1".into());
        config.controller.username = Some("admin".into());
        config.controller.password = Some("pw".into());
        config.controller.ca_cert = Some("/etc/ca.pem".into());

        let built = config.controller_config().unwrap();
        assert_eq!(built.tls, TlsVerification::CustomCa("/etc/ca.pem".into()));
        assert_eq!(built.password.expose_secret(), "pw");

        config.controller.insecure = true;
        let built = config.controller_config().unwrap();
        assert_eq!(built.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn redacted_toml_hides_password() {
        let mut config = Config::default();
        config.controller.password = Some("hunter2".into());

        let rendered = config.to_redacted_toml().unwrap();
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn platform_choice_resolves() {
        assert_eq!(PlatformChoice::Auto.resolve(), None);
        assert_eq!(
            PlatformChoice::UnifiOs.resolve(),
            Some(ControllerPlatform::UnifiOs)
        );
    }
}
