//! Exporter error types with miette diagnostics.
//!
//! Maps config, controller and startup failures into user-facing errors
//! with actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use unifi_exporter_config::ConfigError;
use unifi_exporter_core::{ControllerConfig, SelectError, SourceError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(unifi_exporter::connection_failed),
        help(
            "Check that the controller is running and reachable from this host.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed for {url}: {reason}")]
    #[diagnostic(
        code(unifi_exporter::tls_error),
        help(
            "Controllers usually serve a self-signed certificate.\n\
             Use --insecure (-k) to accept it, or set controller.ca_cert."
        )
    )]
    TlsError { url: String, reason: String },

    #[error("Request to the controller timed out after {seconds}s")]
    #[diagnostic(
        code(unifi_exporter::timeout),
        help("Increase controller.timeout_secs or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Controller API error: {message}")]
    #[diagnostic(code(unifi_exporter::api_error))]
    Api { message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed for user '{username}'")]
    #[diagnostic(
        code(unifi_exporter::auth_failed),
        help("Verify the username and password of a local controller account.")
    )]
    AuthFailed { username: String },

    #[error("No password configured for user '{username}'")]
    #[diagnostic(
        code(unifi_exporter::no_credentials),
        help(
            "Set UNIFI_EXPORTER_PASSWORD, name a variable with controller.password_env,\n\
             or set controller.password in the config file."
        )
    )]
    NoCredentials { username: String },

    // ── Sites ────────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(unifi_exporter::site_not_found),
        help("Sites are matched by description. Available: {available}")
    )]
    SiteNotFound { message: String, available: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(unifi_exporter::no_config),
        help("Pass an existing file with --config or drop the flag to use {default}")
    )]
    NoConfig { path: String, default: String },

    #[error("Missing required setting '{field}'")]
    #[diagnostic(
        code(unifi_exporter::missing_setting),
        help("Set it in the config file, via UNIFI_EXPORTER_* variables, or with a flag.")
    )]
    MissingSetting { field: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unifi_exporter::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(unifi_exporter::config))]
    Config(String),

    // ── Runtime ──────────────────────────────────────────────────────

    #[error("Could not listen on {addr}")]
    #[diagnostic(
        code(unifi_exporter::bind),
        help("Another process may own the port. Change it with --listen.")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    #[diagnostic(code(unifi_exporter::server))]
    Server(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::SiteNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NoConfig { .. }
            | Self::MissingSetting { .. }
            | Self::Validation { .. }
            | Self::Config(_) => exit_code::USAGE,
            Self::Api { .. } | Self::Bind { .. } | Self::Server(_) => exit_code::GENERAL,
        }
    }

    /// Translate a controller failure in the context of the connection settings.
    pub fn from_source(err: SourceError, controller: &ControllerConfig) -> Self {
        use unifi_exporter_api::Error as ApiError;

        let url = &controller.url;

        match err {
            SourceError::Timeout(budget) => Self::Timeout {
                seconds: budget.as_secs(),
            },
            SourceError::Api(api) => match api {
                ApiError::Authentication { .. } => Self::AuthFailed {
                    username: controller.username.clone(),
                },
                ApiError::Timeout { timeout_secs } => Self::Timeout {
                    seconds: timeout_secs,
                },
                ApiError::Tls(reason) => Self::TlsError {
                    url: url.to_string(),
                    reason,
                },
                ApiError::Transport(e) if e.is_timeout() => Self::Timeout {
                    seconds: controller.timeout.as_secs(),
                },
                ApiError::Transport(e) => Self::ConnectionFailed {
                    url: url.to_string(),
                    source: Box::new(e),
                },
                other => Self::Api {
                    message: other.to_string(),
                },
            },
        }
    }

    pub fn from_select(err: &SelectError, available: String) -> Self {
        Self::SiteNotFound {
            message: err.to_string(),
            available,
        }
    }
}

// ── ConfigError → CliError mapping ──────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Missing { field } => Self::MissingSetting { field },
            ConfigError::NoCredentials { username } => Self::NoCredentials { username },
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
                default: unifi_exporter_config::config_path().display().to_string(),
            },
            other => Self::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use unifi_exporter_core::TlsVerification;

    use super::*;

    fn controller() -> ControllerConfig {
        ControllerConfig {
            url: url::Url::parse("https://unifi.lan").unwrap(),
            username: "exporter".into(),
            password: String::from("pw").into(),
            platform: None,
            tls: TlsVerification::SystemDefaults,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn auth_failures_use_auth_exit_code() {
        let err = CliError::from_source(
            SourceError::Api(unifi_exporter_api::Error::Authentication {
                message: "bad password".into(),
            }),
            &controller(),
        );
        assert!(matches!(err, CliError::AuthFailed { ref username } if username == "exporter"));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn source_timeout_maps_to_timeout() {
        let err = CliError::from_source(SourceError::Timeout(Duration::from_secs(5)), &controller());
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
        assert_eq!(err.to_string(), "Request to the controller timed out after 5s");
    }

    #[test]
    fn site_not_found_keeps_selector_message() {
        let err = CliError::from_select(
            &SelectError::NotFound {
                requested: "Qux".into(),
            },
            "Default, Foo".into(),
        );
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(err.to_string().contains("was not found in UniFi Controller"));
    }

    #[test]
    fn config_errors_are_usage_errors() {
        let err = CliError::from(ConfigError::Missing {
            field: "controller.url".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
