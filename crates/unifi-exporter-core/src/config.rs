// ── Runtime connection configuration ──
//
// These types describe *how* to reach a UniFi controller. They carry
// credentials and connection tuning but never touch disk: the binary
// builds a `ControllerConfig` from its layered config and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use unifi_exporter_api::{ControllerPlatform, TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for local controllers.
    #[default]
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for connecting to a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://192.168.1.1`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// Force a platform; `None` probes the controller at connect time.
    pub platform: Option<ControllerPlatform>,
    pub tls: TlsVerification,
    /// Budget for each controller request.
    pub timeout: Duration,
}

impl ControllerConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn transport_carries_tls_and_timeout() {
        let config = ControllerConfig {
            url: Url::parse("https://10.0.0.1:8443").unwrap(),
            username: "admin".into(),
            password: SecretString::from("pw".to_owned()),
            platform: None,
            tls: TlsVerification::CustomCa("/etc/unifi/ca.pem".into()),
            timeout: Duration::from_secs(7),
        };

        let transport = config.transport();
        assert!(matches!(transport.tls, TlsMode::CustomCa(ref p) if p.ends_with("ca.pem")));
        assert_eq!(transport.timeout, Duration::from_secs(7));
        assert!(transport.cookie_jar.is_some());
    }
}
