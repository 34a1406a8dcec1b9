// ── Resource client seam ──
//
// Collectors read controller state through `ResourceClient`. The
// production implementation is `ControllerSource`, a thin adapter over
// the legacy API client that owns the session credentials.

use std::future::Future;

use secrecy::SecretString;
use tracing::{debug, info, warn};

use unifi_exporter_api::{ControllerPlatform, LegacyClient};

use crate::config::ControllerConfig;
use crate::error::SourceError;
use crate::model::{Device, Site};

/// Read access to controller resources.
pub trait ResourceClient: Send + Sync {
    /// Every site visible to the authenticated account.
    fn sites(&self) -> impl Future<Output = Result<Vec<Site>, SourceError>> + Send;

    /// Current device snapshot for a site, addressed by internal name.
    fn devices(&self, site: &str) -> impl Future<Output = Result<Vec<Device>, SourceError>> + Send;
}

/// `ResourceClient` backed by a logged-in `LegacyClient`.
pub struct ControllerSource {
    client: LegacyClient,
    username: String,
    password: SecretString,
}

impl ControllerSource {
    pub fn new(client: LegacyClient, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            client,
            username: username.into(),
            password,
        }
    }

    /// Build the HTTP client, resolve the platform and log in.
    pub async fn connect(config: &ControllerConfig) -> Result<Self, SourceError> {
        let http = config.transport().build_client()?;

        let platform = match config.platform {
            Some(platform) => platform,
            None => LegacyClient::detect_platform(&http, &config.url).await?,
        };
        info!(url = %config.url, %platform, "connecting to controller");

        let source = Self::new(
            LegacyClient::with_client(http, config.url.clone(), platform),
            config.username.clone(),
            config.password.clone(),
        );
        source.login().await?;
        Ok(source)
    }

    pub fn platform(&self) -> ControllerPlatform {
        self.client.platform()
    }

    pub async fn login(&self) -> Result<(), SourceError> {
        self.client.login(&self.username, &self.password).await?;
        debug!(username = %self.username, "controller session established");
        Ok(())
    }

    /// End the controller session. Failures are logged, not returned.
    pub async fn logout(&self) {
        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "controller logout failed");
        }
    }

    /// Run `op`, logging in again once if the session has expired.
    async fn with_session<T, F, Fut>(&self, op: F) -> Result<T, SourceError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, unifi_exporter_api::Error>>,
    {
        match op().await {
            Err(e) if e.is_auth_expired() => {
                warn!("controller session expired, logging in again");
                self.login().await?;
                op().await.map_err(SourceError::from)
            }
            other => other.map_err(SourceError::from),
        }
    }
}

impl ResourceClient for ControllerSource {
    async fn sites(&self) -> Result<Vec<Site>, SourceError> {
        let raw = self.with_session(|| self.client.list_sites()).await?;
        Ok(raw.into_iter().map(Site::from).collect())
    }

    async fn devices(&self, site: &str) -> Result<Vec<Device>, SourceError> {
        let raw = self.with_session(|| self.client.list_devices(site)).await?;
        Ok(raw.into_iter().map(Device::from).collect())
    }
}
