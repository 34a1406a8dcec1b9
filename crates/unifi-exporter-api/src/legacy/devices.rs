// Legacy API device endpoints
//
// Read-only device listing via stat/device. Each call returns the full
// current snapshot for one site, including traffic and radio statistics.

use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::LegacyDevice;

impl LegacyClient {
    /// List all devices of a site with full statistics.
    ///
    /// `GET /api/s/{site}/stat/device`
    pub async fn list_devices(&self, site: &str) -> Result<Vec<LegacyDevice>, Error> {
        let url = self.site_url(site, "stat/device")?;
        debug!(site, "listing devices");
        self.get(url).await
    }
}
