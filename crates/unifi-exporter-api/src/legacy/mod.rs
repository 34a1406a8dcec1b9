// Legacy API client modules
//
// Hand-written client for the UniFi controller's legacy (non-OpenAPI)
// endpoints the exporter reads: session login, `self/sites`, and
// `stat/device`, all wrapped in the `{ meta: { rc, msg }, data: [...] }`
// envelope.

pub mod auth;
pub mod client;
pub mod devices;
pub mod models;
pub mod sites;

pub use client::LegacyClient;
