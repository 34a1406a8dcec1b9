// unifi-exporter-core: maps UniFi controller snapshots onto labeled metric observations.

pub mod collector;
pub mod config;
pub mod convert;
pub mod error;
pub mod exporter;
pub mod expose;
pub mod metric;
pub mod model;
pub mod registry;
pub mod select;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collector::{DeviceCollector, MetricCollector};
pub use config::{ControllerConfig, TlsVerification};
pub use error::{CollectError, SelectError, SourceError};
pub use exporter::{Exporter, Scrape};
pub use metric::{Descriptor, InvalidMetric, MetricKind, Namespace, Observation, ObservationSink, Sample};
pub use model::{Device, MacAddress, Nic, Radio, Site, TrafficStats};
pub use registry::DeviceDescriptors;
pub use select::{select_sites, sites_string};
pub use source::{ControllerSource, ResourceClient};
