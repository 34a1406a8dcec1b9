// ── Device metric catalog ──
//
// Fixed set of descriptors for the device collector, built once from an
// injected namespace.

use std::sync::Arc;

use crate::metric::{Descriptor, MetricKind, Namespace};

const SUBSYSTEM: &str = "devices";

const LABELS_SITE: &[&str] = &["site"];
const LABELS_DEVICE: &[&str] = &["site", "id", "mac", "name"];
const LABELS_CONNECTION: &[&str] = &["site", "id", "mac", "name", "connection"];
const LABELS_STATIONS: &[&str] =
    &["site", "id", "mac", "name", "interface", "radio", "user_type"];

#[derive(Debug, Clone)]
pub struct DeviceDescriptors {
    pub devices: Arc<Descriptor>,
    pub adopted: Arc<Descriptor>,
    pub unadopted: Arc<Descriptor>,

    pub uptime_seconds_total: Arc<Descriptor>,

    pub received_bytes_total: Arc<Descriptor>,
    pub transmitted_bytes_total: Arc<Descriptor>,
    pub received_packets_total: Arc<Descriptor>,
    pub transmitted_packets_total: Arc<Descriptor>,
    pub transmitted_packets_dropped_total: Arc<Descriptor>,

    pub stations: Arc<Descriptor>,
}

impl DeviceDescriptors {
    pub fn new(ns: &Namespace) -> Self {
        let desc = |subsystem: &str,
                    name: &str,
                    help: &'static str,
                    labels: &'static [&'static str],
                    kind: MetricKind| {
            Arc::new(Descriptor::new(ns, subsystem, name, help, labels, kind))
        };

        Self {
            // Subsystem doubles as the name so the family is "unifi_devices".
            devices: desc("", SUBSYSTEM, "Total number of devices", LABELS_SITE, MetricKind::Gauge),
            adopted: desc(
                SUBSYSTEM,
                "adopted",
                "Number of devices which are adopted",
                LABELS_SITE,
                MetricKind::Gauge,
            ),
            unadopted: desc(
                SUBSYSTEM,
                "unadopted",
                "Number of devices which are not adopted",
                LABELS_SITE,
                MetricKind::Gauge,
            ),
            uptime_seconds_total: desc(
                SUBSYSTEM,
                "uptime_seconds_total",
                "Device uptime in seconds",
                LABELS_DEVICE,
                MetricKind::Counter,
            ),
            received_bytes_total: desc(
                SUBSYSTEM,
                "received_bytes_total",
                "Number of bytes received by devices",
                LABELS_CONNECTION,
                MetricKind::Counter,
            ),
            transmitted_bytes_total: desc(
                SUBSYSTEM,
                "transmitted_bytes_total",
                "Number of bytes transmitted by devices",
                LABELS_CONNECTION,
                MetricKind::Counter,
            ),
            received_packets_total: desc(
                SUBSYSTEM,
                "received_packets_total",
                "Number of packets received by devices",
                LABELS_CONNECTION,
                MetricKind::Counter,
            ),
            transmitted_packets_total: desc(
                SUBSYSTEM,
                "transmitted_packets_total",
                "Number of packets transmitted by devices",
                LABELS_CONNECTION,
                MetricKind::Counter,
            ),
            transmitted_packets_dropped_total: desc(
                SUBSYSTEM,
                "transmitted_packets_dropped_total",
                "Number of packets which are dropped on transmission by devices",
                LABELS_CONNECTION,
                MetricKind::Counter,
            ),
            stations: desc(
                SUBSYSTEM,
                "stations",
                "Total number of stations (clients) connected to devices",
                LABELS_STATIONS,
                MetricKind::Gauge,
            ),
        }
    }

    /// All descriptors in catalog order.
    pub fn all(&self) -> Vec<Arc<Descriptor>> {
        [
            &self.devices,
            &self.adopted,
            &self.unadopted,
            &self.uptime_seconds_total,
            &self.received_bytes_total,
            &self.transmitted_bytes_total,
            &self.received_packets_total,
            &self.transmitted_packets_total,
            &self.transmitted_packets_dropped_total,
            &self.stations,
        ]
        .into_iter()
        .map(Arc::clone)
        .collect()
    }
}
