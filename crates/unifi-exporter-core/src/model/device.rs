// ── Device domain type ──
//
// One network device as seen in a single controller snapshot.

use std::time::Duration;

use super::mac::MacAddress;

/// A managed device (access point, switch, gateway).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Device {
    pub id: String,
    /// Primary MAC reported by the controller.
    pub mac: MacAddress,
    pub name: String,
    pub adopted: bool,
    pub uptime: Duration,
    /// Network interfaces in controller order. Metrics label a device
    /// with the MAC of the first entry.
    pub nics: Vec<Nic>,
    pub stats: DeviceStats,
    pub radios: Vec<Radio>,
}

impl Device {
    /// MAC of the first network interface, if the device reported any.
    pub fn primary_nic_mac(&self) -> Option<&MacAddress> {
        self.nics.first().map(|nic| &nic.mac)
    }
}

/// A wired network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nic {
    pub name: String,
    pub mac: MacAddress,
}

/// Traffic counters split by direction of interest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// All user traffic.
    pub all: TrafficStats,
    /// Backhaul traffic only.
    pub uplink: TrafficStats,
}

/// Monotonic counters since device boot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrafficStats {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub tx_packets: u64,
    /// Controllers only report drops for aggregate user traffic.
    pub tx_dropped: u64,
}

/// One radio interface and its associated stations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Radio {
    pub name: String,
    /// Band identifier such as `ng` or `na`.
    pub radio: String,
    pub stations: StationCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationCounts {
    pub user: u64,
    pub guest: u64,
}
