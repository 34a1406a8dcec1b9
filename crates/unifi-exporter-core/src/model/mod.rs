// ── Domain model ──
//
// Canonical, API-agnostic snapshots the collectors read. Only the fields
// the exported metrics need are carried; wire details stay in the API crate.

pub mod device;
pub mod mac;
pub mod site;

pub use device::{Device, DeviceStats, Nic, Radio, StationCounts, TrafficStats};
pub use mac::MacAddress;
pub use site::Site;
