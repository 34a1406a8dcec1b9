// Legacy API response types
//
// Models for the UniFi controller's legacy JSON API. All responses are wrapped
// in the `LegacyResponse<T>` envelope. Fields use `#[serde(default)]` liberally
// because the API is inconsistent about field presence across firmware versions.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// Every legacy endpoint wraps its payload:
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: Meta,
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Device ───────────────────────────────────────────────────────────

/// Device object from `stat/device`.
///
/// The legacy API returns 100+ fields per device. The ones the exporter
/// reads are modelled explicitly; everything else lands in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyDevice {
    #[serde(rename = "_id")]
    pub id: String,
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub adopted: bool,
    /// Seconds since the device last booted.
    #[serde(default)]
    pub uptime: Option<i64>,
    #[serde(default)]
    pub ethernet_table: Vec<EthernetEntry>,
    #[serde(default, rename = "stat")]
    pub stats: Option<DeviceStat>,
    #[serde(default)]
    pub radio_table: Vec<RadioEntry>,
    #[serde(default)]
    pub radio_table_stats: Vec<RadioStatEntry>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One row of `ethernet_table`: a network interface and its MAC.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EthernetEntry {
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Aggregate traffic counters nested under `stat`.
///
/// Unprefixed fields cover all user traffic; `uplink-` fields cover
/// backhaul. The controller sends these as JSON numbers that are not
/// always integral, hence `f64`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceStat {
    #[serde(default)]
    pub rx_bytes: f64,
    #[serde(default)]
    pub tx_bytes: f64,
    #[serde(default)]
    pub rx_packets: f64,
    #[serde(default)]
    pub tx_packets: f64,
    #[serde(default)]
    pub tx_dropped: f64,
    #[serde(default, rename = "uplink-rx_bytes")]
    pub uplink_rx_bytes: f64,
    #[serde(default, rename = "uplink-tx_bytes")]
    pub uplink_tx_bytes: f64,
    #[serde(default, rename = "uplink-rx_packets")]
    pub uplink_rx_packets: f64,
    #[serde(default, rename = "uplink-tx_packets")]
    pub uplink_tx_packets: f64,
}

/// One row of `radio_table`: radio interface name and band.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadioEntry {
    pub name: String,
    /// Band identifier: `ng` (2.4 GHz), `na` (5 GHz), `6e`, ...
    #[serde(default)]
    pub radio: String,
}

/// One row of `radio_table_stats`, joined to `radio_table` by `name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadioStatEntry {
    pub name: String,
    #[serde(default, rename = "user-num_sta")]
    pub user_num_sta: Option<u32>,
    #[serde(default, rename = "guest-num_sta")]
    pub guest_num_sta: Option<u32>,
}

// ── Site ─────────────────────────────────────────────────────────────

/// Site object from `/api/self/sites`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacySite {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_decodes_stats_and_radios() {
        let raw = json!({
            "_id": "5a1b",
            "mac": "f0:9f:c2:00:00:01",
            "name": "Lobby AP",
            "adopted": true,
            "uptime": 3600,
            "ethernet_table": [{ "mac": "f0:9f:c2:00:00:01", "name": "eth0", "num_port": 1 }],
            "stat": {
                "rx_bytes": 100.0,
                "tx_bytes": 50,
                "tx_dropped": 1,
                "uplink-rx_bytes": 20,
                "uplink-tx_packets": 1
            },
            "radio_table": [{ "name": "wifi0", "radio": "ng" }],
            "radio_table_stats": [{ "name": "wifi0", "user-num_sta": 4, "guest-num_sta": 2 }],
            "version": "6.5.28",
            "model": "U7PG2"
        });

        let device: LegacyDevice = serde_json::from_value(raw).unwrap();
        assert_eq!(device.uptime, Some(3600));
        assert_eq!(device.ethernet_table[0].name.as_deref(), Some("eth0"));
        let stat = device.stats.unwrap();
        assert!((stat.rx_bytes - 100.0).abs() < f64::EPSILON);
        assert!((stat.uplink_rx_bytes - 20.0).abs() < f64::EPSILON);
        assert!((stat.uplink_tx_packets - 1.0).abs() < f64::EPSILON);
        assert_eq!(device.radio_table_stats[0].user_num_sta, Some(4));
        assert_eq!(device.radio_table_stats[0].guest_num_sta, Some(2));
        assert_eq!(device.extra.get("version"), Some(&json!("6.5.28")));
        assert_eq!(device.extra.get("model"), Some(&json!("U7PG2")));
    }

    #[test]
    fn sparse_device_uses_defaults() {
        let device: LegacyDevice =
            serde_json::from_value(json!({ "_id": "x", "mac": "aa:bb:cc:dd:ee:ff" })).unwrap();
        assert!(!device.adopted);
        assert!(device.ethernet_table.is_empty());
        assert!(device.stats.is_none());
        assert!(device.radio_table.is_empty());
    }

    #[test]
    fn site_keeps_unmodelled_fields_in_extra() {
        let site: LegacySite = serde_json::from_value(json!({
            "_id": "s1", "name": "default", "desc": "Default", "role": "admin"
        }))
        .unwrap();
        assert_eq!(site.desc.as_deref(), Some("Default"));
        assert_eq!(site.extra.get("role"), Some(&json!("admin")));
    }
}
