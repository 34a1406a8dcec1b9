// ── API-to-domain type conversions ──
//
// Bridges raw legacy API records into the exporter's domain model. Wire
// quirks (float counters, hyphenated field names, radio stats kept in a
// separate table) are resolved here so collectors see clean values.

use std::time::Duration;

use unifi_exporter_api::legacy::models::{DeviceStat, LegacyDevice, LegacySite, RadioStatEntry};

use crate::model::{Device, DeviceStats, MacAddress, Nic, Radio, Site, StationCounts, TrafficStats};

// ── Helpers ────────────────────────────────────────────────────────

/// Controller counters arrive as JSON numbers; negative or non-finite
/// values collapse to zero.
#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn counter(raw: f64) -> u64 {
    if raw.is_finite() && raw > 0.0 {
        raw as u64
    } else {
        0
    }
}

fn traffic(stat: &DeviceStat) -> DeviceStats {
    DeviceStats {
        all: TrafficStats {
            rx_bytes: counter(stat.rx_bytes),
            tx_bytes: counter(stat.tx_bytes),
            rx_packets: counter(stat.rx_packets),
            tx_packets: counter(stat.tx_packets),
            tx_dropped: counter(stat.tx_dropped),
        },
        uplink: TrafficStats {
            rx_bytes: counter(stat.uplink_rx_bytes),
            tx_bytes: counter(stat.uplink_tx_bytes),
            rx_packets: counter(stat.uplink_rx_packets),
            tx_packets: counter(stat.uplink_tx_packets),
            tx_dropped: 0,
        },
    }
}

fn station_counts(stats: &[RadioStatEntry], radio_name: &str) -> StationCounts {
    stats
        .iter()
        .find(|s| s.name == radio_name)
        .map(|s| StationCounts {
            user: u64::from(s.user_num_sta.unwrap_or(0)),
            guest: u64::from(s.guest_num_sta.unwrap_or(0)),
        })
        .unwrap_or_default()
}

// ── Site ───────────────────────────────────────────────────────────

impl From<LegacySite> for Site {
    fn from(s: LegacySite) -> Self {
        // `desc` is the human-friendly label; `name` is the internal slug (e.g. "default").
        let description = s
            .desc
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| s.name.clone());

        Site {
            id: s.id,
            name: s.name,
            description,
        }
    }
}

// ── Device ─────────────────────────────────────────────────────────

impl From<LegacyDevice> for Device {
    fn from(d: LegacyDevice) -> Self {
        let stats = d.stats.as_ref().map(traffic).unwrap_or_default();

        let radios = d
            .radio_table
            .iter()
            .map(|r| Radio {
                name: r.name.clone(),
                radio: r.radio.clone(),
                stations: station_counts(&d.radio_table_stats, &r.name),
            })
            .collect();

        let nics = d
            .ethernet_table
            .into_iter()
            .map(|e| Nic {
                name: e.name.unwrap_or_default(),
                mac: MacAddress::new(&e.mac),
            })
            .collect();

        Device {
            id: d.id,
            mac: MacAddress::new(&d.mac),
            name: d.name.unwrap_or_default(),
            adopted: d.adopted,
            uptime: Duration::from_secs(d.uptime.and_then(|u| u.try_into().ok()).unwrap_or(0)),
            nics,
            stats,
            radios,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use unifi_exporter_api::legacy::models::{EthernetEntry, RadioEntry};

    fn legacy_device() -> LegacyDevice {
        LegacyDevice {
            id: "d1".into(),
            mac: "F0-9F-C2-00-00-01".into(),
            name: Some("Lobby".into()),
            adopted: true,
            uptime: Some(90),
            ethernet_table: vec![EthernetEntry {
                mac: "F0:9F:C2:00:00:01".into(),
                name: Some("eth0".into()),
            }],
            stats: Some(DeviceStat {
                rx_bytes: 100.0,
                tx_bytes: 50.0,
                rx_packets: 10.0,
                tx_packets: 5.0,
                tx_dropped: 1.0,
                uplink_rx_bytes: 20.0,
                uplink_tx_bytes: 10.0,
                uplink_rx_packets: 2.0,
                uplink_tx_packets: 1.0,
            }),
            radio_table: vec![
                RadioEntry { name: "wifi0".into(), radio: "ng".into() },
                RadioEntry { name: "wifi1".into(), radio: "na".into() },
            ],
            radio_table_stats: vec![RadioStatEntry {
                name: "wifi1".into(),
                user_num_sta: Some(4),
                guest_num_sta: Some(1),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn device_conversion_normalizes_fields() {
        let device = Device::from(legacy_device());

        assert_eq!(device.mac.as_str(), "f0:9f:c2:00:00:01");
        assert_eq!(device.uptime, Duration::from_secs(90));
        assert_eq!(device.primary_nic_mac().unwrap().as_str(), "f0:9f:c2:00:00:01");
    }

    #[test]
    fn every_counter_lands_in_its_own_field() {
        let device = Device::from(legacy_device());

        assert_eq!(
            device.stats,
            DeviceStats {
                all: TrafficStats {
                    rx_bytes: 100,
                    tx_bytes: 50,
                    rx_packets: 10,
                    tx_packets: 5,
                    tx_dropped: 1,
                },
                uplink: TrafficStats {
                    rx_bytes: 20,
                    tx_bytes: 10,
                    rx_packets: 2,
                    tx_packets: 1,
                    tx_dropped: 0,
                },
            }
        );
    }

    #[test]
    fn radio_stats_join_by_name() {
        let device = Device::from(legacy_device());

        assert_eq!(device.radios[0].stations, StationCounts::default());
        assert_eq!(device.radios[1].radio, "na");
        assert_eq!(device.radios[1].stations, StationCounts { user: 4, guest: 1 });
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        let mut raw = legacy_device();
        raw.uptime = Some(-1);
        raw.stats = Some(DeviceStat { rx_bytes: -5.0, tx_bytes: f64::NAN, ..Default::default() });

        let device = Device::from(raw);
        assert_eq!(device.uptime, Duration::ZERO);
        assert_eq!(device.stats.all.rx_bytes, 0);
        assert_eq!(device.stats.all.tx_bytes, 0);
    }

    #[test]
    fn site_description_falls_back_to_name() {
        let site = Site::from(LegacySite {
            id: "s1".into(),
            name: "default".into(),
            desc: Some(String::new()),
            extra: serde_json::Map::new(),
        });
        assert_eq!(site.description, "default");
    }
}
