// ── Device collector ──
//
// Walks the configured sites in order and turns each device snapshot into
// inventory, uptime, traffic and station series. The first failure ends
// the pass; everything emitted before it stays on the sink.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, error};

use crate::collector::MetricCollector;
use crate::error::{CollectError, SourceError};
use crate::metric::{Descriptor, Namespace, ObservationSink};
use crate::model::{Device, Site, TrafficStats};
use crate::registry::DeviceDescriptors;
use crate::source::ResourceClient;

/// Default budget for one site's device fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// A failure plus the descriptor that was being produced when it happened.
struct Failure {
    descriptor: Arc<Descriptor>,
    error: CollectError,
}

impl Failure {
    fn new(descriptor: &Arc<Descriptor>, error: CollectError) -> Self {
        Self {
            descriptor: Arc::clone(descriptor),
            error,
        }
    }
}

/// `site, id, mac, name` for one device.
struct BaseLabels<'a> {
    device: &'a Device,
    values: [String; 4],
}

impl BaseLabels<'_> {
    /// Fresh label vector: the base values followed by `extra`.
    fn with(&self, extra: &[&str]) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.values.len() + extra.len());
        labels.extend(self.values.iter().cloned());
        labels.extend(extra.iter().map(|s| (*s).to_owned()));
        labels
    }
}

#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
fn count(n: usize) -> f64 {
    n as f64
}

#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
fn value(n: u64) -> f64 {
    n as f64
}

/// Resolve base labels for every device of a site. Fails on the first
/// device that reported no network interface.
fn base_labels<'a>(site: &Site, devices: &'a [Device]) -> Result<Vec<BaseLabels<'a>>, CollectError> {
    devices
        .iter()
        .map(|device| {
            let Some(mac) = device.primary_nic_mac() else {
                return Err(CollectError::MalformedDevice {
                    site: site.description.clone(),
                    device: device.id.clone(),
                    reason: "device reports no network interfaces".into(),
                });
            };
            Ok(BaseLabels {
                device,
                values: [
                    site.description.clone(),
                    device.id.clone(),
                    mac.to_string(),
                    device.name.clone(),
                ],
            })
        })
        .collect()
}

/// Collector for device metrics across a fixed set of sites.
pub struct DeviceCollector<C> {
    metrics: DeviceDescriptors,
    client: Arc<C>,
    sites: Vec<Site>,
    fetch_timeout: Duration,
}

impl<C: ResourceClient> DeviceCollector<C> {
    pub fn new(namespace: &Namespace, client: Arc<C>, sites: Vec<Site>) -> Self {
        Self {
            metrics: DeviceDescriptors::new(namespace),
            client,
            sites,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    async fn fetch(&self, site: &Site) -> Result<Vec<Device>, CollectError> {
        tokio::time::timeout(self.fetch_timeout, self.client.devices(&site.name))
            .await
            .unwrap_or_else(|_elapsed| Err(SourceError::Timeout(self.fetch_timeout)))
            .map_err(|source| CollectError::SourceUnavailable {
                site: site.description.clone(),
                source,
            })
    }

    async fn pass(&self, sink: &ObservationSink) -> Result<(), Failure> {
        for site in &self.sites {
            let devices = self
                .fetch(site)
                .await
                .map_err(|e| Failure::new(&self.metrics.devices, e))?;
            debug!(site = %site.description, devices = devices.len(), "fetched device snapshot");

            let site_label = &site.description;
            sink.emit(&self.metrics.devices, count(devices.len()), vec![site_label.clone()]);
            self.collect_adoptions(sink, site_label, &devices);

            let labeled = base_labels(site, &devices)
                .map_err(|e| Failure::new(&self.metrics.uptime_seconds_total, e))?;

            self.collect_uptime(sink, &labeled);
            self.collect_traffic(sink, &labeled);
            self.collect_stations(sink, &labeled);
        }
        Ok(())
    }

    fn collect_adoptions(&self, sink: &ObservationSink, site_label: &str, devices: &[Device]) {
        let adopted = devices.iter().filter(|d| d.adopted).count();
        let unadopted = devices.len() - adopted;

        sink.emit(&self.metrics.adopted, count(adopted), vec![site_label.to_owned()]);
        sink.emit(&self.metrics.unadopted, count(unadopted), vec![site_label.to_owned()]);
    }

    fn collect_uptime(&self, sink: &ObservationSink, labeled: &[BaseLabels<'_>]) {
        for labels in labeled {
            sink.emit(
                &self.metrics.uptime_seconds_total,
                value(labels.device.uptime.as_secs()),
                labels.with(&[]),
            );
        }
    }

    fn collect_traffic(&self, sink: &ObservationSink, labeled: &[BaseLabels<'_>]) {
        for labels in labeled {
            let stats = &labels.device.stats;
            self.emit_traffic(sink, labels, "user", &stats.all, true);
            self.emit_traffic(sink, labels, "uplink", &stats.uplink, false);
        }
    }

    fn emit_traffic(
        &self,
        sink: &ObservationSink,
        labels: &BaseLabels<'_>,
        connection: &str,
        stats: &TrafficStats,
        with_dropped: bool,
    ) {
        let m = &self.metrics;
        let mut series = vec![
            (&m.received_bytes_total, stats.rx_bytes),
            (&m.transmitted_bytes_total, stats.tx_bytes),
            (&m.received_packets_total, stats.rx_packets),
            (&m.transmitted_packets_total, stats.tx_packets),
        ];
        if with_dropped {
            series.push((&m.transmitted_packets_dropped_total, stats.tx_dropped));
        }

        for (descriptor, counter) in series {
            sink.emit(descriptor, value(counter), labels.with(&[connection]));
        }
    }

    fn collect_stations(&self, sink: &ObservationSink, labeled: &[BaseLabels<'_>]) {
        for labels in labeled {
            for radio in &labels.device.radios {
                sink.emit(
                    &self.metrics.stations,
                    value(radio.stations.user),
                    labels.with(&[radio.name.as_str(), radio.radio.as_str(), "private"]),
                );
                sink.emit(
                    &self.metrics.stations,
                    value(radio.stations.guest),
                    labels.with(&[radio.name.as_str(), radio.radio.as_str(), "guest"]),
                );
            }
        }
    }
}

impl<C: ResourceClient> MetricCollector for DeviceCollector<C> {
    fn name(&self) -> &'static str {
        "device"
    }

    fn describe(&self) -> Vec<Arc<Descriptor>> {
        self.metrics.all()
    }

    fn collect_error<'a>(&'a self, sink: &'a ObservationSink) -> BoxFuture<'a, Result<(), CollectError>> {
        Box::pin(async move {
            match self.pass(sink).await {
                Ok(()) => Ok(()),
                Err(Failure { descriptor, error }) => {
                    error!(metric = descriptor.name(), error = %error, "failed collecting device metrics");
                    sink.invalid(&descriptor, &error);
                    Err(error)
                }
            }
        })
    }
}
