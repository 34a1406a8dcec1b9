// ── Scrape orchestration ──
//
// Fans a scrape out over the registered collectors, drains their
// observations and appends exporter self-metrics. Collector failures
// never fail the scrape; they surface as markers and a zero success gauge.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::collector::MetricCollector;
use crate::expose;
use crate::metric::{Descriptor, InvalidMetric, MetricKind, Namespace, Observation, ObservationSink};

pub struct Exporter {
    collectors: Vec<Box<dyn MetricCollector>>,
    collector_success: Arc<Descriptor>,
    scrape_duration: Arc<Descriptor>,
}

impl Exporter {
    pub fn new(namespace: &Namespace) -> Self {
        Self {
            collectors: Vec::new(),
            collector_success: Arc::new(Descriptor::new(
                namespace,
                "exporter",
                "collector_success",
                "Whether the last collection pass of a collector succeeded",
                &["collector"],
                MetricKind::Gauge,
            )),
            scrape_duration: Arc::new(Descriptor::new(
                namespace,
                "exporter",
                "scrape_duration_seconds",
                "Time spent collecting metrics from the controller",
                &[],
                MetricKind::Gauge,
            )),
        }
    }

    #[must_use]
    pub fn with_collector(mut self, collector: Box<dyn MetricCollector>) -> Self {
        self.collectors.push(collector);
        self
    }

    /// Every descriptor the exporter can emit, collectors first.
    pub fn describe(&self) -> Vec<Arc<Descriptor>> {
        let mut descriptors: Vec<Arc<Descriptor>> =
            self.collectors.iter().flat_map(|c| c.describe()).collect();
        descriptors.push(Arc::clone(&self.collector_success));
        descriptors.push(Arc::clone(&self.scrape_duration));
        descriptors
    }

    /// Run every collector once, in registration order.
    pub async fn scrape(&self) -> Scrape {
        let started = Instant::now();
        let (sink, mut rx) = ObservationSink::channel();

        for collector in &self.collectors {
            let ok = collector.collect_error(&sink).await.is_ok();
            sink.emit(
                &self.collector_success,
                if ok { 1.0 } else { 0.0 },
                vec![collector.name().to_owned()],
            );
        }

        let elapsed = started.elapsed();
        sink.emit(&self.scrape_duration, elapsed.as_secs_f64(), Vec::new());
        drop(sink);

        let mut observations = Vec::new();
        while let Some(obs) = rx.recv().await {
            observations.push(obs);
        }
        debug!(
            observations = observations.len(),
            elapsed_ms = elapsed.as_millis(),
            "scrape complete"
        );

        Scrape {
            descriptors: self.describe(),
            observations,
        }
    }
}

/// Result of one scrape.
#[derive(Debug)]
pub struct Scrape {
    descriptors: Vec<Arc<Descriptor>>,
    observations: Vec<Observation>,
}

impl Scrape {
    pub fn invalid(&self) -> impl Iterator<Item = &InvalidMetric> {
        self.observations.iter().filter_map(|o| match o {
            Observation::Invalid(i) => Some(i),
            Observation::Sample(_) => None,
        })
    }

    /// Render as Prometheus text exposition.
    pub fn render(&self) -> String {
        expose::render(&self.descriptors, &self.observations)
    }
}
