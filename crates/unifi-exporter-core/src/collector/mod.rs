// ── Collector capability ──
//
// One implementation per controller resource family. The exporter holds
// them as trait objects and drives a pass per scrape.

pub mod device;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::CollectError;
use crate::metric::{Descriptor, ObservationSink};

pub use device::DeviceCollector;

pub trait MetricCollector: Send + Sync {
    /// Short identifier used in exporter self-metrics.
    fn name(&self) -> &'static str;

    /// Every descriptor this collector can emit, independent of any pass.
    fn describe(&self) -> Vec<Arc<Descriptor>>;

    /// Run a full pass, returning the first error after emitting
    /// everything collectible before it.
    fn collect_error<'a>(&'a self, sink: &'a ObservationSink) -> BoxFuture<'a, Result<(), CollectError>>;

    /// Run a full pass, discarding the error. Failures still surface as
    /// an invalid-metric marker on the sink.
    fn collect<'a>(&'a self, sink: &'a ObservationSink) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let _ = self.collect_error(sink).await;
        })
    }
}
