// ── Metric primitives ──
//
// Descriptors are built once at collector construction and shared by
// reference. Each collection pass pushes `Observation`s into an
// `ObservationSink`; the exporter drains the receiving half and renders.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

/// Namespace prefix applied to every exported metric name.
pub const DEFAULT_NAMESPACE: &str = "unifi";

// ── Namespace ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join the non-empty parts with `_`. An empty `name` yields an empty
    /// string, mirroring how Prometheus client libraries build names.
    pub fn fq_name(&self, subsystem: &str, name: &str) -> String {
        if name.is_empty() {
            return String::new();
        }
        [self.0.as_str(), subsystem, name]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Descriptor ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gauge => "gauge",
            Self::Counter => "counter",
        }
    }
}

/// Immutable definition of one metric family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    name: String,
    help: &'static str,
    labels: &'static [&'static str],
    kind: MetricKind,
}

impl Descriptor {
    pub fn new(
        namespace: &Namespace,
        subsystem: &str,
        name: &str,
        help: &'static str,
        labels: &'static [&'static str],
        kind: MetricKind,
    ) -> Self {
        Self {
            name: namespace.fq_name(subsystem, name),
            help,
            labels,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &'static str {
        self.help
    }

    /// Label names, in the order values must be supplied.
    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }
}

// ── Observations ───────────────────────────────────────────────────

/// One labeled value for a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub descriptor: Arc<Descriptor>,
    pub value: f64,
    pub labels: Vec<String>,
}

/// Marker signalling that a pass failed; attributed to the descriptor
/// being produced when the failure happened.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidMetric {
    pub descriptor: Arc<Descriptor>,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Sample(Sample),
    Invalid(InvalidMetric),
}

impl Observation {
    pub fn descriptor(&self) -> &Arc<Descriptor> {
        match self {
            Self::Sample(s) => &s.descriptor,
            Self::Invalid(i) => &i.descriptor,
        }
    }
}

// ── Sink ───────────────────────────────────────────────────────────

/// Write half of a collection pass.
#[derive(Debug, Clone)]
pub struct ObservationSink {
    tx: mpsc::UnboundedSender<Observation>,
}

impl ObservationSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Observation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit a sample. `labels` must line up with the descriptor's label names.
    pub fn emit(&self, descriptor: &Arc<Descriptor>, value: f64, labels: Vec<String>) {
        debug_assert_eq!(
            labels.len(),
            descriptor.labels().len(),
            "label count mismatch for {}",
            descriptor.name()
        );
        self.send(Observation::Sample(Sample {
            descriptor: Arc::clone(descriptor),
            value,
            labels,
        }));
    }

    pub fn invalid(&self, descriptor: &Arc<Descriptor>, error: &impl fmt::Display) {
        self.send(Observation::Invalid(InvalidMetric {
            descriptor: Arc::clone(descriptor),
            error: error.to_string(),
        }));
    }

    fn send(&self, observation: Observation) {
        if self.tx.send(observation).is_err() {
            trace!("observation receiver dropped");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fq_name_skips_empty_parts() {
        let ns = Namespace::default();
        assert_eq!(ns.fq_name("devices", ""), "");
        assert_eq!(ns.fq_name("", "devices"), "unifi_devices");
        assert_eq!(ns.fq_name("devices", "adopted"), "unifi_devices_adopted");
        assert_eq!(Namespace::new("").fq_name("", "up"), "up");
    }

    #[test]
    fn sink_delivers_in_emission_order() {
        let desc = Arc::new(Descriptor::new(
            &Namespace::default(),
            "",
            "devices",
            "Total number of devices",
            &["site"],
            MetricKind::Gauge,
        ));
        let (sink, mut rx) = ObservationSink::channel();
        sink.emit(&desc, 2.0, vec!["Default".into()]);
        sink.invalid(&desc, &"boom");
        drop(sink);

        let first = rx.try_recv().unwrap();
        assert!(matches!(first, Observation::Sample(ref s) if s.labels == ["Default"]));
        let second = rx.try_recv().unwrap();
        assert!(matches!(second, Observation::Invalid(ref i) if i.error == "boom"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    #[should_panic(expected = "label count mismatch")]
    fn sink_rejects_wrong_label_count() {
        let desc = Arc::new(Descriptor::new(
            &Namespace::default(),
            "",
            "devices",
            "Total number of devices",
            &["site"],
            MetricKind::Gauge,
        ));
        let (sink, _rx) = ObservationSink::channel();
        sink.emit(&desc, 1.0, Vec::new());
    }
}
