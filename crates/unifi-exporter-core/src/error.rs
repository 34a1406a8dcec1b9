// ── Core error types ──
//
// Three failure classes reach callers of the core: site selection at
// startup, the resource client during a pass, and devices that break a
// collection precondition. Transport details stay wrapped inside
// `SourceError`; the core only propagates or logs them.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by a `ResourceClient`.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The controller request itself failed (network, auth, decode).
    #[error(transparent)]
    Api(#[from] unifi_exporter_api::Error),

    /// The per-call budget elapsed before the controller answered.
    #[error("controller did not answer within {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Startup site selection failed.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("site {requested:?} was not found in UniFi Controller")]
    NotFound { requested: String },
}

/// A collection pass stopped early.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Fetching a site's device snapshot failed.
    #[error("failed to fetch devices for site '{site}': {source}")]
    SourceUnavailable {
        site: String,
        #[source]
        source: SourceError,
    },

    /// A device violates a collection precondition.
    #[error("device '{device}' on site '{site}' is malformed: {reason}")]
    MalformedDevice {
        site: String,
        device: String,
        reason: String,
    },
}
