// ── Site selection ──
//
// Narrows the controller's site list to the one the operator asked for.
// Runs once at startup; a miss is fatal to the caller.

use crate::error::SelectError;
use crate::model::Site;

/// Pick the monitored sites.
///
/// An empty `requested` keeps every site in controller order. Otherwise
/// `requested` is matched exactly (case-sensitive) against each site's
/// description and the single match is returned.
pub fn select_sites(requested: &str, sites: Vec<Site>) -> Result<Vec<Site>, SelectError> {
    if requested.is_empty() {
        return Ok(sites);
    }

    sites
        .into_iter()
        .find(|s| s.description == requested)
        .map(|s| vec![s])
        .ok_or_else(|| SelectError::NotFound {
            requested: requested.to_owned(),
        })
}

/// Render site descriptions for the startup log line, joined with `, `.
pub fn sites_string(sites: &[Site]) -> String {
    sites
        .iter()
        .map(|s| s.description.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
