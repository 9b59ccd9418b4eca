//! Failure reporting
//!
//! Turns per-domain failures into log lines. The log is the only failure
//! surface of a pass: the process still exits zero when a domain fails, so
//! everything a debugging session needs has to land here.

use std::collections::BTreeMap;

use tracing::warn;

use crate::traits::UpdateFailure;

/// Emit one warning per failed domain. No-op for an empty map.
pub fn log_failures(failures: &BTreeMap<String, UpdateFailure>) {
    for (domain, failure) in failures {
        let detail = serde_json::to_string(&failure.raw)
            .unwrap_or_else(|_| format!("{:?}", failure.raw));
        warn!(
            %domain,
            err_count = failure.err_count,
            done = failure.done,
            raw = %detail,
            "domain update failed"
        );
    }
}
