// 3rd party crates
use async_trait::async_trait;

// Project imports
use crate::checks::types::Target;

// Current module imports
use super::types::ProbeOutcome;

/// Liveness check for a single DNS target.
///
/// Implementations make exactly one attempt and never fail: any transport or
/// protocol error is reported as an unavailable [`ProbeOutcome`]. Callers are
/// responsible for skipping targets that are under maintenance.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Queries `target` once and classifies the result.
    async fn probe(&self, target: &Target) -> ProbeOutcome;

    /// Short name used in logs.
    fn get_name(&self) -> &str;
}
