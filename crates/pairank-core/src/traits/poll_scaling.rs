//! Poll-level rescaling port.

use crate::models::{GlobalEntityScore, ScaledIndividualScore};

/// Poll-specific linear corrections, applied in place.
pub trait PollScaling: Send + Sync {
    fn rescale_global(&self, poll: &str, rows: &mut [GlobalEntityScore]);

    fn rescale_individual(&self, poll: &str, rows: &mut [ScaledIndividualScore]);
}
