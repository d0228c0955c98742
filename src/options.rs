//! Per-stream evaluation options.
//!
//! Options travel with a pipeline from one `Stream` value to the next, so
//! they can be set once near the source:
//!
//! ```
//! use ironstream::*;
//!
//! let opts = StreamOptions {
//!     hazard_policy: HazardPolicy::Fail,
//!     ..Default::default()
//! };
//! let mut s = Stream::iterate(1u64, |n| n + 1).with_options(opts).distinct();
//! assert!(s.count().is_err());
//! ```

use crate::metrics::MetricsCollector;

/// What to do when a stateful stage would buffer an infinite source.
///
/// A `distinct` or `sorted` stage fed by an infinite source with no `limit`
/// before it can never produce its first element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HazardPolicy {
    /// Evaluate anyway; the terminal operation never returns.
    Ignore,
    /// Log a warning when the stage is declared, then evaluate anyway.
    #[default]
    Warn,
    /// Fail the first pull with
    /// [`StreamError::UnboundedStatefulStage`](crate::StreamError::UnboundedStatefulStage).
    Fail,
}

#[derive(Clone, Default)]
pub struct StreamOptions {
    pub hazard_policy: HazardPolicy,
    /// When set, the pipeline records pull counters and terminal timings here.
    pub metrics: Option<MetricsCollector>,
}

impl std::fmt::Debug for StreamOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamOptions")
            .field("hazard_policy", &self.hazard_policy)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
