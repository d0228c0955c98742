//! # Ironstream
//!
//! A **lazy, pull-based sequence engine** for Rust. A [`Stream<T>`] is a
//! declared chain of stages over a source; nothing runs until a terminal
//! operation pulls elements through it one at a time.
//!
//! ## Key Features
//!
//! - **Lazy evaluation** - intermediate operations only append stages
//! - **Short-circuiting** - `limit`, `find_first` and the `*_match` family stop
//!   pulling as soon as their answer is known, so infinite sources are fine
//! - **Stateful stages** - `distinct` and `sorted` buffer their input and emit
//!   once upstream is exhausted
//! - **Hazard detection** - a stateful stage behind an infinite source with no
//!   preceding limit is reported, warned about, or rejected
//! - **Collectors** - reusable mutable reductions (to vec, counting, joining, grouping)
//! - **Metrics and explain** - optional counters and a readable pipeline report
//!
//! ## Quick Start
//!
//! ```
//! use ironstream::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let evens = Stream::iterate(1, |x| x + 1)
//!     .filter(|x| x % 2 == 0)
//!     .map(|x| x * 10)
//!     .limit(3)
//!     .to_vec()?;
//! assert_eq!(evens, vec![20, 40, 60]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Sources
//!
//! - [`Stream::of`] / [`Stream::from_vec`] / [`Stream::from_iter`] - finite data
//! - [`Stream::generate`] / [`Stream::iterate`] - infinite sequences
//! - [`Stream::range`] / [`Stream::range_closed`] and their `_by` variants
//! - [`Stream::concat`] - one stream after another
//! - [`Stream::from_source`] - any [`Source`] implementation
//!
//! ### Intermediate operations
//!
//! Each consumes the stream and returns a new one with one more stage:
//! - [`map`](Stream::map), [`filter`](Stream::filter), [`peek`](Stream::peek)
//! - [`flat_map`](Stream::flat_map) and [`flat_map_stream`](Stream::flat_map_stream)
//! - [`limit`](Stream::limit), [`skip`](Stream::skip)
//! - [`distinct`](Stream::distinct), [`sorted`](Stream::sorted) (stateful)
//!
//! ### Terminal operations
//!
//! Terminals take `&mut self` and pull until done: [`to_vec`](Stream::to_vec),
//! [`count`](Stream::count), [`reduce`](Stream::reduce), [`max`](Stream::max),
//! [`find_first`](Stream::find_first), [`all_match`](Stream::all_match),
//! [`collect`](Stream::collect), and friends. A stream that has been drained
//! yields nothing to a second terminal.
//!
//! ## Errors
//!
//! Terminals return [`anyhow::Result`]. Engine failures carry a
//! [`StreamError`]; failures from `try_*` closures pass through unchanged.
//!
//! ## Module Overview
//!
//! - [`stream`] - the `Stream` type, sources and intermediate operations
//! - [`pipeline`] - the pull loop over stages
//! - [`stage`] - stage kinds and their buffering rules
//! - [`source`] - the `Source` trait and built-in sources
//! - [`collectors`] - `Collector` trait and built-ins
//! - [`explain`] - pipeline reports
//! - [`metrics`] - optional counters and timings
//! - [`testing`] - assertions, debug taps and fixtures for tests

pub mod collectors;
pub mod error;
pub mod explain;
pub mod helpers;
pub mod metrics;
pub mod options;
pub mod pipeline;
pub mod source;
pub mod stage;
pub mod stream;
pub mod testing;
pub mod type_token;

pub use collectors::Collector;
pub use error::StreamError;
pub use explain::{ExplainStep, PipelineExplanation};
pub use helpers::*;
pub use metrics::MetricsCollector;
pub use options::{HazardPolicy, StreamOptions};
pub use pipeline::Pipeline;
pub use source::{RangeStep, Source};
pub use stage::{Stage, StageClass};
pub use stream::Stream;
