//! Helpers for testing code that builds streams.
//!
//! - **Assertions** - compare stream output with expected values, and check
//!   which [`StreamError`](crate::StreamError) a failing terminal reported
//! - **Debug taps** - print elements to stderr as they are pulled
//! - **Fixtures** - call counters, counting predicates and suppliers, for
//!   checking laziness and short-circuiting
//!
//! # Quick Start
//!
//! ```
//! use ironstream::*;
//! use ironstream::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let calls = CallCounter::new();
//! let mut s = Stream::iterate(1, |x| x + 1)
//!     .filter(counting_predicate(&calls, |x: &i32| x % 2 == 0))
//!     .limit(2);
//! assert_stream_yields(&mut s, &[2, 4])?;
//! assert_eq!(calls.get(), 4);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod debug;
pub mod fixtures;

pub use assertions::*;
pub use debug::*;
pub use fixtures::*;

use crate::Stream;

/// Print the declared stages of `stream` to stdout without pulling from it.
pub fn debug_print_pipeline<T: 'static>(stream: &Stream<T>) {
    let pipeline = stream.pipeline();
    println!("Pipeline: {}", pipeline.describe());
    for (i, stage) in pipeline.stages().iter().enumerate() {
        println!("  [{i}] {} ({:?})", stage.name(), stage.class());
    }
    for hazard in pipeline.hazards() {
        println!("  hazard: {hazard}");
    }
}
