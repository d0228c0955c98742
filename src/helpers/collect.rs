//! Mutable-reduction terminals backed by [`Collector`]s.

use crate::Stream;
use crate::collectors::Collector;
use anyhow::Result;

impl<T: 'static> Stream<T> {
    /// Reduce the remaining elements with a [`Collector`].
    ///
    /// The collector's supplier runs once, `accumulate` once per element in
    /// pull order, and `finish` once at the end. `combine` is never called.
    ///
    /// ```
    /// use ironstream::*;
    /// use ironstream::collectors::Summing;
    ///
    /// let total = Stream::range(1, 5).collect(Summing::new()).unwrap();
    /// assert_eq!(total, 10);
    /// ```
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn collect<C>(&mut self, collector: C) -> Result<C::Output>
    where
        C: Collector<T>,
    {
        self.terminal("collect", |s| {
            let mut acc = collector.supplier();
            while let Some(x) = s.pull()? {
                collector.accumulate(&mut acc, x);
            }
            Ok(collector.finish(acc))
        })
    }

    /// Reduce into a container built by `supplier` and filled by `accumulator`.
    ///
    /// `combiner` is accepted for parity with parallel reducers and is not
    /// called by sequential evaluation.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn collect_with<A, S, F, C>(
        &mut self,
        supplier: S,
        mut accumulator: F,
        combiner: C,
    ) -> Result<A>
    where
        S: FnOnce() -> A,
        F: FnMut(&mut A, T),
        C: FnMut(&mut A, A),
    {
        let _ = combiner;
        self.terminal("collect_with", |s| {
            let mut acc = supplier();
            while let Some(x) = s.pull()? {
                accumulator(&mut acc, x);
            }
            Ok(acc)
        })
    }
}
