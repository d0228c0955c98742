//! Folding terminals: reductions and extremes.

use crate::Stream;
use anyhow::Result;
use std::cmp::Ordering;

impl<T: 'static> Stream<T> {
    /// Left fold starting from `init`.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn fold<A, F>(&mut self, init: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, T) -> A,
    {
        self.terminal("fold", |s| {
            let mut acc = init;
            while let Some(x) = s.pull()? {
                acc = f(acc, x);
            }
            Ok(acc)
        })
    }

    /// Combine the elements left to right; `None` for an empty stream.
    ///
    /// ```
    /// use ironstream::Stream;
    /// assert_eq!(Stream::of([1, 2, 3, 4]).reduce(|a, b| a + b).unwrap(), Some(10));
    /// assert_eq!(Stream::<i32>::empty().reduce(|a, b| a + b).unwrap(), None);
    /// ```
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn reduce<F>(&mut self, mut f: F) -> Result<Option<T>>
    where
        F: FnMut(T, T) -> T,
    {
        self.terminal("reduce", |s| {
            let Some(mut acc) = s.pull()? else {
                return Ok(None);
            };
            while let Some(x) = s.pull()? {
                acc = f(acc, x);
            }
            Ok(Some(acc))
        })
    }

    /// Combine the elements left to right starting from `seed`. An empty
    /// stream yields `seed` itself.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn reduce_with_seed<F>(&mut self, seed: T, f: F) -> Result<T>
    where
        F: FnMut(T, T) -> T,
    {
        self.fold(seed, f)
    }

    /// Largest element under `cmp`; the first one wins ties.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn max_by<F>(&mut self, mut cmp: F) -> Result<Option<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.best_by("max_by", move |candidate, best| {
            cmp(candidate, best) == Ordering::Greater
        })
    }

    /// Smallest element under `cmp`; the first one wins ties.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn min_by<F>(&mut self, mut cmp: F) -> Result<Option<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.best_by("min_by", move |candidate, best| {
            cmp(candidate, best) == Ordering::Less
        })
    }

    // Linear scan keeping the best so far.
    fn best_by<F>(&mut self, op: &'static str, mut replaces: F) -> Result<Option<T>>
    where
        F: FnMut(&T, &T) -> bool,
    {
        self.terminal(op, |s| {
            let mut best: Option<T> = None;
            while let Some(x) = s.pull()? {
                best = match best {
                    Some(b) if !replaces(&x, &b) => Some(b),
                    _ => Some(x),
                };
            }
            Ok(best)
        })
    }
}

impl<T: PartialOrd + 'static> Stream<T> {
    /// Largest element by `>`. Incomparable elements (such as NaN) never
    /// replace the current best.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn max(&mut self) -> Result<Option<T>> {
        self.best_by("max", |candidate, best| candidate > best)
    }

    /// Smallest element by `<`.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn min(&mut self) -> Result<Option<T>> {
        self.best_by("min", |candidate, best| candidate < best)
    }
}
