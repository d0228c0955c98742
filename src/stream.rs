//! The fluent [`Stream<T>`] type: constructors and intermediate operations.
//!
//! Intermediate operations consume the stream and return a new one whose
//! pipeline has one more stage. Nothing is evaluated until a terminal
//! operation (see the `helpers` module) pulls.

use crate::metrics::MetricsCollector;
use crate::options::{HazardPolicy, StreamOptions};
use crate::pipeline::Pipeline;
use crate::source::{
    self, ArraySource, ConcatSource, IterSource, IterateSource, RangeSource, RangeStep, Source,
    SupplierSource,
};
use crate::stage::{Stage, StageKind};
use crate::type_token::{Element, erase, unerase, unerase_ref};
use anyhow::Result;
use std::cmp::Ordering;
use std::marker::PhantomData;

/// A lazy sequence of `T` backed by a single-owner pipeline.
pub struct Stream<T> {
    pub(crate) pipeline: Pipeline,
    pub(crate) started: bool,
    _t: PhantomData<T>,
}

impl<T: 'static> Stream<T> {
    fn from_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            started: false,
            _t: PhantomData,
        }
    }

    /// Build a stream over any [`Source`].
    pub fn from_source<S>(source: S) -> Self
    where
        S: Source<T> + 'static,
    {
        Self::from_pipeline(Pipeline::new(source::boxed(source)))
    }

    /// Yield the elements of `data` in order.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self::from_source(ArraySource::new(data))
    }

    /// Yield a fixed set of values.
    ///
    /// ```
    /// use ironstream::Stream;
    /// assert_eq!(Stream::of([1, 2, 3]).count().unwrap(), 3);
    /// ```
    pub fn of<const N: usize>(values: [T; N]) -> Self {
        Self::from_vec(Vec::from(values))
    }

    /// Drive any iterator lazily.
    ///
    /// Iterators whose `size_hint` is `(usize::MAX, None)`, such as `0..`,
    /// count as infinite sources for hazard detection.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_source(IterSource::new(iter.into_iter()))
    }

    pub fn once(value: T) -> Self {
        Self::from_vec(vec![value])
    }

    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Infinite stream calling `supplier` for every element.
    pub fn generate<F>(supplier: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Self::from_source(SupplierSource::new(supplier))
    }

    /// Infinite stream `seed, step(&seed), step(&step(&seed)), ...`.
    ///
    /// ```
    /// use ironstream::Stream;
    /// let v = Stream::iterate(1, |n| n * 2).limit(4).to_vec().unwrap();
    /// assert_eq!(v, vec![1, 2, 4, 8]);
    /// ```
    pub fn iterate<F>(seed: T, step: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> T + 'static,
    {
        Self::from_source(IterateSource::new(seed, step))
    }

    /// All elements of `first`, then all elements of `second`.
    ///
    /// Built as a source of `Option<T>` drained through a flatten-optional
    /// stage, the same stage [`Stream::flat_map_option`] uses.
    pub fn concat(first: Stream<T>, second: Stream<T>) -> Self {
        Stream::<Option<T>>::from_source(ConcatSource::<T>::new(
            first.pipeline,
            second.pipeline,
        ))
        .flat_map_option(|o| o)
    }

    /// Method form of [`Stream::concat`].
    #[must_use]
    pub fn chain(self, other: Stream<T>) -> Self {
        Self::concat(self, other)
    }

    /* ---------- options ---------- */

    /// Replace the evaluation options. Hazard warnings are issued for stages
    /// appended afterwards; the [`HazardPolicy::Fail`] check runs at first pull.
    #[must_use]
    pub fn with_options(mut self, options: StreamOptions) -> Self {
        self.pipeline.set_options(options);
        self
    }

    #[must_use]
    pub fn with_hazard_policy(self, policy: HazardPolicy) -> Self {
        let options = StreamOptions {
            hazard_policy: policy,
            ..self.pipeline.options().clone()
        };
        self.with_options(options)
    }

    #[must_use]
    pub fn with_metrics(self, metrics: MetricsCollector) -> Self {
        let options = StreamOptions {
            metrics: Some(metrics),
            ..self.pipeline.options().clone()
        };
        self.with_options(options)
    }

    /// True once a terminal operation has pulled from this stream.
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// The underlying pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub(crate) fn append<O: 'static>(mut self, kind: StageKind) -> Stream<O> {
        self.pipeline.push(Stage::new(kind));
        Stream {
            pipeline: self.pipeline,
            started: self.started,
            _t: PhantomData,
        }
    }

    /* ---------- stateless stages ---------- */

    /// Transform each element.
    pub fn map<O, F>(self, mut f: F) -> Stream<O>
    where
        O: 'static,
        F: FnMut(T) -> O + 'static,
    {
        self.append(StageKind::Map(Box::new(move |e: Element| -> Result<Element> {
            Ok(erase(f(unerase::<T>(e, "map")?)))
        })))
    }

    /// Keep elements for which `pred` holds.
    #[must_use]
    pub fn filter<P>(self, mut pred: P) -> Self
    where
        P: FnMut(&T) -> bool + 'static,
    {
        self.append(StageKind::Filter(Box::new(move |e: &Element| -> Result<bool> {
            Ok(pred(unerase_ref::<T>(e, "filter")?))
        })))
    }

    /// Call `f` on each element as it passes, without changing it.
    #[must_use]
    pub fn peek<F>(self, mut f: F) -> Self
    where
        F: FnMut(&T) + 'static,
    {
        self.append(StageKind::Peek(Box::new(move |e: &Element| -> Result<()> {
            f(unerase_ref::<T>(e, "peek")?);
            Ok(())
        })))
    }

    /// Expand each element into a list and emit its items in order.
    pub fn flat_map<O, F>(self, mut f: F) -> Stream<O>
    where
        O: 'static,
        F: FnMut(T) -> Vec<O> + 'static,
    {
        self.append(StageKind::flatten(Box::new(move |e: Element| -> Result<Pipeline> {
            let items = f(unerase::<T>(e, "flat_map")?);
            Ok(Stream::from_vec(items).pipeline)
        })))
    }

    /// Expand each element into a sub-stream, pulled lazily.
    ///
    /// ```
    /// use ironstream::Stream;
    /// let v = Stream::of([1, 2, 3])
    ///     .flat_map_stream(|n| Stream::iterate(n, |x| x * 10).limit(2))
    ///     .to_vec()
    ///     .unwrap();
    /// assert_eq!(v, vec![1, 10, 2, 20, 3, 30]);
    /// ```
    pub fn flat_map_stream<O, F>(self, mut f: F) -> Stream<O>
    where
        O: 'static,
        F: FnMut(T) -> Stream<O> + 'static,
    {
        self.append(StageKind::flatten(Box::new(move |e: Element| -> Result<Pipeline> {
            Ok(f(unerase::<T>(e, "flat_map_stream")?).pipeline)
        })))
    }

    /// Keep the `Some` results of `f`, dropping the `None`s.
    pub fn flat_map_option<O, F>(self, mut f: F) -> Stream<O>
    where
        O: 'static,
        F: FnMut(T) -> Option<O> + 'static,
    {
        self.append(StageKind::flatten(Box::new(move |e: Element| -> Result<Pipeline> {
            let item = f(unerase::<T>(e, "flat_map_option")?);
            Ok(Stream::from_iter(item).pipeline)
        })))
    }

    /// Emit at most `n` elements, then stop pulling upstream.
    #[must_use]
    pub fn limit(self, n: usize) -> Self {
        self.append(StageKind::limit(n))
    }

    /// Drop the first `n` elements.
    #[must_use]
    pub fn skip(self, n: usize) -> Self {
        self.append(StageKind::skip(n))
    }

    /* ---------- stateful stages ---------- */

    /// Drop elements equal under `eq` to an earlier kept element.
    ///
    /// Every candidate is compared against every kept element, so `eq` does
    /// not need to be transitive or consistent with hashing. First
    /// occurrences keep their order.
    #[must_use]
    pub fn distinct_by<F>(self, mut eq: F) -> Self
    where
        F: FnMut(&T, &T) -> bool + 'static,
    {
        self.append(StageKind::distinct(Box::new(move |a: &Element, b: &Element| -> Result<bool> {
            Ok(eq(unerase_ref::<T>(a, "distinct")?, unerase_ref::<T>(b, "distinct")?))
        })))
    }

    /// Stable sort by `cmp`.
    #[must_use]
    pub fn sorted_by<F>(self, mut cmp: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering + 'static,
    {
        self.append(StageKind::sorted(Box::new(move |a: &Element, b: &Element| -> Result<Ordering> {
            Ok(cmp(unerase_ref::<T>(a, "sorted")?, unerase_ref::<T>(b, "sorted")?))
        })))
    }

    /// Stable sort by a derived key.
    #[must_use]
    pub fn sorted_by_key<K, F>(self, mut key: F) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K + 'static,
    {
        self.sorted_by(move |a, b| key(a).cmp(&key(b)))
    }
}

impl<T: PartialEq + 'static> Stream<T> {
    /// [`Stream::distinct_by`] with `==`.
    ///
    /// ```
    /// use ironstream::Stream;
    /// let v = Stream::of([1, 2, 2, 3, 1]).distinct().to_vec().unwrap();
    /// assert_eq!(v, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn distinct(self) -> Self {
        self.distinct_by(|a, b| a == b)
    }
}

impl<T: Ord + 'static> Stream<T> {
    /// [`Stream::sorted_by`] with the natural order.
    #[must_use]
    pub fn sorted(self) -> Self {
        self.sorted_by(Ord::cmp)
    }
}

impl<T: 'static> Stream<Vec<T>> {
    /// Flatten a stream of lists.
    pub fn flatten(self) -> Stream<T> {
        self.flat_map(|v| v)
    }
}

/* ---------- ranges ---------- */

impl<N: RangeStep + 'static> Stream<N> {
    /// `start, start + 1, ...` stopping before `end`; counts down when `end < start`.
    ///
    /// ```
    /// use ironstream::Stream;
    /// assert_eq!(Stream::range(0, 5).to_vec().unwrap(), vec![0, 1, 2, 3, 4]);
    /// assert_eq!(Stream::range(5, 0).to_vec().unwrap(), vec![5, 4, 3, 2, 1]);
    /// ```
    pub fn range(start: N, end: N) -> Self {
        Self::range_by(start, end, N::one())
    }

    /// Like [`Stream::range`] with an explicit step. The step's sign is
    /// corrected to point from `start` to `end`; a zero step fails the first
    /// pull with [`StreamError::InvalidRange`](crate::StreamError::InvalidRange).
    pub fn range_by(start: N, end: N, step: N) -> Self {
        Self::from_source(RangeSource::new(start, end, step, false))
    }

    /// `start ..= end`.
    pub fn range_closed(start: N, end: N) -> Self {
        Self::range_closed_by(start, end, N::one())
    }

    /// `start ..= end` by `step`, never yielding a value past `end`.
    ///
    /// ```
    /// use ironstream::Stream;
    /// assert_eq!(Stream::range_closed_by(0, 5, 2).to_vec().unwrap(), vec![0, 2, 4]);
    /// ```
    pub fn range_closed_by(start: N, end: N, step: N) -> Self {
        Self::from_source(RangeSource::new(start, end, step, true))
    }
}
