//! Leaf producers that sit at the head of every pipeline.
//!
//! A [`Source`] hands out one element per call and has no notion of length.
//! Once it reports `None` it keeps reporting `None`; the pipeline additionally
//! stops calling a source after its first `None`.
//!
//! # Variants
//! - [`ArraySource`] - a `Vec<T>` in stored order (finite)
//! - [`IterSource`] - any iterator (finite iff the iterator ends)
//! - [`SupplierSource`] - a zero-argument generator (infinite)
//! - [`IterateSource`] - `seed, step(seed), step(step(seed)), ...` (infinite)
//! - [`RangeSource`] - numeric ranges with a normalized step
//! - [`ConcatSource`] - two pipelines back to back, wrapped in `Option`

use crate::error::StreamError;
use crate::pipeline::Pipeline;
use crate::type_token::{Element, erase, unerase};
use anyhow::Result;
use std::any::type_name;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Add;

/// A leaf producer of elements, pulled one at a time.
pub trait Source<T> {
    /// Produce the next element, or `None` once exhausted.
    ///
    /// # Errors
    /// Sources that can be misconfigured (e.g. a zero-step range) or that wrap
    /// other pipelines report failures here.
    fn produce_next(&mut self) -> Result<Option<T>>;

    /// Whether this source never reports exhaustion.
    fn is_infinite(&self) -> bool {
        false
    }

    /// Short human-readable description used by `explain`.
    fn describe(&self) -> String;
}

/// Erased view of a [`Source`] owned by a [`Pipeline`].
pub(crate) trait DynSource {
    fn produce(&mut self) -> Result<Option<Element>>;
    fn is_infinite(&self) -> bool;
    fn describe(&self) -> String;
}

struct ErasedSource<S, T>(S, PhantomData<T>);

impl<S, T> DynSource for ErasedSource<S, T>
where
    S: Source<T>,
    T: 'static,
{
    fn produce(&mut self) -> Result<Option<Element>> {
        Ok(self.0.produce_next()?.map(erase))
    }

    fn is_infinite(&self) -> bool {
        self.0.is_infinite()
    }

    fn describe(&self) -> String {
        self.0.describe()
    }
}

pub(crate) fn boxed<S, T>(source: S) -> Box<dyn DynSource>
where
    S: Source<T> + 'static,
    T: 'static,
{
    Box::new(ErasedSource(source, PhantomData))
}

/* ===================== Array ===================== */

/// Yields the elements of a vector in order.
pub struct ArraySource<T> {
    items: std::vec::IntoIter<T>,
    len: usize,
}

impl<T> ArraySource<T> {
    pub fn new(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            items: items.into_iter(),
            len,
        }
    }
}

impl<T> Source<T> for ArraySource<T> {
    fn produce_next(&mut self) -> Result<Option<T>> {
        Ok(self.items.next())
    }

    fn describe(&self) -> String {
        format!("array of {} `{}`", self.len, type_name::<T>())
    }
}

/* ===================== Iterator ===================== */

/// Drives an arbitrary iterator.
///
/// The source counts as infinite when the iterator's `size_hint` is
/// `(usize::MAX, None)`, which is what `RangeFrom`, `Repeat` and `Cycle`
/// report. Other endless iterators look finite to hazard detection.
pub struct IterSource<I: Iterator> {
    iter: std::iter::Fuse<I>,
    infinite: bool,
}

impl<I: Iterator> IterSource<I> {
    pub fn new(iter: I) -> Self {
        let infinite = iter.size_hint() == (usize::MAX, None);
        Self { iter: iter.fuse(), infinite }
    }
}

impl<I: Iterator> Source<I::Item> for IterSource<I> {
    fn produce_next(&mut self) -> Result<Option<I::Item>> {
        Ok(self.iter.next())
    }

    fn describe(&self) -> String {
        format!("iterator of `{}`", type_name::<I::Item>())
    }

    fn is_infinite(&self) -> bool {
        self.infinite
    }
}

/* ===================== Supplier ===================== */

/// Calls a generator for every element. Never exhausts.
pub struct SupplierSource<F> {
    supplier: F,
}

impl<F> SupplierSource<F> {
    pub fn new(supplier: F) -> Self {
        Self { supplier }
    }
}

impl<T, F> Source<T> for SupplierSource<F>
where
    F: FnMut() -> T,
{
    fn produce_next(&mut self) -> Result<Option<T>> {
        Ok(Some((self.supplier)()))
    }

    fn is_infinite(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        format!("supplier of `{}`", type_name::<T>())
    }
}

/* ===================== Seeded iteration ===================== */

/// Yields `seed`, then `step(previous)` forever.
pub struct IterateSource<T, F> {
    current: T,
    started: bool,
    step: F,
}

impl<T, F> IterateSource<T, F> {
    pub fn new(seed: T, step: F) -> Self {
        Self {
            current: seed,
            started: false,
            step,
        }
    }
}

impl<T, F> Source<T> for IterateSource<T, F>
where
    T: Clone,
    F: FnMut(&T) -> T,
{
    fn produce_next(&mut self) -> Result<Option<T>> {
        if self.started {
            self.current = (self.step)(&self.current);
        } else {
            self.started = true;
        }
        Ok(Some(self.current.clone()))
    }

    fn is_infinite(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        format!("iterate over `{}`", type_name::<T>())
    }
}

/* ===================== Range ===================== */

/// Numeric types usable as range bounds and steps.
pub trait RangeStep: Copy + PartialOrd + Debug + Add<Output = Self> {
    fn zero() -> Self;
    fn one() -> Self;
    /// `self + step`, or `None` when the result is not representable.
    fn checked_step(self, step: Self) -> Option<Self>;
    /// `-self`, or `None` when the negation overflows (`MIN` of a signed int).
    fn checked_neg(self) -> Option<Self>;
    fn max_step() -> Self;
}

macro_rules! impl_range_step_int {
    ($($t:ty),*) => {$(
        impl RangeStep for $t {
            fn zero() -> Self { 0 }
            fn one() -> Self { 1 }
            fn checked_step(self, step: Self) -> Option<Self> { self.checked_add(step) }
            fn checked_neg(self) -> Option<Self> { <$t>::checked_neg(self) }
            fn max_step() -> Self { <$t>::MAX }
        }
    )*};
}

macro_rules! impl_range_step_float {
    ($($t:ty),*) => {$(
        impl RangeStep for $t {
            fn zero() -> Self { 0.0 }
            fn one() -> Self { 1.0 }
            fn checked_step(self, step: Self) -> Option<Self> { Some(self + step) }
            fn checked_neg(self) -> Option<Self> { Some(-self) }
            fn max_step() -> Self { <$t>::MAX }
        }
    )*};
}

impl_range_step_int!(i8, i16, i32, i64, isize);
impl_range_step_float!(f32, f64);

/// Yields `start, start + step, ...` up to `end`.
///
/// The step's sign is normalized to point from `start` towards `end`. The
/// half-open form stops before `end` (so `start == end` yields nothing); the
/// closed form includes `end` and never yields a value past it, even when the
/// step overshoots.
#[derive(Debug, Clone)]
pub struct RangeSource<N> {
    next: N,
    end: N,
    step: N,
    inclusive: bool,
    done: bool,
}

impl<N: RangeStep> RangeSource<N> {
    pub fn new(start: N, end: N, step: N, inclusive: bool) -> Self {
        let wrong_way = (start < end && step < N::zero()) || (start > end && step > N::zero());
        // `MIN` has no positive counterpart; the largest step is the nearest one.
        let step = if wrong_way {
            step.checked_neg().unwrap_or_else(N::max_step)
        } else {
            step
        };
        Self {
            next: start,
            end,
            step,
            inclusive,
            done: false,
        }
    }

    fn in_bounds(&self, v: N) -> bool {
        let ascending = self.step > N::zero();
        match (ascending, self.inclusive) {
            (true, false) => v < self.end,
            (true, true) => v <= self.end,
            (false, false) => v > self.end,
            (false, true) => v >= self.end,
        }
    }
}

impl<N: RangeStep + 'static> Source<N> for RangeSource<N> {
    fn produce_next(&mut self) -> Result<Option<N>> {
        if self.done {
            return Ok(None);
        }
        if self.step == N::zero() {
            self.done = true;
            return Err(StreamError::InvalidRange.into());
        }
        let v = self.next;
        if !self.in_bounds(v) {
            self.done = true;
            return Ok(None);
        }
        match v.checked_step(self.step) {
            Some(n) => self.next = n,
            None => self.done = true,
        }
        Ok(Some(v))
    }

    fn describe(&self) -> String {
        let close = if self.inclusive { "]" } else { ")" };
        format!(
            "range [{:?}, {:?}{close} step {:?}",
            self.next, self.end, self.step
        )
    }
}

/* ===================== Concatenation ===================== */

/// Draws from a first pipeline until it is exhausted, then from a second.
///
/// Every real element is yielded wrapped in `Some`; once both sides are done
/// the source itself reports `None`. The façade strips the wrapper with a
/// flatten-optional stage.
pub struct ConcatSource<T> {
    first: Option<Pipeline>,
    second: Option<Pipeline>,
    infinite: bool,
    description: String,
    _t: PhantomData<T>,
}

impl<T> ConcatSource<T> {
    pub(crate) fn new(first: Pipeline, second: Pipeline) -> Self {
        let infinite = first.is_unbounded() || second.is_unbounded();
        let description = format!("concat({}, {})", first.describe(), second.describe());
        Self {
            first: Some(first),
            second: Some(second),
            infinite,
            description,
            _t: PhantomData,
        }
    }
}

impl<T: 'static> Source<Option<T>> for ConcatSource<T> {
    fn produce_next(&mut self) -> Result<Option<Option<T>>> {
        for side in [&mut self.first, &mut self.second] {
            if let Some(p) = side {
                match p.next_result()? {
                    Some(e) => return Ok(Some(Some(unerase::<T>(e, "concat")?))),
                    None => *side = None,
                }
            }
        }
        Ok(None)
    }

    fn is_infinite(&self) -> bool {
        self.infinite
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}
