//! Mutable reductions into a result container.
//!
//! A [`Collector`] supplies the container, folds each element into it, and
//! finishes it into the output. `combine` merges two partial containers; it
//! exists so collectors can be shared with multi-threaded reducers, and the
//! sequential engine never calls it.
//!
//! # Built-ins
//! - [`ToVec`] - all elements in pull order
//! - [`Counting`] - number of elements
//! - [`Summing`] - sum of numeric elements
//! - [`Joining`] - string elements joined by a separator
//! - [`GroupingBy`] - elements grouped by a derived key
//! - [`FnCollector`] - any collector built from closures
//!
//! # Example
//! ```
//! use ironstream::*;
//! use ironstream::collectors::Joining;
//!
//! # fn main() -> anyhow::Result<()> {
//! let s = Stream::of(["a", "b", "c"]).collect(Joining::new(", "))?;
//! assert_eq!(s, "a, b, c");
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::Add;

/// Accumulate elements of type `T` into `Acc` and finish into `Output`.
pub trait Collector<T> {
    type Acc;
    type Output;

    fn supplier(&self) -> Self::Acc;
    fn accumulate(&self, acc: &mut Self::Acc, value: T);
    fn combine(&self, acc: &mut Self::Acc, other: Self::Acc);
    fn finish(&self, acc: Self::Acc) -> Self::Output;
}

/* ===================== ToVec ===================== */

#[derive(Clone, Copy, Debug, Default)]
pub struct ToVec;

impl<T> Collector<T> for ToVec {
    type Acc = Vec<T>;
    type Output = Vec<T>;

    fn supplier(&self) -> Vec<T> {
        Vec::new()
    }

    fn accumulate(&self, acc: &mut Vec<T>, value: T) {
        acc.push(value);
    }

    fn combine(&self, acc: &mut Vec<T>, other: Vec<T>) {
        acc.extend(other);
    }

    fn finish(&self, acc: Vec<T>) -> Vec<T> {
        acc
    }
}

/* ===================== Counting ===================== */

#[derive(Clone, Copy, Debug, Default)]
pub struct Counting;

impl<T> Collector<T> for Counting {
    type Acc = u64;
    type Output = u64;

    fn supplier(&self) -> u64 {
        0
    }

    fn accumulate(&self, acc: &mut u64, _value: T) {
        *acc += 1;
    }

    fn combine(&self, acc: &mut u64, other: u64) {
        *acc += other;
    }

    fn finish(&self, acc: u64) -> u64 {
        acc
    }
}

/* ===================== Summing ===================== */

/// Sum of elements; `T::default()` for an empty stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct Summing<T>(PhantomData<T>);

impl<T> Summing<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Collector<T> for Summing<T>
where
    T: Add<Output = T> + Default,
{
    type Acc = T;
    type Output = T;

    fn supplier(&self) -> T {
        T::default()
    }

    fn accumulate(&self, acc: &mut T, value: T) {
        *acc = std::mem::take(acc) + value;
    }

    fn combine(&self, acc: &mut T, other: T) {
        *acc = std::mem::take(acc) + other;
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

/* ===================== Joining ===================== */

#[derive(Clone, Debug, Default)]
pub struct Joining {
    separator: String,
}

impl Joining {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl<S: AsRef<str>> Collector<S> for Joining {
    type Acc = Option<String>;
    type Output = String;

    fn supplier(&self) -> Option<String> {
        None
    }

    fn accumulate(&self, acc: &mut Option<String>, value: S) {
        match acc {
            Some(s) => {
                s.push_str(&self.separator);
                s.push_str(value.as_ref());
            }
            None => *acc = Some(value.as_ref().to_string()),
        }
    }

    fn combine(&self, acc: &mut Option<String>, other: Option<String>) {
        if let Some(o) = other {
            <Self as Collector<String>>::accumulate(self, acc, o);
        }
    }

    fn finish(&self, acc: Option<String>) -> String {
        acc.unwrap_or_default()
    }
}

/* ===================== GroupingBy ===================== */

/// Group elements into `HashMap<K, Vec<T>>`; each group keeps pull order.
pub struct GroupingBy<F> {
    key: F,
}

impl<F> GroupingBy<F> {
    pub fn new(key: F) -> Self {
        Self { key }
    }
}

impl<T, K, F> Collector<T> for GroupingBy<F>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    type Acc = HashMap<K, Vec<T>>;
    type Output = HashMap<K, Vec<T>>;

    fn supplier(&self) -> Self::Acc {
        HashMap::new()
    }

    fn accumulate(&self, acc: &mut Self::Acc, value: T) {
        acc.entry((self.key)(&value)).or_default().push(value);
    }

    fn combine(&self, acc: &mut Self::Acc, other: Self::Acc) {
        for (k, vs) in other {
            acc.entry(k).or_default().extend(vs);
        }
    }

    fn finish(&self, acc: Self::Acc) -> Self::Acc {
        acc
    }
}

/* ===================== FnCollector ===================== */

/// A collector assembled from four closures.
///
/// ```
/// use ironstream::*;
/// use ironstream::collectors::FnCollector;
///
/// let longest = FnCollector::new(
///     String::new,
///     |acc: &mut String, s: &str| if s.len() > acc.len() { *acc = s.to_string() },
///     |acc: &mut String, other: String| if other.len() > acc.len() { *acc = other },
///     |acc: String| acc,
/// );
/// let out = Stream::of(["a", "abc", "ab"]).collect(longest).unwrap();
/// assert_eq!(out, "abc");
/// ```
pub struct FnCollector<S, A, C, F> {
    supplier: S,
    accumulator: A,
    combiner: C,
    finisher: F,
}

impl<S, A, C, F> FnCollector<S, A, C, F> {
    pub fn new(supplier: S, accumulator: A, combiner: C, finisher: F) -> Self {
        Self {
            supplier,
            accumulator,
            combiner,
            finisher,
        }
    }
}

impl<T, Acc, R, S, A, C, F> Collector<T> for FnCollector<S, A, C, F>
where
    S: Fn() -> Acc,
    A: Fn(&mut Acc, T),
    C: Fn(&mut Acc, Acc),
    F: Fn(Acc) -> R,
{
    type Acc = Acc;
    type Output = R;

    fn supplier(&self) -> Acc {
        (self.supplier)()
    }

    fn accumulate(&self, acc: &mut Acc, value: T) {
        (self.accumulator)(acc, value);
    }

    fn combine(&self, acc: &mut Acc, other: Acc) {
        (self.combiner)(acc, other);
    }

    fn finish(&self, acc: Acc) -> R {
        (self.finisher)(acc)
    }
}
