//! Assertions over stream output.
//!
//! The slice assertions work on already-collected values. The `assert_stream_*`
//! helpers drive a stream themselves and return `anyhow::Result<()>` so they
//! compose with `?` in tests that return results.

use crate::error::StreamError;
use crate::Stream;
use anyhow::{Result, bail};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Assert that two slices hold the same elements in the same order.
///
/// # Panics
///
/// Panics on the first differing index, or if the lengths differ.
///
/// ```
/// use ironstream::testing::assert_collections_equal;
/// assert_collections_equal(&[1, 2, 3], &[1, 2, 3]);
/// ```
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    if let Some(i) = actual.iter().zip(expected).position(|(a, e)| a != e) {
        panic!(
            "Element mismatch at index {i}:\n  Expected: {:?}\n  Actual: {:?}\n  Full expected: {expected:?}\n  Full actual: {actual:?}",
            expected[i], actual[i]
        );
    }
    assert_eq!(
        actual.len(),
        expected.len(),
        "Length mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
}

/// Assert that two slices hold the same elements with the same multiplicity,
/// in any order.
///
/// # Panics
///
/// Panics with the missing and unexpected elements if the multisets differ.
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    let mut balance: HashMap<&T, isize> = HashMap::new();
    for e in expected {
        *balance.entry(e).or_default() += 1;
    }
    for a in actual {
        *balance.entry(a).or_default() -= 1;
    }
    let missing: Vec<_> = balance.iter().filter(|(_, n)| **n > 0).map(|(v, _)| *v).collect();
    let extra: Vec<_> = balance.iter().filter(|(_, n)| **n < 0).map(|(v, _)| *v).collect();
    assert!(
        missing.is_empty() && extra.is_empty(),
        "Content mismatch:\n  Missing: {missing:?}\n  Unexpected: {extra:?}\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
}

/// Assert that every element satisfies `predicate`.
///
/// # Panics
///
/// Panics naming the first element that fails.
pub fn assert_all<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    if let Some((i, item)) = collection.iter().enumerate().find(|(_, x)| !predicate(*x)) {
        panic!("Predicate failed at index {i}: {item:?}\n  Collection: {collection:?}");
    }
}

/// Assert that at least one element satisfies `predicate`.
///
/// # Panics
///
/// Panics if none does.
pub fn assert_any<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    assert!(
        collection.iter().any(predicate),
        "No element satisfied the predicate:\n  Collection: {collection:?}"
    );
}

/// Assert that no element satisfies `predicate`.
///
/// # Panics
///
/// Panics naming the first element that matches.
pub fn assert_none<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    if let Some((i, item)) = collection.iter().enumerate().find(|(_, x)| predicate(*x)) {
        panic!("Predicate unexpectedly matched at index {i}: {item:?}\n  Collection: {collection:?}");
    }
}

/// Assert that a slice has `expected_size` elements.
///
/// # Panics
///
/// Panics if the length differs.
pub fn assert_collection_size<T>(collection: &[T], expected_size: usize) {
    assert_eq!(
        collection.len(),
        expected_size,
        "Size mismatch: expected {expected_size}, got {}",
        collection.len()
    );
}

/// Drain `stream` and compare with `expected` in order.
///
/// # Errors
/// Returns the stream's own failure, or a description of the mismatch.
pub fn assert_stream_yields<T>(stream: &mut Stream<T>, expected: &[T]) -> Result<()>
where
    T: Debug + PartialEq + 'static,
{
    let actual = stream.to_vec()?;
    if actual != expected {
        bail!("stream output mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}");
    }
    Ok(())
}

/// Drain `stream` and check that it failed with `expected`.
///
/// # Errors
/// Fails if the stream succeeded, or failed with a different error.
pub fn assert_stream_fails_with<T: Debug + 'static>(
    stream: &mut Stream<T>,
    expected: &StreamError,
) -> Result<()> {
    match stream.to_vec() {
        Ok(values) => bail!("expected {expected:?}, but the stream yielded {values:?}"),
        Err(e) => match e.downcast_ref::<StreamError>() {
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => bail!("expected {expected:?}, got {actual:?}"),
            None => bail!("expected {expected:?}, got a non-engine error: {e:#}"),
        },
    }
}
