//! Fixtures for checking how often caller closures run.
//!
//! Laziness and short-circuiting are observable only through side effects,
//! so these wrap predicates and suppliers with a shared [`CallCounter`].

use std::cell::Cell;
use std::rc::Rc;

/// A shared call counter. Clones observe the same count.
#[derive(Clone, Debug, Default)]
pub struct CallCounter {
    calls: Rc<Cell<usize>>,
}

impl CallCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) {
        self.calls.set(self.calls.get() + 1);
    }

    #[must_use]
    pub fn get(&self) -> usize {
        self.calls.get()
    }

    pub fn reset(&self) {
        self.calls.set(0);
    }
}

/// Wrap `pred` so each call is counted on `counter`.
pub fn counting_predicate<T, P>(counter: &CallCounter, pred: P) -> impl FnMut(&T) -> bool + 'static
where
    T: 'static,
    P: Fn(&T) -> bool + 'static,
{
    let counter = counter.clone();
    move |x: &T| {
        counter.hit();
        pred(x)
    }
}

/// Wrap `map` so each call is counted on `counter`.
pub fn counting_map<T, O, F>(counter: &CallCounter, map: F) -> impl FnMut(T) -> O + 'static
where
    T: 'static,
    O: 'static,
    F: Fn(T) -> O + 'static,
{
    let counter = counter.clone();
    move |x: T| {
        counter.hit();
        map(x)
    }
}

/// A supplier of `0, 1, 2, ...` that counts its calls.
pub fn counting_supplier(counter: &CallCounter) -> impl FnMut() -> u64 + 'static {
    let counter = counter.clone();
    move || {
        let n = counter.get() as u64;
        counter.hit();
        n
    }
}
