//! The per-link processing contract and the built-in stage kinds.
//!
//! Each [`Stage`] owns a FIFO queue of accepted-but-unprocessed inputs and a
//! closed set of kinds describing its transition rule. The pipeline drives every
//! kind through the same four calls:
//!
//! - [`Stage::accept`] enqueues one input and does no work;
//! - [`Stage::pull_next`] tries to produce one output from queued input;
//! - [`Stage::close`] tells the stage its upstream has nothing more;
//! - [`Stage::is_exhausted`] reports that no further output will ever come.
//!
//! An empty `pull_next` means "nothing from what is queued right now", never
//! "exhausted"; only `is_exhausted` carries that meaning.
//!
//! Stateless kinds (map, filter, peek, flatten, skip) and the short-circuiting
//! limit work one input at a time. Stateful kinds (distinct, sorted) wait until
//! they are closed, drain the whole queue into an output buffer, and then emit
//! from the buffer one element per pull.

use crate::pipeline::Pipeline;
use crate::type_token::Element;
use anyhow::Result;
use std::cmp::Ordering;
use std::collections::VecDeque;
use tracing::trace;

pub(crate) type MapFn = Box<dyn FnMut(Element) -> Result<Element>>;
pub(crate) type TestFn = Box<dyn FnMut(&Element) -> Result<bool>>;
pub(crate) type ObserveFn = Box<dyn FnMut(&Element) -> Result<()>>;
pub(crate) type ExpandFn = Box<dyn FnMut(Element) -> Result<Pipeline>>;
pub(crate) type EqFn = Box<dyn FnMut(&Element, &Element) -> Result<bool>>;
pub(crate) type CmpFn = Box<dyn FnMut(&Element, &Element) -> Result<Ordering>>;

/// Built-in stage kinds, one variant per transition rule.
pub(crate) enum StageKind {
    Map(MapFn),
    Filter(TestFn),
    Peek(ObserveFn),
    /// Expands each input into a sub-pipeline and emits its elements.
    Flatten {
        expand: ExpandFn,
        pending: Option<Pipeline>,
    },
    Distinct {
        eq: EqFn,
        drained: bool,
        buffer: VecDeque<Element>,
    },
    Sorted {
        cmp: CmpFn,
        drained: bool,
        buffer: VecDeque<Element>,
    },
    Limit {
        max: usize,
        emitted: usize,
    },
    Skip {
        n: usize,
        dropped: usize,
    },
}

impl StageKind {
    pub(crate) fn flatten(expand: ExpandFn) -> Self {
        Self::Flatten {
            expand,
            pending: None,
        }
    }

    pub(crate) fn distinct(eq: EqFn) -> Self {
        Self::Distinct {
            eq,
            drained: false,
            buffer: VecDeque::new(),
        }
    }

    pub(crate) fn sorted(cmp: CmpFn) -> Self {
        Self::Sorted {
            cmp,
            drained: false,
            buffer: VecDeque::new(),
        }
    }

    pub(crate) const fn limit(max: usize) -> Self {
        Self::Limit { max, emitted: 0 }
    }

    pub(crate) const fn skip(n: usize) -> Self {
        Self::Skip { n, dropped: 0 }
    }
}

/// Processing class of a stage, as reported by `explain`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum StageClass {
    /// At most one input is inspected per output.
    Stateless,
    /// The whole upstream is buffered before the first output.
    Stateful,
    /// Stops pulling upstream once its bound is reached.
    ShortCircuit,
}

/// One link of a pipeline.
pub struct Stage {
    queue: VecDeque<Element>,
    closed: bool,
    kind: StageKind,
}

impl Stage {
    pub(crate) fn new(kind: StageKind) -> Self {
        Self {
            queue: VecDeque::new(),
            closed: false,
            kind,
        }
    }

    /// Short name of the stage kind.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            StageKind::Map(_) => "map",
            StageKind::Filter(_) => "filter",
            StageKind::Peek(_) => "peek",
            StageKind::Flatten { .. } => "flatten",
            StageKind::Distinct { .. } => "distinct",
            StageKind::Sorted { .. } => "sorted",
            StageKind::Limit { .. } => "limit",
            StageKind::Skip { .. } => "skip",
        }
    }

    pub fn class(&self) -> StageClass {
        match &self.kind {
            StageKind::Distinct { .. } | StageKind::Sorted { .. } => StageClass::Stateful,
            StageKind::Limit { .. } => StageClass::ShortCircuit,
            _ => StageClass::Stateless,
        }
    }

    /// Whether this stage works one input at a time. Limit counts as stateless.
    pub fn is_stateless(&self) -> bool {
        self.class() != StageClass::Stateful
    }

    pub fn is_short_circuit(&self) -> bool {
        self.class() == StageClass::ShortCircuit
    }

    /// Human-readable detail for `explain`.
    pub(crate) fn detail(&self) -> String {
        match &self.kind {
            StageKind::Map(_) => "transform each element".to_string(),
            StageKind::Filter(_) => "keep elements matching a predicate".to_string(),
            StageKind::Peek(_) => "observe each element".to_string(),
            StageKind::Flatten { .. } => "expand each element into a sub-sequence".to_string(),
            StageKind::Distinct { .. } => "drop later duplicates (pairwise equality)".to_string(),
            StageKind::Sorted { .. } => "stable sort of the whole input".to_string(),
            StageKind::Limit { max, .. } => format!("emit at most {max} elements"),
            StageKind::Skip { n, .. } => format!("drop the first {n} elements"),
        }
    }

    /// True if an output can be produced without new input.
    pub fn has_next(&self) -> bool {
        match &self.kind {
            StageKind::Distinct { drained, buffer, .. }
            | StageKind::Sorted { drained, buffer, .. } => *drained && !buffer.is_empty(),
            StageKind::Flatten { pending, .. } => pending.is_some() || !self.queue.is_empty(),
            StageKind::Limit { max, emitted } => emitted < max && !self.queue.is_empty(),
            _ => !self.queue.is_empty(),
        }
    }

    /// Enqueue one input. Never processes.
    pub fn accept(&mut self, input: Element) {
        self.queue.push_back(input);
    }

    /// Mark the upstream as exhausted.
    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// True once this stage will never produce another output.
    pub fn is_exhausted(&self) -> bool {
        match &self.kind {
            StageKind::Limit { max, emitted } if emitted >= max => true,
            StageKind::Distinct { drained, buffer, .. }
            | StageKind::Sorted { drained, buffer, .. } => {
                self.closed && *drained && buffer.is_empty()
            }
            StageKind::Flatten { pending, .. } => {
                self.closed && pending.is_none() && self.queue.is_empty()
            }
            _ => self.closed && self.queue.is_empty(),
        }
    }

    /// Try to produce the next output from queued input.
    ///
    /// # Errors
    /// Propagates failures from the stage's caller-supplied function.
    pub fn pull_next(&mut self) -> Result<Option<Element>> {
        let queue = &mut self.queue;
        match &mut self.kind {
            StageKind::Map(f) => queue.pop_front().map(|e| f(e)).transpose(),
            StageKind::Filter(test) => {
                while let Some(e) = queue.pop_front() {
                    if test(&e)? {
                        return Ok(Some(e));
                    }
                }
                Ok(None)
            }
            StageKind::Peek(observe) => match queue.pop_front() {
                Some(e) => {
                    observe(&e)?;
                    Ok(Some(e))
                }
                None => Ok(None),
            },
            StageKind::Flatten { expand, pending } => loop {
                if let Some(sub) = pending {
                    if let Some(e) = sub.next_result()? {
                        return Ok(Some(e));
                    }
                    *pending = None;
                }
                let Some(input) = queue.pop_front() else {
                    return Ok(None);
                };
                *pending = Some(expand(input)?);
            },
            StageKind::Distinct {
                eq,
                drained,
                buffer,
            } => {
                if !*drained {
                    if !self.closed {
                        return Ok(None);
                    }
                    let total = queue.len();
                    for candidate in queue.drain(..) {
                        let mut seen = false;
                        for kept in buffer.iter() {
                            if eq(kept, &candidate)? {
                                seen = true;
                                break;
                            }
                        }
                        if !seen {
                            buffer.push_back(candidate);
                        }
                    }
                    *drained = true;
                    trace!(total, kept = buffer.len(), "distinct drained its input");
                }
                Ok(buffer.pop_front())
            }
            StageKind::Sorted {
                cmp,
                drained,
                buffer,
            } => {
                if !*drained {
                    if !self.closed {
                        return Ok(None);
                    }
                    let mut items: Vec<Element> = queue.drain(..).collect();
                    let mut failure = None;
                    items.sort_by(|a, b| match cmp(a, b) {
                        Ok(o) => o,
                        Err(e) => {
                            failure.get_or_insert(e);
                            Ordering::Equal
                        }
                    });
                    if let Some(e) = failure {
                        return Err(e);
                    }
                    trace!(total = items.len(), "sorted drained its input");
                    buffer.extend(items);
                    *drained = true;
                }
                Ok(buffer.pop_front())
            }
            StageKind::Limit { max, emitted } => {
                if *emitted >= *max {
                    return Ok(None);
                }
                let out = queue.pop_front();
                if out.is_some() {
                    *emitted += 1;
                    if *emitted == *max {
                        trace!(max = *max, "limit reached");
                    }
                }
                Ok(out)
            }
            StageKind::Skip { n, dropped } => {
                while let Some(e) = queue.pop_front() {
                    if *dropped < *n {
                        *dropped += 1;
                        continue;
                    }
                    return Ok(Some(e));
                }
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_token::{erase, unerase};
    use std::cell::Cell;
    use std::rc::Rc;

    fn ints(stage: &mut Stage) -> Vec<i32> {
        let mut out = Vec::new();
        while let Some(e) = stage.pull_next().unwrap() {
            out.push(unerase::<i32>(e, "test").unwrap());
        }
        out
    }

    #[test]
    fn accept_does_not_process() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let mut stage = Stage::new(StageKind::Map(Box::new(move |e: Element| -> Result<Element> {
            seen.set(seen.get() + 1);
            Ok(e)
        })));
        stage.accept(erase(1i32));
        stage.accept(erase(2i32));
        assert_eq!(calls.get(), 0);
        assert!(stage.has_next());
        assert_eq!(ints(&mut stage), vec![1, 2]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn stateful_waits_for_close() {
        let mut stage = Stage::new(StageKind::sorted(Box::new(
            |a: &Element, b: &Element| -> Result<Ordering> {
                Ok(a.downcast_ref::<i32>().cmp(&b.downcast_ref::<i32>()))
            },
        )));
        stage.accept(erase(3i32));
        stage.accept(erase(1i32));
        assert!(stage.pull_next().unwrap().is_none());
        assert!(!stage.is_exhausted());
        stage.close();
        assert_eq!(ints(&mut stage), vec![1, 3]);
        assert!(stage.is_exhausted());
    }

    #[test]
    fn limit_exhausts_regardless_of_input() {
        let mut stage = Stage::new(StageKind::limit(1));
        stage.accept(erase(7i32));
        stage.accept(erase(8i32));
        assert_eq!(ints(&mut stage), vec![7]);
        assert!(stage.is_exhausted());
        assert!(!stage.has_next());
    }

    #[test]
    fn classification() {
        assert!(Stage::new(StageKind::skip(2)).is_stateless());
        assert!(Stage::new(StageKind::limit(2)).is_short_circuit());
        let always_equal = |_: &Element, _: &Element| -> Result<bool> { Ok(true) };
        assert!(!Stage::new(StageKind::distinct(Box::new(always_equal))).is_stateless());
    }
}
