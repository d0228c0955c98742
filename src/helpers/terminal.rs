//! Terminal operations that pull elements one at a time.
//!
//! Every terminal takes `&mut self` and drains the pipeline until it is
//! exhausted or the operation's own short-circuit condition fires. Running a
//! second terminal on the same stream continues from where the first one
//! stopped; on an exhausted stream it sees no elements.
//!
//! # Overview
//! - [`Stream::pull`] - the next element, if any
//! - [`Stream::all_match`] / [`Stream::any_match`] / [`Stream::none_match`]
//! - [`Stream::count`]
//! - [`Stream::find_first`] / [`Stream::find_any`] / [`Stream::get_first`]
//! - [`Stream::for_each`]
//! - [`Stream::to_vec`]

use crate::error::StreamError;
use crate::type_token::unerase;
use crate::Stream;
use anyhow::Result;
use tracing::debug;

impl<T: 'static> Stream<T> {
    /// Run `body` as a named terminal, with metrics timing when enabled.
    pub(crate) fn terminal<R>(
        &mut self,
        op: &'static str,
        body: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        debug!(op, pipeline = %self.pipeline.describe(), "terminal operation");
        let metrics = self.pipeline.options().metrics.clone();
        if let Some(m) = &metrics {
            m.record_start();
        }
        let out = body(self);
        if let Some(m) = &metrics {
            m.record_end();
        }
        out
    }

    /// Pull the next element.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn pull(&mut self) -> Result<Option<T>> {
        self.started = true;
        match self.pipeline.next_result()? {
            Some(e) => Ok(Some(unerase::<T>(e, "stream output")?)),
            None => Ok(None),
        }
    }

    /// True if every element satisfies `pred`. Stops at the first failure;
    /// `true` for an empty stream without calling `pred`.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn all_match<P>(&mut self, mut pred: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        self.terminal("all_match", |s| {
            while let Some(x) = s.pull()? {
                if !pred(&x) {
                    return Ok(false);
                }
            }
            Ok(true)
        })
    }

    /// True if some element satisfies `pred`. Stops at the first match.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn any_match<P>(&mut self, mut pred: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        self.terminal("any_match", |s| {
            while let Some(x) = s.pull()? {
                if pred(&x) {
                    return Ok(true);
                }
            }
            Ok(false)
        })
    }

    /// True if no element satisfies `pred`. Stops at the first match.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn none_match<P>(&mut self, mut pred: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        self.terminal("none_match", |s| {
            while let Some(x) = s.pull()? {
                if pred(&x) {
                    return Ok(false);
                }
            }
            Ok(true)
        })
    }

    /// Number of remaining elements.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn count(&mut self) -> Result<usize> {
        self.terminal("count", |s| {
            let mut n = 0usize;
            while s.pull()?.is_some() {
                n += 1;
            }
            Ok(n)
        })
    }

    /// The first remaining element.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn find_first(&mut self) -> Result<Option<T>> {
        self.terminal("find_first", Self::pull)
    }

    /// Some remaining element. Evaluation is sequential, so this is always
    /// the same element [`Stream::find_first`] would return.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn find_any(&mut self) -> Result<Option<T>> {
        self.terminal("find_any", Self::pull)
    }

    /// The first remaining element, or [`StreamError::EmptyAccess`].
    ///
    /// # Errors
    /// Fails with `EmptyAccess` on an empty stream, and propagates failures
    /// from the source or any stage.
    pub fn get_first(&mut self) -> Result<T> {
        self.terminal("get_first", |s| {
            s.pull()?.ok_or_else(|| StreamError::EmptyAccess.into())
        })
    }

    /// Call `f` on every remaining element in pull order.
    ///
    /// Elements already handed to `f` stay delivered if a later pull fails.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn for_each<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        self.terminal("for_each", |s| {
            while let Some(x) = s.pull()? {
                f(x);
            }
            Ok(())
        })
    }

    /// Materialize the remaining elements.
    ///
    /// # Errors
    /// Propagates failures from the source or any stage.
    pub fn to_vec(&mut self) -> Result<Vec<T>> {
        self.terminal("to_vec", |s| {
            let mut out = Vec::new();
            while let Some(x) = s.pull()? {
                out.push(x);
            }
            Ok(out)
        })
    }
}
