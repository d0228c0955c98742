use crate::stage::StageKind;
use crate::type_token::{Element, erase, unerase, unerase_ref};
use crate::Stream;
use anyhow::Result;

// Fallible variants: an `Err` from the closure aborts whichever terminal
// operation triggered the pull.
impl<T: 'static> Stream<T> {
    /// Like [`Stream::map`], but `f` may fail.
    ///
    /// ```
    /// use ironstream::Stream;
    /// let mut s = Stream::of(["1", "2", "x"]).try_map(|s| s.parse::<i32>());
    /// assert!(s.to_vec().is_err());
    /// ```
    pub fn try_map<O, E, F>(self, mut f: F) -> Stream<O>
    where
        O: 'static,
        E: Into<anyhow::Error>,
        F: FnMut(T) -> Result<O, E> + 'static,
    {
        self.append(StageKind::Map(Box::new(move |e: Element| -> Result<Element> {
            let out = f(unerase::<T>(e, "try_map")?).map_err(Into::<anyhow::Error>::into)?;
            Ok(erase(out))
        })))
    }

    /// Like [`Stream::filter`], but `pred` may fail.
    #[must_use]
    pub fn try_filter<E, P>(self, mut pred: P) -> Self
    where
        E: Into<anyhow::Error>,
        P: FnMut(&T) -> Result<bool, E> + 'static,
    {
        self.append(StageKind::Filter(Box::new(move |e: &Element| -> Result<bool> {
            pred(unerase_ref::<T>(e, "try_filter")?).map_err(Into::into)
        })))
    }

    /// Like [`Stream::for_each`], but stops at the first failing call.
    ///
    /// # Errors
    /// Returns the first error from `f`, the source, or any stage.
    pub fn try_for_each<E, F>(&mut self, mut f: F) -> Result<()>
    where
        E: Into<anyhow::Error>,
        F: FnMut(T) -> Result<(), E>,
    {
        self.terminal("try_for_each", |s| {
            while let Some(x) = s.pull()? {
                f(x).map_err(Into::<anyhow::Error>::into)?;
            }
            Ok(())
        })
    }
}

// Fail-fast terminal for streams that carry per-element results.
impl<T: 'static, E: Into<anyhow::Error> + 'static> Stream<Result<T, E>> {
    /// Collect the `Ok` values, stopping at the first `Err`.
    ///
    /// # Errors
    /// Returns the first element error, or any pipeline failure.
    pub fn collect_fail_fast(&mut self) -> Result<Vec<T>> {
        self.terminal("collect_fail_fast", |s| {
            let mut ok = Vec::new();
            while let Some(r) = s.pull()? {
                ok.push(r.map_err(Into::<anyhow::Error>::into)?);
            }
            Ok(ok)
        })
    }
}
