//! `std` iterator interop.

use crate::Stream;
use anyhow::Result;

/// Owning iterator over a stream's remaining elements.
///
/// Yields `Err` once if a pull fails, then ends.
///
/// ```
/// use ironstream::Stream;
/// let total: i32 = Stream::range(0, 4)
///     .into_iter()
///     .map(|r| r.unwrap())
///     .sum();
/// assert_eq!(total, 6);
/// ```
pub struct StreamIter<T> {
    stream: Stream<T>,
    failed: bool,
}

impl<T: 'static> Iterator for StreamIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.stream.pull() {
            Ok(Some(x)) => Some(Ok(x)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<T: 'static> IntoIterator for Stream<T> {
    type Item = Result<T>;
    type IntoIter = StreamIter<T>;

    fn into_iter(self) -> StreamIter<T> {
        StreamIter {
            stream: self,
            failed: false,
        }
    }
}
