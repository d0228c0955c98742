pub(crate) mod collect;
pub(crate) mod iter;
pub(crate) mod reduce;
pub(crate) mod terminal;
pub(crate) mod try_process;

pub use iter::StreamIter;
