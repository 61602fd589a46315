//! Call-scoped thread pool configuration for parallel loops.
//!
//! Nothing here outlives a call: a dedicated pool is built only when a
//! worker count is requested and dropped when the operation returns.

use crate::error::Result;

/// Execute `op`, on a dedicated pool of `threads` workers when requested.
///
/// With `threads == None` the operation runs directly, so any rayon
/// iterators inside it use the global pool.
#[cfg(feature = "parallel")]
pub fn install<OP, R>(threads: Option<usize>, op: OP) -> Result<R>
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    match threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            Ok(pool.install(op))
        }
        None => Ok(op()),
    }
}

/// Execute `op` directly; the worker count is ignored without `parallel`.
#[cfg(not(feature = "parallel"))]
pub fn install<OP, R>(_threads: Option<usize>, op: OP) -> Result<R>
where
    OP: FnOnce() -> R,
{
    Ok(op())
}
