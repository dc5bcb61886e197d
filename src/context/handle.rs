//! The process-wide handle and the thread-local slot it guards.

use std::{
    cell::RefCell,
    num::NonZeroU64,
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use crate::{context::block::ThreadContext, Error, Result};

/// Generation of the live handle; `0` when no handle is live.
static ACTIVE: AtomicU64 = AtomicU64::new(0);

/// Last generation handed out.
static GENERATION: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static CONTEXT: RefCell<Option<Box<ThreadContext>>> = const { RefCell::new(None) };
}

/// Process-wide handle through which each thread reaches its [`ThreadContext`].
///
/// Handles are `Copy`. Every handle created by [`create_global_handle`] carries a new
/// generation; once it is destroyed, copies of it stop working and blocks created under it are
/// discarded on their thread's next access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TlsHandle(NonZeroU64);

impl TlsHandle {
    /// The generation of this handle.
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0.get()
    }

    /// Returns `true` until the handle is destroyed.
    #[must_use]
    pub fn is_live(self) -> bool {
        ACTIVE.load(Ordering::Acquire) == self.generation()
    }

    /// Runs `f` on the calling thread's context block, creating the block on first use.
    ///
    /// # Errors
    ///
    /// - [`Error::ContextUnavailable`] if the handle has been destroyed
    /// - [`Error::ContextBusy`] if called from inside another `with_context` on the same thread,
    ///   or while the thread's locals are being torn down
    ///
    /// # Examples
    ///
    /// ```rust
    /// use netvariant::context::{create_global_handle, destroy_global_handle, PoolId};
    ///
    /// let handle = create_global_handle()?;
    /// handle.with_context(|ctx| ctx.push_pool(PoolId(1)))?;
    /// assert_eq!(handle.with_context(|ctx| ctx.current_pool())?, Some(PoolId(1)));
    /// destroy_global_handle(handle)?;
    /// # Ok::<(), netvariant::Error>(())
    /// ```
    pub fn with_context<R>(self, f: impl FnOnce(&mut ThreadContext) -> R) -> Result<R> {
        if !self.is_live() {
            return Err(Error::ContextUnavailable);
        }

        let generation = self.generation();
        CONTEXT
            .try_with(|cell| {
                let mut slot = cell.try_borrow_mut().map_err(|_| Error::ContextBusy)?;
                if slot.as_ref().is_some_and(|ctx| ctx.generation() != generation) {
                    debug!(generation, "discarding thread context of a destroyed handle");
                    *slot = None;
                }
                let ctx = slot.get_or_insert_with(|| {
                    debug!(generation, "thread context created");
                    Box::new(ThreadContext::new(generation))
                });
                Ok(f(ctx.as_mut()))
            })
            .unwrap_or(Err(Error::ContextBusy))
    }
}

/// The currently live handle, if any.
#[must_use]
pub fn global_handle() -> Option<TlsHandle> {
    NonZeroU64::new(ACTIVE.load(Ordering::Acquire)).map(TlsHandle)
}

/// Creates the process-wide handle.
///
/// # Errors
///
/// Returns [`Error::ContextInit`] if a handle is already live or the generation counter is
/// exhausted.
pub fn create_global_handle() -> Result<TlsHandle> {
    let previous = GENERATION
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |g| g.checked_add(1))
        .map_err(|_| Error::ContextInit("handle generations exhausted".to_string()))?;
    let generation = NonZeroU64::new(previous + 1)
        .ok_or_else(|| Error::ContextInit("handle generations exhausted".to_string()))?;

    ACTIVE
        .compare_exchange(0, generation.get(), Ordering::AcqRel, Ordering::Acquire)
        .map_err(|live| Error::ContextInit(format!("handle {live} is still live")))?;

    debug!(generation = generation.get(), "context handle created");
    Ok(TlsHandle(generation))
}

/// Invalidates `handle` and drops the calling thread's block created under it.
///
/// Blocks on other threads are discarded lazily, on their next access through a newer handle,
/// or at thread exit.
///
/// # Errors
///
/// Returns [`Error::ContextUnavailable`] if `handle` is not the live handle.
pub fn destroy_global_handle(handle: TlsHandle) -> Result<()> {
    let generation = handle.generation();
    ACTIVE
        .compare_exchange(generation, 0, Ordering::AcqRel, Ordering::Acquire)
        .map_err(|_| Error::ContextUnavailable)?;

    // Ignored when the block is borrowed or the thread is exiting: it is then dropped lazily.
    let _ = CONTEXT.try_with(|cell| {
        if let Ok(mut slot) = cell.try_borrow_mut() {
            if slot.as_ref().is_some_and(|ctx| ctx.generation() == generation) {
                *slot = None;
            }
        }
    });

    debug!(generation, "context handle destroyed");
    Ok(())
}

/// Drops the calling thread's context block.
///
/// The next [`TlsHandle::with_context`] on this thread starts from a fresh block.
///
/// # Errors
///
/// - [`Error::ContextUnavailable`] if the handle has been destroyed
/// - [`Error::ContextBusy`] if the block is currently borrowed
pub fn reset_thread_context(handle: TlsHandle) -> Result<()> {
    if !handle.is_live() {
        return Err(Error::ContextUnavailable);
    }

    CONTEXT
        .try_with(|cell| {
            let mut slot = cell.try_borrow_mut().map_err(|_| Error::ContextBusy)?;
            if slot.take().is_some() {
                debug!(generation = handle.generation(), "thread context reset");
            }
            Ok(())
        })
        .unwrap_or(Err(Error::ContextBusy))
}

/// Reads the calling thread's block without creating one.
///
/// Returns `None` if no handle is live, the thread has no block under the live handle, or the
/// block is currently borrowed.
pub(crate) fn peek<R>(f: impl FnOnce(&ThreadContext) -> R) -> Option<R> {
    let generation = global_handle()?.generation();
    CONTEXT
        .try_with(|cell| {
            let slot = cell.try_borrow().ok()?;
            slot.as_deref()
                .filter(|ctx| ctx.generation() == generation)
                .map(f)
        })
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use crate::{context::block::PoolId, test::global_lock};

    use super::*;

    fn fresh_handle() -> TlsHandle {
        if let Some(live) = global_handle() {
            let _ = destroy_global_handle(live);
        }
        create_global_handle().unwrap()
    }

    #[test]
    fn test_single_live_handle() {
        let _guard = global_lock();
        let handle = fresh_handle();

        assert!(matches!(
            create_global_handle(),
            Err(Error::ContextInit(_))
        ));
        assert_eq!(global_handle(), Some(handle));

        destroy_global_handle(handle).unwrap();
        assert_eq!(global_handle(), None);
        assert_eq!(
            destroy_global_handle(handle),
            Err(Error::ContextUnavailable)
        );
    }

    #[test]
    fn test_generations_increase() {
        let _guard = global_lock();
        let first = fresh_handle();
        destroy_global_handle(first).unwrap();
        let second = create_global_handle().unwrap();
        assert!(second.generation() > first.generation());
        destroy_global_handle(second).unwrap();
    }

    #[test]
    fn test_block_is_created_lazily_and_persists() {
        let _guard = global_lock();
        let handle = fresh_handle();

        assert!(peek(|_| ()).is_none());
        handle.with_context(|ctx| ctx.push_pool(PoolId(7))).unwrap();
        assert_eq!(peek(ThreadContext::current_pool), Some(Some(PoolId(7))));
        assert_eq!(
            handle.with_context(|ctx| ctx.generation()).unwrap(),
            handle.generation()
        );

        destroy_global_handle(handle).unwrap();
    }

    #[test]
    fn test_destroyed_handle_is_unavailable() {
        let _guard = global_lock();
        let handle = fresh_handle();
        destroy_global_handle(handle).unwrap();

        assert!(!handle.is_live());
        assert_eq!(
            handle.with_context(|_| ()),
            Err(Error::ContextUnavailable)
        );
        assert_eq!(
            reset_thread_context(handle),
            Err(Error::ContextUnavailable)
        );
    }

    #[test]
    fn test_reset_thread_context() {
        let _guard = global_lock();
        let handle = fresh_handle();

        handle.with_context(|ctx| ctx.push_pool(PoolId(1))).unwrap();
        reset_thread_context(handle).unwrap();
        assert!(peek(|_| ()).is_none());
        assert_eq!(handle.with_context(|ctx| ctx.pool_depth()).unwrap(), 0);

        destroy_global_handle(handle).unwrap();
    }

    #[test]
    fn test_reentrant_access_is_busy() {
        let _guard = global_lock();
        let handle = fresh_handle();

        let inner = handle
            .with_context(|_| handle.with_context(|_| ()))
            .unwrap();
        assert_eq!(inner, Err(Error::ContextBusy));

        let reset = handle.with_context(|_| reset_thread_context(handle)).unwrap();
        assert_eq!(reset, Err(Error::ContextBusy));

        destroy_global_handle(handle).unwrap();
    }

    #[test]
    fn test_stale_block_is_replaced() {
        let _guard = global_lock();
        let first = fresh_handle();
        first.with_context(|ctx| ctx.push_pool(PoolId(1))).unwrap();

        // destroying from inside the closure keeps the block alive on this thread
        first
            .with_context(|_| destroy_global_handle(first))
            .unwrap()
            .unwrap();

        let second = create_global_handle().unwrap();
        let (generation, depth) = second
            .with_context(|ctx| (ctx.generation(), ctx.pool_depth()))
            .unwrap();
        assert_eq!(generation, second.generation());
        assert_eq!(depth, 0);

        destroy_global_handle(second).unwrap();
    }

    #[test]
    fn test_blocks_are_per_thread() {
        let _guard = global_lock();
        let handle = fresh_handle();
        handle.with_context(|ctx| ctx.push_pool(PoolId(1))).unwrap();

        let (other_depth, other_thread) = std::thread::spawn(move || {
            handle
                .with_context(|ctx| (ctx.pool_depth(), ctx.thread_id()))
                .unwrap()
        })
        .join()
        .unwrap();

        assert_eq!(other_depth, 0);
        assert_ne!(other_thread, std::thread::current().id());
        assert_eq!(handle.with_context(|ctx| ctx.pool_depth()).unwrap(), 1);

        destroy_global_handle(handle).unwrap();
    }
}
