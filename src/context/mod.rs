//! Library lifecycle and per-thread context.
//!
//! The framework keeps a small block of state for every thread that uses it: the last error
//! recorded on the thread, the thread's role, its allocation-pool stack, the timer scheduler
//! driving it and the services running on it. The lifecycle has two levels:
//!
//! 1. A process-wide [`TlsHandle`], created once by [`crate::startup`] (or
//!    [`create_global_handle`]) and destroyed by [`crate::cleanup`] (or
//!    [`destroy_global_handle`]).
//! 2. A [`ThreadContext`] per thread, created lazily on the first
//!    [`TlsHandle::with_context`] call and dropped at thread exit or by
//!    [`reset_thread_context`].
//!
//! `Variant` operations never touch the context.
//!
//! # Examples
//!
//! ```rust
//! use netvariant::context::{ServiceId, ThreadFlags};
//! use netvariant::{cleanup, format_last_error, startup, Error};
//!
//! let handle = startup();
//! handle.with_context(|ctx| {
//!     ctx.set_flags(ThreadFlags::ENTRY);
//!     ctx.register_service(ServiceId(1))
//! })??;
//!
//! let missing = handle.with_context(|ctx| ctx.unregister_service(ServiceId(2)))?;
//! if let Err(err) = missing {
//!     handle.with_context(|ctx| ctx.record_error(&err))?;
//! }
//! assert_eq!(
//!     format_last_error(),
//!     "Service 2 is not registered on this thread (sub-code 2)"
//! );
//!
//! cleanup();
//! # Ok::<(), Error>(())
//! ```

mod block;
mod handle;

pub use block::{
    LastError, PoolId, ServiceId, ThreadContext, ThreadFlags, TimerSchedulerId,
    MAX_SERVICES_PER_THREAD,
};
pub use handle::{
    create_global_handle, destroy_global_handle, global_handle, reset_thread_context, TlsHandle,
};

use tracing::{error, info};

use crate::error::ErrorCode;

/// Initializes the library and returns the process-wide handle.
///
/// Calling it again while the library is initialized returns the live handle. Failing to create
/// the handle leaves the library unusable, so the process is aborted after logging the cause.
pub fn startup() -> TlsHandle {
    if let Some(handle) = global_handle() {
        return handle;
    }

    match create_global_handle() {
        Ok(handle) => {
            info!(generation = handle.generation(), "library started");
            handle
        }
        Err(err) => {
            // a concurrent startup may have created it first
            if let Some(handle) = global_handle() {
                return handle;
            }
            error!(%err, "library startup failed, aborting");
            std::process::abort()
        }
    }
}

/// Shuts the library down, invalidating the handle returned by [`startup`].
///
/// Does nothing if the library is not initialized.
pub fn cleanup() {
    if let Some(handle) = global_handle() {
        if destroy_global_handle(handle).is_ok() {
            info!(generation = handle.generation(), "library cleaned up");
        }
    }
}

/// The calling thread's last error, formatted.
///
/// Returns the success text when nothing was recorded, when the thread has no context yet or
/// when the library is not initialized. Never creates a context.
#[must_use]
pub fn format_last_error() -> String {
    handle::peek(|ctx| ctx.last_error().to_string())
        .unwrap_or_else(|| ErrorCode::Success.description().to_owned())
}

/// Records `error` as the calling thread's last error through the live handle.
///
/// # Errors
///
/// Returns [`crate::Error::ContextUnavailable`] if the library is not initialized, or
/// [`crate::Error::ContextBusy`] when called from inside [`TlsHandle::with_context`].
pub fn set_last_error(error: &crate::Error) -> crate::Result<()> {
    global_handle()
        .ok_or(crate::Error::ContextUnavailable)?
        .with_context(|ctx| ctx.record_error(error))
}
