use strum::{EnumCount, EnumIter, EnumMessage, FromRepr};
use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Arithmetic on [`crate::Variant`] never produces an `Error`: invalid kind combinations poison
/// the result to `Nil` instead. The variants below cover the per-thread context lifecycle and
/// the explicitly checked operations such as [`crate::Variant::checked_div`].
///
/// # Error Categories
///
/// ## Context Lifecycle Errors
/// - [`Error::ContextInit`] - The process-wide context handle could not be created
/// - [`Error::ContextUnavailable`] - The handle used to reach a thread context is not live
/// - [`Error::ContextBusy`] - The thread context was re-entered while already borrowed
///
/// ## Context Resource Errors
/// - [`Error::ServiceSlotsExhausted`] - No free per-thread service slot is left
/// - [`Error::ServiceNotRegistered`] - The service is not registered on this thread
/// - [`Error::PoolStackEmpty`] - A pool was popped from an empty pool stack
///
/// ## Arithmetic Errors
/// - [`Error::DivisionByZero`] - Integer division by zero in a checked operation
///
/// # Examples
///
/// ```rust
/// use netvariant::{Error, Variant};
///
/// match Variant::from(10_i32).checked_div(&Variant::from(0_i32)) {
///     Ok(quotient) => println!("{quotient}"),
///     Err(Error::DivisionByZero) => eprintln!("cannot divide by zero"),
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The process-wide context handle could not be created.
    ///
    /// Returned by [`crate::context::create_global_handle`] when a handle is already live.
    /// [`crate::startup`] treats this as fatal and aborts the process.
    #[error("Failed to create the library context handle - {0}")]
    ContextInit(String),

    /// The handle used to reach the thread context is not (or no longer) live.
    ///
    /// Occurs when a [`crate::context::TlsHandle`] is used after
    /// [`crate::context::destroy_global_handle`], or before any handle was created.
    #[error("The library context handle is not available")]
    ContextUnavailable,

    /// The calling thread's context is already borrowed.
    ///
    /// Raised when [`crate::context::TlsHandle::with_context`] is called from inside another
    /// `with_context` closure on the same thread, or while the thread is being torn down.
    #[error("The thread context is already in use on this thread")]
    ContextBusy,

    /// All per-thread service slots are in use.
    #[error("All per-thread service slots are in use")]
    ServiceSlotsExhausted,

    /// The service is not registered in the calling thread's context.
    ///
    /// The associated value is the service id that was looked up.
    #[error("Service {0} is not registered on this thread")]
    ServiceNotRegistered(u32),

    /// A pool was popped from an empty allocation-pool stack.
    #[error("The allocation pool stack is empty")]
    PoolStackEmpty,

    /// Integer division by zero in a checked arithmetic operation.
    #[error("Integer division by zero")]
    DivisionByZero,
}

impl Error {
    /// Returns the numeric [`ErrorCode`] used to record this error in a thread's last-error slot.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ContextInit(_) => ErrorCode::ContextInit,
            Error::ContextUnavailable => ErrorCode::ContextUnavailable,
            Error::ServiceSlotsExhausted => ErrorCode::ServiceSlotsExhausted,
            Error::ServiceNotRegistered(_) => ErrorCode::ServiceNotRegistered,
            Error::PoolStackEmpty => ErrorCode::PoolStackEmpty,
            Error::DivisionByZero => ErrorCode::DivisionByZero,
            Error::ContextBusy => ErrorCode::ContextBusy,
        }
    }
}

/// Stable numeric error codes.
///
/// Codes are what the per-thread last-error slot stores and what foreign callers pass back into
/// [`str_error`]. `Success` (0) means no error is recorded.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumCount, EnumIter, EnumMessage, FromRepr,
)]
#[repr(u32)]
pub enum ErrorCode {
    /// No error.
    #[default]
    #[strum(message = "success")]
    Success = 0,
    /// See [`Error::ContextInit`].
    #[strum(message = "library context handle creation failed")]
    ContextInit = 1,
    /// See [`Error::ContextUnavailable`].
    #[strum(message = "library context handle not available")]
    ContextUnavailable = 2,
    /// See [`Error::ServiceSlotsExhausted`].
    #[strum(message = "per-thread service slots exhausted")]
    ServiceSlotsExhausted = 3,
    /// See [`Error::ServiceNotRegistered`].
    #[strum(message = "service not registered on this thread")]
    ServiceNotRegistered = 4,
    /// See [`Error::PoolStackEmpty`].
    #[strum(message = "allocation pool stack is empty")]
    PoolStackEmpty = 5,
    /// See [`Error::DivisionByZero`].
    #[strum(message = "integer division by zero")]
    DivisionByZero = 6,
    /// See [`Error::ContextBusy`].
    #[strum(message = "thread context already in use")]
    ContextBusy = 7,
}

impl ErrorCode {
    /// The fixed human-readable description of this code.
    #[must_use]
    pub fn description(self) -> &'static str {
        self.get_message().unwrap_or(UNKNOWN_ERROR)
    }
}

const UNKNOWN_ERROR: &str = "unknown error";

/// Returns the fixed description of a numeric error code.
///
/// Unknown codes map to `"unknown error"` rather than failing.
///
/// # Examples
///
/// ```rust
/// use netvariant::{str_error, ErrorCode};
///
/// assert_eq!(str_error(ErrorCode::DivisionByZero as u32), "integer division by zero");
/// assert_eq!(str_error(9999), "unknown error");
/// ```
#[must_use]
pub fn str_error(code: u32) -> &'static str {
    ErrorCode::from_repr(code).map_or(UNKNOWN_ERROR, ErrorCode::description)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_every_code_has_a_description() {
        for code in ErrorCode::iter() {
            assert_ne!(code.description(), UNKNOWN_ERROR, "{code:?}");
            assert_eq!(str_error(code as u32), code.description());
        }
        assert_eq!(ErrorCode::iter().count(), ErrorCode::COUNT);
    }

    #[test]
    fn test_error_to_code() {
        assert_eq!(Error::DivisionByZero.code(), ErrorCode::DivisionByZero);
        assert_eq!(Error::ServiceNotRegistered(7).code(), ErrorCode::ServiceNotRegistered);
        assert_eq!(
            Error::ContextInit("busy".to_string()).code(),
            ErrorCode::ContextInit
        );
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(str_error(u32::MAX), "unknown error");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::ServiceNotRegistered(3).to_string(),
            "Service 3 is not registered on this thread"
        );
    }
}
