//! The per-thread context block and the resources it tracks.

use std::{fmt, thread::ThreadId};

use bitflags::bitflags;
use tracing::debug;

use crate::{error::ErrorCode, Error, Result};

/// Number of service slots in every thread context.
pub const MAX_SERVICES_PER_THREAD: usize = 16;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    /// Role of the thread owning a context block
    pub struct ThreadFlags: u8 {
        /// The thread was started and is managed by the framework
        const FRAMEWORK = 0x01;
        /// The thread is the application entry thread
        const ENTRY = 0x02;
    }
}

/// Handle of an allocation pool pushed onto a thread's pool stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub u32);

/// Handle of a service that runs on a thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(pub u32);

/// Handle of the timer scheduler driving a thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerSchedulerId(pub u32);

/// The last error recorded on a thread.
///
/// Formats as its description, followed by ` (sub-code N)` when a sub-code is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LastError {
    code: ErrorCode,
    sub_code: u32,
    description: String,
}

impl LastError {
    /// The recorded error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Additional detail, such as an OS error number or the id a lookup failed on.
    #[must_use]
    pub fn sub_code(&self) -> u32 {
        self.sub_code
    }

    /// The formatted description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` if no error is recorded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success
    }
}

impl Default for LastError {
    fn default() -> Self {
        LastError {
            code: ErrorCode::Success,
            sub_code: 0,
            description: ErrorCode::Success.description().to_owned(),
        }
    }
}

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sub_code == 0 {
            f.write_str(&self.description)
        } else {
            write!(f, "{} (sub-code {})", self.description, self.sub_code)
        }
    }
}

/// State the framework keeps for one thread.
///
/// A block is created lazily on the first [`crate::context::TlsHandle::with_context`] call of a
/// thread and dropped at thread exit, by [`crate::context::reset_thread_context`], or when the
/// handle it was created under is destroyed.
#[derive(Debug)]
pub struct ThreadContext {
    generation: u64,
    last_error: LastError,
    flags: ThreadFlags,
    thread_id: ThreadId,
    timer_scheduler: Option<TimerSchedulerId>,
    pool_stack: Vec<PoolId>,
    services: [Option<ServiceId>; MAX_SERVICES_PER_THREAD],
}

impl ThreadContext {
    pub(crate) fn new(generation: u64) -> Self {
        ThreadContext {
            generation,
            last_error: LastError::default(),
            flags: ThreadFlags::empty(),
            thread_id: std::thread::current().id(),
            timer_scheduler: None,
            pool_stack: Vec::new(),
            services: [None; MAX_SERVICES_PER_THREAD],
        }
    }

    /// Generation of the handle this block was created under.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Id of the owning thread.
    #[must_use]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// The last error recorded on this thread.
    #[must_use]
    pub fn last_error(&self) -> &LastError {
        &self.last_error
    }

    /// Records `code` with its fixed description.
    pub fn set_last_error(&mut self, code: ErrorCode, sub_code: u32) {
        self.set_last_error_with(code, sub_code, code.description());
    }

    /// Records `code` with a custom description.
    pub fn set_last_error_with(
        &mut self,
        code: ErrorCode,
        sub_code: u32,
        description: impl Into<String>,
    ) {
        self.last_error = LastError {
            code,
            sub_code,
            description: description.into(),
        };
    }

    /// Records `error`, keeping its full message as the description.
    pub fn record_error(&mut self, error: &Error) {
        let sub_code = match error {
            Error::ServiceNotRegistered(id) => *id,
            _ => 0,
        };
        self.set_last_error_with(error.code(), sub_code, error.to_string());
    }

    /// Resets the last error to success.
    pub fn clear_last_error(&mut self) {
        self.last_error = LastError::default();
    }

    /// Role flags of the thread.
    #[must_use]
    pub fn flags(&self) -> ThreadFlags {
        self.flags
    }

    /// Replaces the role flags.
    pub fn set_flags(&mut self, flags: ThreadFlags) {
        self.flags = flags;
    }

    /// Returns `true` if the thread is managed by the framework.
    #[must_use]
    pub fn is_framework_thread(&self) -> bool {
        self.flags.contains(ThreadFlags::FRAMEWORK)
    }

    /// Returns `true` if the thread is the entry thread.
    #[must_use]
    pub fn is_entry_thread(&self) -> bool {
        self.flags.contains(ThreadFlags::ENTRY)
    }

    /// The timer scheduler attached to the thread.
    #[must_use]
    pub fn timer_scheduler(&self) -> Option<TimerSchedulerId> {
        self.timer_scheduler
    }

    /// Attaches (or with `None` detaches) a timer scheduler, returning the previous one.
    pub fn set_timer_scheduler(
        &mut self,
        scheduler: Option<TimerSchedulerId>,
    ) -> Option<TimerSchedulerId> {
        std::mem::replace(&mut self.timer_scheduler, scheduler)
    }

    /// Pushes a pool; it becomes the thread's current pool.
    pub fn push_pool(&mut self, pool: PoolId) {
        self.pool_stack.push(pool);
        debug!(pool = pool.0, depth = self.pool_stack.len(), "allocation pool pushed");
    }

    /// Pops the current pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolStackEmpty`] if no pool is pushed.
    pub fn pop_pool(&mut self) -> Result<PoolId> {
        let pool = self.pool_stack.pop().ok_or(Error::PoolStackEmpty)?;
        debug!(pool = pool.0, depth = self.pool_stack.len(), "allocation pool popped");
        Ok(pool)
    }

    /// The most recently pushed pool.
    #[must_use]
    pub fn current_pool(&self) -> Option<PoolId> {
        self.pool_stack.last().copied()
    }

    /// Number of pools on the stack.
    #[must_use]
    pub fn pool_depth(&self) -> usize {
        self.pool_stack.len()
    }

    /// Registers a service in the first free slot and returns the slot index.
    ///
    /// Registering an already registered service returns its existing slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceSlotsExhausted`] if all [`MAX_SERVICES_PER_THREAD`] slots are used.
    pub fn register_service(&mut self, service: ServiceId) -> Result<usize> {
        if let Some(slot) = self.service_slot(service) {
            return Ok(slot);
        }

        let slot = self
            .services
            .iter()
            .position(Option::is_none)
            .ok_or(Error::ServiceSlotsExhausted)?;
        self.services[slot] = Some(service);
        debug!(service = service.0, slot, "service registered");
        Ok(slot)
    }

    /// Frees the slot of a service and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceNotRegistered`] if the service holds no slot.
    pub fn unregister_service(&mut self, service: ServiceId) -> Result<usize> {
        let slot = self
            .service_slot(service)
            .ok_or(Error::ServiceNotRegistered(service.0))?;
        self.services[slot] = None;
        debug!(service = service.0, slot, "service unregistered");
        Ok(slot)
    }

    /// Slot index of a registered service.
    #[must_use]
    pub fn service_slot(&self, service: ServiceId) -> Option<usize> {
        self.services.iter().position(|slot| *slot == Some(service))
    }

    /// Registered services in slot order.
    pub fn services(&self) -> impl Iterator<Item = ServiceId> + '_ {
        self.services.iter().flatten().copied()
    }
}
