//! Helpers shared by the unit tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::Variant;

/// Builds a dictionary with integer keys and string values.
pub fn dict_of(entries: &[(i32, &str)]) -> Variant {
    entries.iter().map(|&(key, value)| (key, value)).collect()
}

static GLOBAL_HANDLE_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that create or destroy the process-wide context handle.
pub fn global_lock() -> MutexGuard<'static, ()> {
    GLOBAL_HANDLE_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}
