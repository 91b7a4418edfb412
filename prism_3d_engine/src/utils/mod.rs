/// Small helpers shared across the engine

use std::sync::{Mutex, MutexGuard};
use crate::error::Result;

/// Lock a shared subsystem, mapping a poisoned lock to `Error::BackendError`
pub(crate) fn lock<'a, T: ?Sized>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| crate::engine_err!("prism3d::Engine", BackendError, "{} lock poisoned", what))
}

#[cfg(test)]
#[path = "utils_tests.rs"]
mod tests;
