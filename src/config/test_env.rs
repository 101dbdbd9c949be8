//! Process environment helpers for tests that set `NOTIFY_*` or `PLIVO_*`
//! variables.

use std::sync::{Mutex, MutexGuard};

/// Serializes every test that reads or writes process environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Takes the environment lock, recovering it if a previous test panicked
pub(crate) fn lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sets environment variables for one test and restores them on drop
pub(crate) struct EnvGuard {
    vars_to_restore: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub(crate) fn new() -> Self {
        Self {
            vars_to_restore: Vec::new(),
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &str) {
        self.vars_to_restore
            .push((key.to_string(), std::env::var(key).ok()));
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.vars_to_restore
            .push((key.to_string(), std::env::var(key).ok()));
        unsafe {
            std::env::remove_var(key);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, original_value) in self.vars_to_restore.iter().rev() {
            unsafe {
                match original_value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
