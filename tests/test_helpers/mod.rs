//! Environment guard shared by configuration tests.

use std::env;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Applies environment overrides until dropped, then restores prior values.
///
/// Holding the guard also holds a process-wide lock, so tests that touch
/// `WORKFORCE_*` variables never observe each other's settings.
pub struct EnvVarGuard {
    restore: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets each `(key, Some(value))` and removes each `(key, None)`.
    pub fn apply(overrides: &[(&str, Option<&str>)]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let restore = overrides
            .iter()
            .map(|(key, value)| {
                let previous = env::var(key).ok();
                write_var(key, *value);
                ((*key).to_owned(), previous)
            })
            .collect();
        Self {
            restore,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.restore.drain(..) {
            write_var(&key, value.as_deref());
        }
    }
}

fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: every caller holds `ENV_MUTEX`, serializing environment writes.
    unsafe {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}
