use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use atlas_scheduler::config::CONFIG_ENV_VAR;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests.
///
/// `Some(v)` sets the variable, `None` removes it.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

/// Runs `f` with the scheduler config variable pointing at `path`.
#[allow(dead_code)]
pub fn with_config_file<F, R>(path: &Path, f: F) -> R
where
    F: FnOnce() -> R,
{
    let path = path.to_string_lossy().into_owned();
    with_scoped_env(&[(CONFIG_ENV_VAR, Some(path.as_str()))], f)
}

struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let saved = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (key, value) in changes {
            set_or_remove(key, value.as_deref());
        }
        Self { saved }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..) {
            set_or_remove(&key, value.as_deref());
        }
    }
}

fn set_or_remove(key: &str, value: Option<&str>) {
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
}
