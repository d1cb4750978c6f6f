mod settings;

use std::env;

use tempfile::TempDir;

/// Sets an environment variable for the lifetime of the guard, restoring the previous value on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        let original = env::var(key).ok();
        unsafe {
            env::set_var(key, value);
        }
        Self { key, original }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        let original = env::var(key).ok();
        unsafe {
            env::remove_var(key);
        }
        Self { key, original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Point VH_CONFIG_DIR at a fresh temp directory and clear the overrides the tests rely on
pub(crate) fn setup_config_dir() -> (TempDir, Vec<EnvGuard>) {
    let temp = TempDir::new().unwrap();
    let guards = vec![
        EnvGuard::set("VH_CONFIG_DIR", temp.path().to_str().unwrap()),
        EnvGuard::remove("PORT"),
        EnvGuard::remove("VH_HTTP_PORT"),
        EnvGuard::remove("VH_WORLDS_DIR"),
        EnvGuard::remove("VH_CONFIG_FILE"),
        EnvGuard::remove("VH_STARTUP_TIMEOUT_SECS"),
        EnvGuard::remove("VH_READINESS_INTERVAL_MS"),
        EnvGuard::remove("VH_LOG_LEVEL"),
    ];
    (temp, guards)
}
