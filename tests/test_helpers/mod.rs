//! Shared environment guards and logging setup for integration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, Once, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
static TRACING: Once = Once::new();

/// Installs a test-writer `tracing` subscriber once per test binary.
///
/// The filter honours `RUST_LOG` and defaults to `keystone=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("keystone=debug"));
        if let Err(error) = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
        {
            tracing::debug!(%error, "tracing subscriber already installed");
        }
    });
}

/// Variables read by `EngineConfig::from_env`.
pub const GENERATION_VARIABLES: [&str; 5] = [
    "KEYSTONE_GENERATION_API_KEY",
    "KEYSTONE_GENERATION_API_URL",
    "KEYSTONE_GENERATION_MODEL",
    "KEYSTONE_GENERATION_TEMPERATURE",
    "KEYSTONE_GENERATION_TIMEOUT_MS",
];

/// Holds the process environment for one test and restores the generation
/// variables when dropped.
///
/// Every generation variable not named in the overrides is cleared so the
/// developer's shell cannot leak into assertions.
pub struct GenerationEnvGuard {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl GenerationEnvGuard {
    /// Applies `overrides` on top of an empty generation environment.
    pub fn with(overrides: &[(&str, &str)]) -> Self {
        let lock = env_lock();
        let saved = GENERATION_VARIABLES
            .iter()
            .map(|name| (*name, env::var_os(name)))
            .collect();

        for name in GENERATION_VARIABLES {
            let value = overrides
                .iter()
                .find_map(|(key, value)| (*key == name).then_some(*value));
            write_var(name, value.map(OsString::from));
        }

        Self { saved, _lock: lock }
    }
}

impl Drop for GenerationEnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.saved.drain(..) {
            write_var(name, value);
        }
    }
}

fn write_var(name: &str, value: Option<OsString>) {
    // SAFETY: callers hold ENV_MUTEX, which serializes environment writes
    // across the test binary.
    unsafe {
        match value {
            Some(text) => env::set_var(name, text),
            None => env::remove_var(name),
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
