//! Process-wide writer instance and its teardown

use std::sync::OnceLock;

use crate::config::WriterConfig;

use super::writer::Writer;

static INSTANCE: OnceLock<Writer> = OnceLock::new();

/// Errors from installing the process-wide writer
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("the process-wide log writer is already initialized")]
    AlreadyInitialized,
}

/// Get the process-wide writer, creating it with the default configuration on first use
pub fn instance() -> &'static Writer {
    INSTANCE.get_or_init(|| build(&WriterConfig::default()))
}

/// Create the process-wide writer from `config`
///
/// Fails if the writer already exists, whether from an earlier `init` or from a
/// call to [`instance`].
pub fn init(config: WriterConfig) -> Result<&'static Writer, InitError> {
    let mut created = false;
    let writer = INSTANCE.get_or_init(|| {
        created = true;
        build(&config)
    });
    if created {
        Ok(writer)
    } else {
        Err(InitError::AlreadyInitialized)
    }
}

/// Load configuration from a TOML file and create the process-wide writer
pub fn init_from_file(path: &std::path::Path) -> anyhow::Result<&'static Writer> {
    let config = WriterConfig::load(path)?;
    Ok(init(config)?)
}

/// Whether the process-wide writer has been created
pub fn is_initialized() -> bool {
    INSTANCE.get().is_some()
}

/// Close the process-wide writer if it exists
///
/// Safe to call any number of times; only the first call after creation flushes.
pub fn shutdown() {
    if let Some(writer) = INSTANCE.get() {
        writer.close();
    }
}

fn build(config: &WriterConfig) -> Writer {
    let writer = Writer::new(config);
    register_exit_hook();
    writer
}

#[cfg(unix)]
fn register_exit_hook() {
    extern "C" fn on_exit() {
        shutdown();
    }

    // SAFETY: `on_exit` is a plain `extern "C"` function with no captured state
    let rc = unsafe { libc::atexit(on_exit) };
    if rc != 0 {
        tracing::warn!("Could not register log writer exit hook");
    }
}

#[cfg(not(unix))]
fn register_exit_hook() {
    tracing::debug!("No exit hook on this platform, call sololog::shutdown() or hold a ShutdownGuard");
}

/// Closes the process-wide writer when dropped
///
/// Keep it alive in `main` so buffered lines reach the file even on platforms
/// without an exit hook.
#[must_use = "the writer is closed when the guard is dropped"]
#[derive(Debug, Default)]
pub struct ShutdownGuard {
    _private: (),
}

impl ShutdownGuard {
    /// Create a guard for the process-wide writer
    pub fn new() -> Self {
        Self::default()
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        shutdown();
    }
}
