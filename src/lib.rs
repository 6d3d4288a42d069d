//! sololog - a process-wide leveled log writer
//!
//! One shared [`Writer`] records messages to a size-rotated file, an in-memory buffer,
//! the console, or console and file.
//!
//! ```no_run
//! use sololog::{Severity, WriteMode, WriterConfig};
//!
//! let mut config = WriterConfig::with_path("app.log");
//! config.mode = WriteMode::MemoryThenFile;
//! let log = sololog::init(config).expect("writer already created");
//! let _guard = sololog::ShutdownGuard::new();
//!
//! log.info("service started").warning(3);
//! log.set_min_severity(Severity::Error);
//! sololog::log_assert!(log.lines_written() > 0, "nothing was logged");
//! ```

pub mod config;
pub mod logging;
mod macros;

pub use config::WriterConfig;
pub use logging::{
    init, init_from_file, instance, shutdown, InitError, LogValue, Severity, ShutdownGuard,
    WriteMode, Writer, ASSERT_FAILED_MESSAGE, CLOSING_MESSAGE,
};
