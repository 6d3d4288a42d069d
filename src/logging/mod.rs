//! Logging system for sololog
//!
//! A single shared writer that formats leveled messages and sends them to a rotating
//! file, an in-memory buffer flushed to that file, the console, or console and file.

mod banner;
mod bridge;
mod buffer;
mod file_writer;
mod format;
mod global;
mod mode;
mod severity;
mod writer;

pub use banner::{Banner, EnvironmentInfo, ProcessEnvironment, MARKERS_LEGEND};
pub use bridge::{init_tracing, layer, EventWriter, WriterMakeWriter};
pub use buffer::{LineBuffer, DEFAULT_BUFFER_CAPACITY};
pub use file_writer::{resolve_log_path, RotatingFileSink, DEFAULT_MAX_FILE_SIZE};
pub use format::{
    fixed, format_line, format_line_at, radix, timestamp, LogValue, TIMESTAMP_FORMAT,
};
pub use global::{
    init, init_from_file, instance, is_initialized, shutdown, InitError, ShutdownGuard,
};
pub use mode::WriteMode;
pub use severity::{ParseSeverityError, Severity};
pub use writer::{Writer, ASSERT_FAILED_MESSAGE, CLOSING_MESSAGE};
