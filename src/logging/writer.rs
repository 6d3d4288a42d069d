//! The log writer
//!
//! Filters by severity, formats each message into one line and routes it to the
//! console, the in-memory buffer or the rotating file according to the write mode.
//! A single mutex guards the buffer and every file write; the console stream has
//! its own.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::io::Write;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::WriterConfig;

use super::banner::{Banner, EnvironmentInfo, ProcessEnvironment};
use super::buffer::LineBuffer;
use super::file_writer::RotatingFileSink;
use super::format::{format_line, LogValue};
use super::mode::WriteMode;
use super::severity::Severity;

/// Line logged by [`Writer::close`]
pub const CLOSING_MESSAGE: &str = "Success closing log file.";

/// Message used by [`Writer::assert`]
pub const ASSERT_FAILED_MESSAGE: &str = "Assert failed";

/// State shared by every file-touching dispatch
#[derive(Debug)]
struct WriterState {
    buffer: LineBuffer,
    sink: RotatingFileSink,
}

impl WriterState {
    fn write_line(&mut self, line: &str) {
        if let Err(e) = self.sink.write_line(line) {
            tracing::debug!(error = %e, "Dropped log line");
        }
    }

    fn write_block(&mut self, block: &str) {
        if let Err(e) = self.sink.write_block(block) {
            tracing::debug!(error = %e, bytes = block.len(), "Dropped buffered log lines");
        }
    }

    fn flush_buffer(&mut self) {
        if let Some(block) = self.buffer.take() {
            self.write_block(&block);
        }
    }
}

/// Leveled, thread-safe log writer
///
/// Usually reached through [`crate::instance`], but standalone writers can be built
/// with [`Writer::new`]. Logging calls never fail: I/O errors lose the message and
/// nothing else.
pub struct Writer {
    min_severity: AtomicU8,
    mode: AtomicU8,
    force_file_only: bool,
    write_cursor: AtomicU64,
    closing: AtomicBool,
    closed: AtomicBool,
    state: Mutex<WriterState>,
    console: Mutex<Box<dyn Write + Send>>,
}

impl Writer {
    /// Build a writer from configuration
    pub fn new(config: &WriterConfig) -> Self {
        Self::with_environment(config, Box::new(ProcessEnvironment))
    }

    /// Build a writer whose banner reads environment details from `environment`
    pub fn with_environment(config: &WriterConfig, environment: Box<dyn EnvironmentInfo>) -> Self {
        let mode = config.effective_mode();
        let banner = Banner::with_environment(config.version.clone(), environment);
        let path = config.expanded_path();

        // The fallback path is only probed up front when the file is in use from the start
        let sink = if mode.uses_file() {
            RotatingFileSink::new(&path, config.max_file_size, banner)
        } else {
            RotatingFileSink::deferred(&path, config.max_file_size, banner)
        };

        let writer = Self {
            min_severity: AtomicU8::new(config.min_severity as u8),
            mode: AtomicU8::new(mode as u8),
            force_file_only: config.force_file_only,
            write_cursor: AtomicU64::new(0),
            closing: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            state: Mutex::new(WriterState {
                buffer: LineBuffer::new(config.buffer_capacity),
                sink,
            }),
            console: Mutex::new(Box::new(std::io::stdout())),
        };

        if config.banner_on_start && mode.uses_file() {
            let banner = writer.lock_state().sink.banner().render();
            writer.dispatch(banner.trim_end_matches('\n'));
        }

        tracing::debug!(?mode, path = %path.display(), "Log writer ready");
        writer
    }

    /// Send console output to `console` instead of stdout
    pub fn with_console(mut self, console: impl Write + Send + 'static) -> Self {
        *self.console.get_mut().unwrap_or_else(PoisonError::into_inner) = Box::new(console);
        self
    }

    fn lock_state(&self) -> MutexGuard<'_, WriterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log `message` at `severity`
    ///
    /// Messages below the minimum severity are dropped without side effects.
    pub fn log(&self, severity: Severity, message: &str) -> &Self {
        if severity < self.min_severity() {
            return self;
        }
        let line = format_line(severity, message);
        self.dispatch(&line);
        self
    }

    /// Log an informational message
    pub fn info(&self, value: impl LogValue) -> &Self {
        self.log_value(Severity::Info, value)
    }

    /// Log a warning
    pub fn warning(&self, value: impl LogValue) -> &Self {
        self.log_value(Severity::Warning, value)
    }

    /// Log an error
    pub fn error(&self, value: impl LogValue) -> &Self {
        self.log_value(Severity::Error, value)
    }

    /// Log a fatal error (does not terminate the process)
    pub fn fatal(&self, value: impl LogValue) -> &Self {
        self.log_value(Severity::Fatal, value)
    }

    fn log_value(&self, severity: Severity, value: impl LogValue) -> &Self {
        // Skip rendering the value when it would be filtered anyway
        if severity < self.min_severity() {
            return self;
        }
        self.log(severity, &value.to_log_string())
    }

    /// Abort the process if `condition` is false
    ///
    /// Logs a trace-context line and a fatal line carrying the caller's file and
    /// line, flushes buffered output, then aborts.
    #[track_caller]
    pub fn assert_condition(&self, condition: bool, message: impl LogValue) {
        if !condition {
            self.fail_assertion(Location::caller(), &message.to_log_string());
        }
    }

    /// Abort the process with the default message if `condition` is false
    #[track_caller]
    pub fn assert(&self, condition: bool) {
        self.assert_condition(condition, ASSERT_FAILED_MESSAGE);
    }

    fn fail_assertion(&self, location: &Location<'_>, message: &str) -> ! {
        self.report_assertion(location, message);
        self.flush();
        std::process::abort()
    }

    /// Write the two assertion lines without terminating
    pub(crate) fn report_assertion(&self, location: &Location<'_>, message: &str) {
        self.info(trace_context());
        self.fatal(format!(
            "{}:{} >> {}",
            location.file(),
            location.line(),
            message
        ));
    }

    /// Current minimum severity
    pub fn min_severity(&self) -> Severity {
        Severity::from_u8(self.min_severity.load(Ordering::Relaxed))
    }

    /// Change the minimum severity
    pub fn set_min_severity(&self, severity: Severity) {
        self.min_severity.store(severity as u8, Ordering::Relaxed);
    }

    /// Current write mode
    pub fn mode(&self) -> WriteMode {
        WriteMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    /// Switch the write mode
    ///
    /// Leaving memory-then-file mode flushes the buffer first. The file-only policy
    /// from the configuration still applies.
    pub fn set_mode(&self, mode: WriteMode) {
        let mode = mode.resolve(self.force_file_only);
        let mut state = self.lock_state();
        if self.mode() == WriteMode::MemoryThenFile && mode != WriteMode::MemoryThenFile {
            state.flush_buffer();
        }
        self.mode.store(mode as u8, Ordering::Release);
    }

    /// Hand everything buffered to the file now
    pub fn flush(&self) {
        self.lock_state().flush_buffer();
    }

    /// Number of lines accepted so far
    pub fn lines_written(&self) -> u64 {
        self.write_cursor.load(Ordering::Relaxed)
    }

    /// Bytes currently held in the memory buffer
    pub fn buffered_len(&self) -> usize {
        self.lock_state().buffer.len()
    }

    /// The resolved log file, if the file is in use
    pub fn path(&self) -> Option<PathBuf> {
        self.lock_state().sink.path().map(|p| p.to_path_buf())
    }

    /// Whether [`Writer::close`] has run
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Log the closing line and flush buffered content
    ///
    /// Runs once; later calls do nothing. The writer keeps working afterwards, with
    /// memory-then-file lines going straight to the file.
    pub fn close(&self) {
        if self.closing.swap(true, Ordering::AcqRel) {
            return;
        }
        self.info(CLOSING_MESSAGE);

        let mut state = self.lock_state();
        state.flush_buffer();
        self.closed.store(true, Ordering::Release);
    }

    fn dispatch(&self, line: &str) {
        if self.mode() == WriteMode::ConsoleOnly {
            self.print_console(line);
        } else {
            let mut state = self.lock_state();
            // set_mode switches modes under this lock, so read it again here
            match self.mode() {
                WriteMode::ConsoleOnly => self.print_console(line),
                WriteMode::FileOnly => state.write_line(line),
                WriteMode::MemoryThenFile if self.is_closed() => state.write_line(line),
                WriteMode::MemoryThenFile => {
                    if state.buffer.would_overflow(line) {
                        self.print_console(line);
                    }
                    if let Some(block) = state.buffer.push(line) {
                        state.write_block(&block);
                    }
                }
                WriteMode::ConsoleAndFile => {
                    self.print_console(line);
                    state.write_line(line);
                }
            }
        }
        self.write_cursor.fetch_add(1, Ordering::Relaxed);
    }

    /// Emit one complete line to the console in a single write
    fn print_console(&self, line: &str) {
        let mut text = String::with_capacity(line.len() + 1);
        text.push_str(line);
        text.push('\n');
        let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = console.write_all(text.as_bytes()).and_then(|()| console.flush()) {
            tracing::debug!(error = %e, "Dropped console line");
        }
    }
}

impl std::fmt::Debug for Writer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer")
            .field("mode", &self.mode())
            .field("min_severity", &self.min_severity())
            .field("lines_written", &self.lines_written())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Describe where an assertion fired
fn trace_context() -> String {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => {
            format!("Assertion context: thread '{}'\n{}", name, backtrace)
        }
        _ => format!(
            "Assertion context: thread '{}' (set RUST_BACKTRACE=1 for a backtrace)",
            name
        ),
    }
}
