//! In-memory line buffer for the memory-then-file write mode
//!
//! Accumulates formatted lines until the next one would overflow the capacity
//! ceiling, at which point the whole contents are handed back for flushing.

/// Default buffer ceiling in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 10_000_000;

/// Bounded text accumulator
///
/// Not synchronized on its own; the writer only touches it while holding its lock.
#[derive(Debug)]
pub struct LineBuffer {
    contents: String,
    capacity: usize,
}

impl LineBuffer {
    /// Create an empty buffer with the given ceiling in bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            // Grows on demand past the first 64 KiB
            contents: String::with_capacity(capacity.min(64 * 1024)),
            capacity,
        }
    }

    /// Capacity ceiling in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current size in bytes
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Buffered text, one newline-terminated line per entry
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Whether appending `line` would push the buffer past its ceiling
    ///
    /// The check is strict: `len + line + 1 > capacity`, so a buffer may fill to
    /// exactly its ceiling. An empty buffer always accepts the line, even one larger
    /// than the ceiling, so a flush never writes an empty block.
    pub fn would_overflow(&self, line: &str) -> bool {
        !self.is_empty() && self.contents.len() + line.len() + 1 > self.capacity
    }

    /// Append a line
    ///
    /// If the line does not fit, the previous contents are returned so the caller
    /// can flush them in a single write; the buffer then holds only `line`.
    pub fn push(&mut self, line: &str) -> Option<String> {
        let flushed = if self.would_overflow(line) {
            self.take()
        } else {
            None
        };
        self.contents.push_str(line);
        self.contents.push('\n');
        flushed
    }

    /// Remove and return everything buffered, or `None` if empty
    pub fn take(&mut self) -> Option<String> {
        if self.contents.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.contents))
    }
}
