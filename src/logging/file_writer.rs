//! Rotating log file sink
//!
//! Every write opens the file in append mode, checks its size, writes and closes it
//! again. No handle survives between calls, so the size check always sees the file
//! as it is on disk.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::banner::Banner;

/// Default rotation ceiling in bytes
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20_000_000;

/// Resolve a usable log file path
///
/// Tries the configured path first, then the same file name inside the system temp
/// directory. Returns `None` if neither can be opened for appending.
pub fn resolve_log_path(configured: &Path) -> Option<PathBuf> {
    if open_append(configured).is_ok() {
        return Some(configured.to_path_buf());
    }

    let file_name = configured
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "program_log.txt".into());
    let fallback = std::env::temp_dir().join(file_name);

    match open_append(&fallback) {
        Ok(_) => {
            tracing::warn!(
                configured = %configured.display(),
                fallback = %fallback.display(),
                "Log path not writable, falling back to temp directory"
            );
            Some(fallback)
        }
        Err(e) => {
            tracing::warn!(
                configured = %configured.display(),
                error = %e,
                "No writable log path, file output disabled"
            );
            None
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Where a sink writes
#[derive(Debug)]
enum Target {
    /// Path not checked yet; resolved on the first write
    Pending(PathBuf),
    Ready(PathBuf),
    Disabled,
}

/// Size-bounded log file that is truncated and reseeded with a banner when full
#[derive(Debug)]
pub struct RotatingFileSink {
    target: Target,
    max_file_size: u64,
    banner: Banner,
}

impl RotatingFileSink {
    /// Create a sink for `path`, falling back to the temp directory if needed
    pub fn new(path: &Path, max_file_size: u64, banner: Banner) -> Self {
        let target = match resolve_log_path(path) {
            Some(resolved) => Target::Ready(resolved),
            None => Target::Disabled,
        };
        Self {
            target,
            max_file_size,
            banner,
        }
    }

    /// Create a sink that resolves `path` only when something is first written
    pub fn deferred(path: &Path, max_file_size: u64, banner: Banner) -> Self {
        Self {
            target: Target::Pending(path.to_path_buf()),
            max_file_size,
            banner,
        }
    }

    /// A sink that discards everything
    pub fn disabled(banner: Banner) -> Self {
        Self {
            target: Target::Disabled,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            banner,
        }
    }

    /// The file being written, if resolved
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            Target::Ready(path) => Some(path),
            Target::Pending(_) | Target::Disabled => None,
        }
    }

    /// Rotation ceiling in bytes
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Banner used when seeding a rotated file
    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    /// Whether writes can reach a file
    pub fn is_enabled(&self) -> bool {
        !matches!(self.target, Target::Disabled)
    }

    /// Resolve a deferred path now
    pub fn resolve(&mut self) {
        if let Target::Pending(path) = &self.target {
            self.target = match resolve_log_path(path) {
                Some(resolved) => Target::Ready(resolved),
                None => Target::Disabled,
            };
        }
    }

    /// Append a single line, adding the trailing newline
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.write_raw(line, true)
    }

    /// Append a block of already newline-terminated lines
    pub fn write_block(&mut self, block: &str) -> io::Result<()> {
        self.write_raw(block, !block.ends_with('\n'))
    }

    fn write_raw(&mut self, text: &str, newline: bool) -> io::Result<()> {
        self.resolve();
        let Some(path) = self.path() else {
            return Ok(());
        };

        let mut file = open_append(path)?;
        if file.metadata()?.len() >= self.max_file_size {
            drop(file);
            file = self.rotate(path)?;
        }

        file.write_all(text.as_bytes())?;
        if newline {
            file.write_all(b"\n")?;
        }
        // Dropping the handle closes the file on every path
        Ok(())
    }

    /// Truncate the file and write a fresh banner, returning the open handle
    fn rotate(&self, path: &Path) -> io::Result<File> {
        tracing::debug!(path = %path.display(), limit = self.max_file_size, "Rotating log file");
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.write_all(self.banner.render().as_bytes())?;
        file.write_all(b"\n")?;
        Ok(file)
    }

    /// Current size of the log file on disk
    pub fn current_size(&self) -> u64 {
        self.path()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0)
    }
}
