//! Write modes selecting where formatted lines go

use serde::{Deserialize, Serialize};

/// Destination policy for the writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WriteMode {
    /// Every line goes straight to the rotating file
    #[default]
    FileOnly = 0,
    /// Lines accumulate in memory and are flushed to the file when the buffer fills
    MemoryThenFile = 1,
    /// Lines go to standard output only
    ConsoleOnly = 2,
    /// Lines go to standard output and the file
    ConsoleAndFile = 3,
}

impl WriteMode {
    /// Whether this mode ever writes to the log file
    pub fn uses_file(&self) -> bool {
        !matches!(self, WriteMode::ConsoleOnly)
    }

    /// Apply the file-only deployment policy
    ///
    /// With `force_file_only` set, memory and console-only modes collapse to
    /// [`WriteMode::FileOnly`].
    pub fn resolve(self, force_file_only: bool) -> Self {
        match self {
            WriteMode::MemoryThenFile | WriteMode::ConsoleOnly if force_file_only => {
                WriteMode::FileOnly
            }
            other => other,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => WriteMode::MemoryThenFile,
            2 => WriteMode::ConsoleOnly,
            3 => WriteMode::ConsoleAndFile,
            _ => WriteMode::FileOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_forces_file_only() {
        assert_eq!(WriteMode::MemoryThenFile.resolve(true), WriteMode::FileOnly);
        assert_eq!(WriteMode::ConsoleOnly.resolve(true), WriteMode::FileOnly);
        assert_eq!(
            WriteMode::ConsoleAndFile.resolve(true),
            WriteMode::ConsoleAndFile
        );
        assert_eq!(
            WriteMode::MemoryThenFile.resolve(false),
            WriteMode::MemoryThenFile
        );
    }

    #[test]
    fn test_uses_file() {
        assert!(WriteMode::FileOnly.uses_file());
        assert!(WriteMode::MemoryThenFile.uses_file());
        assert!(WriteMode::ConsoleAndFile.uses_file());
        assert!(!WriteMode::ConsoleOnly.uses_file());
    }

    #[test]
    fn test_from_u8() {
        for mode in [
            WriteMode::FileOnly,
            WriteMode::MemoryThenFile,
            WriteMode::ConsoleOnly,
            WriteMode::ConsoleAndFile,
        ] {
            assert_eq!(WriteMode::from_u8(mode as u8), mode);
        }
    }
}
