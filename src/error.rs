// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Riff return `error::Result<T>`.  No panics in
// production paths.  File errors are recoverable and surface as warning
// dialogs through the shell; the rest abort startup and are reported by
// `main`.

use std::path::PathBuf;

use thiserror::Error;

/// Every error that Riff can produce.
#[derive(Debug, Error)]
pub enum RiffError {
    /// The document could not be read from disk.
    #[error("Cannot read file {}:\n{reason}.", path.display())]
    FileOpenFailed {
        path: PathBuf,
        /// Human-readable system error description.
        reason: String,
    },

    /// The document could not be written to disk.
    #[error("Cannot write file {}:\n{reason}.", path.display())]
    FileWriteFailed { path: PathBuf, reason: String },

    /// A Win32 API call returned a failure code.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// The settings store or log file could not be prepared.
    #[error("settings I/O error: {0}")]
    Settings(#[from] std::io::Error),

    /// A global logger was already installed.
    #[error("logger initialisation failed: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// This target has no GUI shell.
    #[error("Riff needs a Windows desktop session to run")]
    Unsupported,
}

impl RiffError {
    pub(crate) fn open_failed(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::FileOpenFailed {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn write_failed(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::FileWriteFailed {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

// Convert a windows-crate error (HRESULT) directly into a RiffError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for RiffError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_failure_message_names_path_and_reason() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file");
        let err = RiffError::open_failed("/tmp/missing.txt", &io);
        assert_eq!(
            err.to_string(),
            "Cannot read file /tmp/missing.txt:\nNo such file."
        );
    }

    #[test]
    fn write_failure_message_names_path_and_reason() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Access denied");
        let err = RiffError::write_failed("/root/locked.txt", &io);
        assert!(err.to_string().starts_with("Cannot write file /root/locked.txt:"));
        assert!(err.to_string().contains("Access denied"));
    }

    #[test]
    fn win32_error_formats_code_as_hex() {
        let err = RiffError::Win32 { function: "CreateWindowExW", code: 5 };
        assert_eq!(err.to_string(), "CreateWindowExW failed (error 0x00000005)");
    }
}
