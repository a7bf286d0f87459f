// ── Document state & plain-text file I/O ──────────────────────────────────────
//
// The text itself lives in the shell's text surface; this module tracks what
// the controller needs to know about it (where it came from, whether it has
// unsaved edits) and moves text to and from disk.
// No `unsafe`, no Win32 imports.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    editor,
    error::{Result, RiffError},
};

/// Application name shown in the title bar and dialogs.
pub(crate) const APP_NAME: &str = "Riff";

/// Name shown for a document that has never been saved.
pub(crate) const UNTITLED_NAME: &str = "untitled.txt";

// ── DocumentState ─────────────────────────────────────────────────────────────

/// Per-document state for the single open document.
#[derive(Debug, Default)]
pub(crate) struct DocumentState {
    /// Path most recently associated with the text via load or save, or
    /// `None` for an untitled buffer.
    pub(crate) path: Option<PathBuf>,
    /// `true` when the text surface holds edits not yet saved to disk.
    pub(crate) dirty: bool,
}

impl DocumentState {
    /// A fresh, untitled, clean document.
    pub(crate) fn new_untitled() -> Self {
        Self::default()
    }

    /// Associate the document with `path` (or none) and mark it clean.
    pub(crate) fn set_current_file(&mut self, path: Option<PathBuf>) {
        self.path = path;
        self.dirty = false;
    }

    /// The bare filename component, or `untitled.txt` if no path is set.
    pub(crate) fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED_NAME.to_owned())
    }

    /// Compute the title string for the main window.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No path, clean | `"untitled.txt - Riff"` |
    /// | Path set, clean | `"todo.txt - Riff"` |
    /// | Path set, dirty | `"*todo.txt - Riff"` |
    pub(crate) fn window_title(&self) -> String {
        let dirty = if self.dirty { "*" } else { "" };
        format!("{dirty}{} - {APP_NAME}", self.display_name())
    }
}

// ── File I/O ──────────────────────────────────────────────────────────────────

/// Read `path` as text.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, and line endings
/// are normalised to `\n` so the in-memory text is the same on every platform.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| RiffError::open_failed(path, &e))?;
    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);
    Ok(editor::normalize_newlines(text))
}

/// Write `text` to `path`, creating or truncating the file.
///
/// `\n` is written as the platform's native line ending.
pub(crate) fn write_text(path: &Path, text: &str) -> Result<()> {
    let native = editor::native_newlines(text);
    fs::write(path, native.as_bytes()).map_err(|e| RiffError::write_failed(path, &e))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_clean_untitled() {
        assert_eq!(DocumentState::new_untitled().window_title(), "untitled.txt - Riff");
    }

    #[test]
    fn title_dirty_untitled() {
        let mut doc = DocumentState::new_untitled();
        doc.dirty = true;
        assert_eq!(doc.window_title(), "*untitled.txt - Riff");
    }

    #[test]
    fn title_clean_with_path() {
        let mut doc = DocumentState::new_untitled();
        doc.set_current_file(Some(PathBuf::from("notes").join("todo.txt")));
        assert_eq!(doc.window_title(), "todo.txt - Riff");
    }

    #[test]
    fn title_dirty_with_path() {
        let mut doc = DocumentState::new_untitled();
        doc.set_current_file(Some(PathBuf::from("todo.txt")));
        doc.dirty = true;
        assert_eq!(doc.window_title(), "*todo.txt - Riff");
    }

    #[test]
    fn set_current_file_clears_dirty() {
        let mut doc = DocumentState::new_untitled();
        doc.dirty = true;
        doc.set_current_file(None);
        assert!(!doc.dirty);
        assert_eq!(doc.path, None);
    }

    #[test]
    fn write_then_read_returns_same_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a.txt");
        let text = "first line\nsecond line\n\nünïcødé\n";
        write_text(&path, text).expect("write");
        assert_eq!(read_text(&path).expect("read"), text);
    }

    #[test]
    fn read_normalises_crlf_and_strips_bom() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dos.txt");
        fs::write(&path, b"\xEF\xBB\xBFone\r\ntwo\r\n").expect("fixture");
        assert_eq!(read_text(&path).expect("read"), "one\ntwo\n");
    }

    #[test]
    fn read_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"caf\xE9").expect("fixture");
        assert_eq!(read_text(&path).expect("read"), "caf\u{FFFD}");
    }

    #[test]
    fn read_missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.txt");
        match read_text(&path) {
            Err(RiffError::FileOpenFailed { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected FileOpenFailed, got {other:?}"),
        }
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("no-such-dir").join("a.txt");
        match write_text(&path, "x") {
            Err(RiffError::FileWriteFailed { path: p, reason }) => {
                assert_eq!(p, path);
                assert!(!reason.is_empty());
            }
            other => panic!("expected FileWriteFailed, got {other:?}"),
        }
    }
}
