// ── Editor component abstraction ──────────────────────────────────────────────
//
// Exposes a safe Rust API over the Win32 multi-line EDIT control
// (`edit_control::EditView`), plus the newline conversions shared by the
// control and the file I/O in `document`.  The conversions are pure Rust and
// build on every target.

#[cfg(windows)]
pub mod edit_control;

/// Convert `\r\n` and lone `\r` to `\n`.
pub(crate) fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert `\n`-separated text to CRLF.  The EDIT control only breaks lines
/// on `\r\n`.
pub(crate) fn to_crlf(text: &str) -> String {
    let normalized = normalize_newlines(text);
    normalized.replace('\n', "\r\n")
}

/// Convert `\n`-separated text to the platform's native line ending.
pub(crate) fn native_newlines(text: &str) -> String {
    if cfg!(windows) {
        to_crlf(text)
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_handles_mixed_endings() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn normalize_keeps_lf_text_untouched() {
        assert_eq!(normalize_newlines("a\nb\n"), "a\nb\n");
    }

    #[test]
    fn to_crlf_does_not_double_existing_crlf() {
        assert_eq!(to_crlf("a\r\nb\nc"), "a\r\nb\r\nc");
    }

    #[test]
    fn native_newlines_roundtrip_through_normalize() {
        let text = "x\ny\n";
        assert_eq!(normalize_newlines(&native_newlines(text)), text);
    }
}
