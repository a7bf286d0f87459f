// ── EDIT child-window hosting ─────────────────────────────────────────────────
//
// This is one of exactly two modules where `unsafe` is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment.
//
// The multi-line EDIT control is the text buffer: Riff never keeps its own
// copy of the text.  The control only understands `\r\n`, so text crossing
// this boundary is converted in both directions.

#![allow(unsafe_code)]

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, WPARAM},
        Graphics::Gdi::{
            CreateFontIndirectW, DeleteObject, InvalidateRect, FW_BOLD, FW_NORMAL, HFONT,
            HGDIOBJ, LOGFONTW,
        },
        UI::WindowsAndMessaging::{
            CreateWindowExW, GetWindowTextLengthW, GetWindowTextW, SendMessageW, SetWindowTextW,
            HMENU, WINDOW_EX_STYLE, WINDOW_STYLE, WM_SETFONT, WS_CHILD, WS_EX_CLIENTEDGE,
            WS_HSCROLL, WS_VISIBLE, WS_VSCROLL,
        },
    },
};

use crate::{
    editor::{normalize_newlines, to_crlf},
    error::{Result, RiffError},
    theme::FontSpec,
};

// ── Message constants ─────────────────────────────────────────────────────────
//
// Source of truth: WinUser.h.  Only the subset Riff sends is listed.

/// Get selection range.  WPARAM=*mut u32 start; LPARAM=*mut u32 end.
const EM_GETSEL: u32 = 0x00B0;
/// Set maximum text length.  WPARAM=0 lifts the 32 KiB default.
const EM_SETLIMITTEXT: u32 = 0x00C5;
/// Query / set the control's modification flag.
const EM_GETMODIFY: u32 = 0x00B8;
const EM_SETMODIFY: u32 = 0x00B9;
const WM_CUT: u32 = 0x0300;
const WM_COPY: u32 = 0x0301;
const WM_PASTE: u32 = 0x0302;

/// Notification code (HIWORD of WPARAM in WM_COMMAND) sent after an edit.
pub(crate) const EN_CHANGE: u32 = 0x0300;

const ES_MULTILINE: u32 = 0x0004;
const ES_AUTOVSCROLL: u32 = 0x0040;
const ES_AUTOHSCROLL: u32 = 0x0080;
const ES_NOHIDESEL: u32 = 0x0100;
const ES_WANTRETURN: u32 = 0x1000;

// ── EditView ──────────────────────────────────────────────────────────────────

/// The hosted EDIT child window and the font it currently displays.
///
/// The child `HWND` is destroyed automatically by Windows when the parent is
/// destroyed; the font is released on `Drop`.
pub(crate) struct EditView {
    hwnd: HWND,
    font: Option<HFONT>,
}

impl EditView {
    /// Create a multi-line EDIT child inside `hwnd_parent`.
    ///
    /// The control starts with zero size; the parent lays it out on WM_SIZE.
    pub(crate) fn create(hwnd_parent: HWND, hinstance: HINSTANCE) -> Result<Self> {
        let style = WS_CHILD
            | WS_VISIBLE
            | WS_VSCROLL
            | WS_HSCROLL
            | WINDOW_STYLE(ES_MULTILINE | ES_AUTOVSCROLL | ES_AUTOHSCROLL | ES_NOHIDESEL | ES_WANTRETURN);

        // SAFETY: "EDIT" is a system class that is always registered.
        // hwnd_parent and hinstance are valid handles owned by the caller.
        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_CLIENTEDGE,
                w!("EDIT"),
                PCWSTR::null(),
                style,
                0,
                0,
                0,
                0,
                hwnd_parent,
                HMENU::default(),
                hinstance,
                None,
            )
        }
        .map_err(|_| {
            // SAFETY: GetLastError reads thread-local state set by the just-
            // failed CreateWindowExW; no Win32 calls between them.
            let code = unsafe { GetLastError().0 };
            RiffError::Win32 { function: "CreateWindowExW (EDIT)", code }
        })?;

        // SAFETY: hwnd is the EDIT control just created.
        unsafe {
            let _ = SendMessageW(hwnd, EM_SETLIMITTEXT, WPARAM(0), LPARAM(0));
        }

        Ok(Self { hwnd, font: None })
    }

    /// The EDIT child window handle.  Valid until the parent is destroyed.
    pub(crate) fn hwnd(&self) -> HWND {
        self.hwnd
    }

    // ── Document operations ───────────────────────────────────────────────────

    /// Replace all text.  `text` uses `\n` line endings.
    pub(crate) fn set_text(&self, text: &str) {
        let wide: Vec<u16> = to_crlf(text).encode_utf16().chain(std::iter::once(0)).collect();
        // SAFETY: hwnd valid; wide is null-terminated UTF-16 that outlives the call.
        unsafe {
            let _ = SetWindowTextW(self.hwnd, PCWSTR(wide.as_ptr()));
        }
    }

    /// Read the full text with `\n` line endings.
    pub(crate) fn text(&self) -> String {
        // SAFETY: hwnd valid; read-only query.
        let len = unsafe { GetWindowTextLengthW(self.hwnd) }.max(0) as usize;
        let mut buf = vec![0u16; len + 1];
        // SAFETY: buf holds len + 1 UTF-16 units, enough for the text plus the
        // terminator; GetWindowTextW never writes past the slice length.
        let copied = unsafe { GetWindowTextW(self.hwnd, &mut buf) }.max(0) as usize;
        normalize_newlines(&String::from_utf16_lossy(&buf[..copied]))
    }

    /// `true` when a non-empty range is selected.
    pub(crate) fn has_selection(&self) -> bool {
        let mut start: u32 = 0;
        let mut end: u32 = 0;
        // SAFETY: hwnd valid; EM_GETSEL writes one u32 through each pointer,
        // both of which point at live locals.
        unsafe {
            let _ = SendMessageW(
                self.hwnd,
                EM_GETSEL,
                WPARAM(&mut start as *mut u32 as usize),
                LPARAM(&mut end as *mut u32 as isize),
            );
        }
        end > start
    }

    // ── Edit operations ───────────────────────────────────────────────────────

    /// Cut the current selection to the clipboard.  Returns `true` if the
    /// text changed.
    pub(crate) fn cut(&self) -> bool {
        self.modifies(WM_CUT)
    }

    /// Copy the current selection to the clipboard.
    pub(crate) fn copy_to_clipboard(&self) {
        // SAFETY: hwnd valid; WM_COPY is processed natively by EDIT.
        unsafe { let _ = SendMessageW(self.hwnd, WM_COPY, WPARAM(0), LPARAM(0)); }
    }

    /// Paste from the clipboard at the caret position.  Returns `true` if
    /// the text changed.
    pub(crate) fn paste(&self) -> bool {
        self.modifies(WM_PASTE)
    }

    /// Send `msg` with the modification flag cleared, then report whether
    /// the control set it.  The parent's EN_CHANGE arrives while the
    /// controller is still busy, so the answer is returned directly.
    fn modifies(&self, msg: u32) -> bool {
        // SAFETY: hwnd valid; EM_SETMODIFY, the clipboard message and
        // EM_GETMODIFY are all processed natively and synchronously by EDIT.
        unsafe {
            let _ = SendMessageW(self.hwnd, EM_SETMODIFY, WPARAM(0), LPARAM(0));
            let _ = SendMessageW(self.hwnd, msg, WPARAM(0), LPARAM(0));
            SendMessageW(self.hwnd, EM_GETMODIFY, WPARAM(0), LPARAM(0)).0 != 0
        }
    }

    // ── Appearance ────────────────────────────────────────────────────────────

    /// Display the text in `font`, sized for `dpi`.
    pub(crate) fn set_font(&mut self, font: &FontSpec, dpi: u32) -> Result<()> {
        let mut lf = LOGFONTW {
            lfHeight: crate::platform::win32::dpi::points_to_height(font.point_size, dpi),
            lfWeight: if font.bold { FW_BOLD.0 as i32 } else { FW_NORMAL.0 as i32 },
            lfItalic: u8::from(font.italic),
            ..Default::default()
        };
        for (dst, src) in lf.lfFaceName.iter_mut().zip(font.family.encode_utf16().take(31)) {
            *dst = src;
        }

        // SAFETY: lf is fully initialised and its face name is null-terminated
        // (at most 31 units copied into a zeroed 32-unit array).
        let hfont = unsafe { CreateFontIndirectW(&lf) };
        if hfont.is_invalid() {
            return Err(RiffError::Win32 { function: "CreateFontIndirectW", code: 0 });
        }

        // SAFETY: hwnd valid; hfont stays alive until replaced below or
        // released in Drop, outliving its use by the control.
        unsafe {
            let _ = SendMessageW(self.hwnd, WM_SETFONT, WPARAM(hfont.0 as usize), LPARAM(1));
        }

        if let Some(old) = self.font.replace(hfont) {
            // SAFETY: the control no longer references the old font.
            unsafe {
                let _ = DeleteObject(HGDIOBJ(old.0));
            }
        }
        Ok(())
    }

    /// Force a repaint, e.g. after the background brush changed.
    pub(crate) fn repaint(&self) {
        // SAFETY: hwnd valid; None invalidates the whole client area.
        unsafe {
            let _ = InvalidateRect(self.hwnd, None, true);
        }
    }
}

impl Drop for EditView {
    fn drop(&mut self) {
        if let Some(font) = self.font.take() {
            // SAFETY: the EDIT window is already destroyed (children go before
            // the parent's state is dropped in WM_NCDESTROY), so nothing uses
            // the font any more.
            unsafe {
                let _ = DeleteObject(HGDIOBJ(font.0));
            }
        }
    }
}
