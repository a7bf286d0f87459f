// ── Common dialogs ─────────────────────────────────────────────────────────────
//
// Thin wrappers around the Win32 common-dialog and message-box APIs.  The
// pickers return `Some(..)` on user confirmation and `None` on cancel or
// error.
//
// This is inside `platform::win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use std::path::PathBuf;

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{COLORREF, HWND},
        Graphics::Gdi::{FW_BOLD, LOGFONTW},
        UI::{
            Controls::Dialogs::{
                ChooseColorW, ChooseFontW, GetOpenFileNameW, GetSaveFileNameW, CC_FULLOPEN,
                CC_RGBINIT, CF_INITTOLOGFONTSTRUCT, CF_SCREENFONTS, CHOOSECOLORW, CHOOSEFONTW,
                OFN_FILEMUSTEXIST, OFN_HIDEREADONLY, OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST,
                OPENFILENAMEW,
            },
            WindowsAndMessaging::{
                MessageBoxW, IDCANCEL, IDNO, IDYES, MB_ICONINFORMATION, MB_ICONWARNING, MB_OK,
                MB_YESNOCANCEL, MESSAGEBOX_STYLE,
            },
        },
    },
};

use crate::{
    platform::{win32::dpi, Notice, SaveChoice},
    theme::{FontSpec, Rgb},
};

// ── Buffer size ───────────────────────────────────────────────────────────────

/// Maximum path length in `WCHAR`s, including the null terminator.
/// `MAX_PATH` (260) is too short for modern Windows paths; use 32 768 which
/// is the documented maximum for `\\?\` extended paths.
const PATH_BUF_LEN: usize = 32_768;

const FILTER: &str = "Text Files (*.txt)\0*.txt\0All Files (*.*)\0*.*\0\0";

// ── Open dialog ───────────────────────────────────────────────────────────────

/// Show the standard "Open File" dialog.
///
/// Returns the chosen path, or `None` if the user cancelled.
pub(crate) fn show_open_dialog(hwnd_owner: HWND) -> Option<PathBuf> {
    let mut buf = vec![0u16; PATH_BUF_LEN];
    let filter = wide(FILTER);

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: hwnd_owner,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: windows::core::PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        Flags: OFN_FILEMUSTEXIST | OFN_PATHMUSTEXIST | OFN_HIDEREADONLY,
        ..Default::default()
    };

    // SAFETY: `ofn` is fully initialised; `buf` and `filter` outlive this
    // call.  GetOpenFileNameW reads and writes only within the buffers we
    // provided.  The function is called on the UI thread (required for modal
    // dialogs).
    let ok = unsafe { GetOpenFileNameW(&mut ofn) };

    ok.as_bool().then(|| path_from_buf(&buf))
}

// ── Save dialog ───────────────────────────────────────────────────────────────

/// Show the standard "Save As" dialog, modal to `hwnd_owner`.
///
/// `default_name` pre-populates the filename field.  Returns the chosen path,
/// or `None` if cancelled.
pub(crate) fn show_save_dialog(hwnd_owner: HWND, default_name: &str) -> Option<PathBuf> {
    let mut buf: Vec<u16> = default_name
        .encode_utf16()
        .take(PATH_BUF_LEN - 1)
        .chain(std::iter::repeat(0))
        .take(PATH_BUF_LEN)
        .collect();
    let filter = wide(FILTER);
    let default_ext = wide("txt");

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: hwnd_owner,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: windows::core::PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        lpstrDefExt: PCWSTR(default_ext.as_ptr()),
        Flags: OFN_OVERWRITEPROMPT | OFN_PATHMUSTEXIST,
        ..Default::default()
    };

    // SAFETY: same invariants as show_open_dialog above.
    let ok = unsafe { GetSaveFileNameW(&mut ofn) };

    ok.as_bool().then(|| path_from_buf(&buf))
}

// ── Save prompt ───────────────────────────────────────────────────────────────

/// Ask whether unsaved changes should be saved.  Yes saves, No discards.
pub(crate) fn ask_save_changes(hwnd_owner: HWND, app_name: &str) -> SaveChoice {
    let text = wide("The document has been modified.\nDo you want to save your changes?");
    let title = wide(app_name);

    // SAFETY: text and title are valid null-terminated UTF-16 strings that
    // remain allocated for the duration of the MessageBoxW call.
    let answer = unsafe {
        MessageBoxW(
            hwnd_owner,
            PCWSTR(text.as_ptr()),
            PCWSTR(title.as_ptr()),
            MB_YESNOCANCEL | MB_ICONWARNING,
        )
    };

    match answer {
        IDYES => SaveChoice::Save,
        IDNO => SaveChoice::Discard,
        IDCANCEL => SaveChoice::Cancel,
        // Closing the box any other way keeps the document.
        _ => SaveChoice::Cancel,
    }
}

// ── Message boxes ─────────────────────────────────────────────────────────────

/// Show a modal OK-only message box.
pub(crate) fn message_box(hwnd_owner: HWND, notice: Notice, title: &str, text: &str) {
    let icon: MESSAGEBOX_STYLE = match notice {
        Notice::Information => MB_ICONINFORMATION,
        Notice::Warning => MB_ICONWARNING,
    };
    let text = wide(text);
    let title = wide(title);

    // SAFETY: text and title are valid null-terminated UTF-16 strings that
    // remain allocated for the duration of the call.  The return value
    // (always IDOK) is intentionally unused.
    unsafe {
        let _ = MessageBoxW(hwnd_owner, PCWSTR(text.as_ptr()), PCWSTR(title.as_ptr()), MB_OK | icon);
    }
}

// ── Font dialog ───────────────────────────────────────────────────────────────

/// Show the standard font dialog seeded with `current`.
pub(crate) fn choose_font(hwnd_owner: HWND, current: &FontSpec) -> Option<FontSpec> {
    let dpi = dpi::get_for_window(hwnd_owner);
    let mut lf = LOGFONTW {
        lfHeight: dpi::points_to_height(current.point_size, dpi),
        lfWeight: if current.bold { FW_BOLD.0 as i32 } else { 0 },
        lfItalic: u8::from(current.italic),
        ..Default::default()
    };
    for (dst, src) in lf.lfFaceName.iter_mut().zip(current.family.encode_utf16().take(31)) {
        *dst = src;
    }

    let mut cf = CHOOSEFONTW {
        lStructSize: std::mem::size_of::<CHOOSEFONTW>() as u32,
        hwndOwner: hwnd_owner,
        lpLogFont: &mut lf,
        Flags: CF_SCREENFONTS | CF_INITTOLOGFONTSTRUCT,
        ..Default::default()
    };

    // SAFETY: cf is fully initialised and lpLogFont points at `lf`, which
    // outlives the call.  Called on the UI thread.
    let ok = unsafe { ChooseFontW(&mut cf) };
    if !ok.as_bool() {
        return None;
    }

    let len = lf.lfFaceName.iter().position(|&c| c == 0).unwrap_or(lf.lfFaceName.len());
    Some(FontSpec {
        family: String::from_utf16_lossy(&lf.lfFaceName[..len]),
        // iPointSize is in tenths of a point.
        point_size: (cf.iPointSize.max(10) / 10) as u32,
        bold: lf.lfWeight >= FW_BOLD.0 as i32,
        italic: lf.lfItalic != 0,
    })
}

// ── Colour dialog ─────────────────────────────────────────────────────────────

/// Show the standard colour dialog seeded with `initial`.
///
/// `custom` holds the dialog's sixteen custom-colour slots and is updated in
/// place so that user-defined colours survive between invocations.
pub(crate) fn choose_color(hwnd_owner: HWND, initial: Rgb, custom: &mut [COLORREF; 16]) -> Option<Rgb> {
    let mut cc = CHOOSECOLORW {
        lStructSize: std::mem::size_of::<CHOOSECOLORW>() as u32,
        hwndOwner: hwnd_owner,
        rgbResult: COLORREF(initial.to_colorref()),
        lpCustColors: custom.as_mut_ptr(),
        Flags: CC_RGBINIT | CC_FULLOPEN,
        ..Default::default()
    };

    // SAFETY: cc is fully initialised; lpCustColors points at sixteen
    // COLORREFs that outlive the call, as the API requires.
    let ok = unsafe { ChooseColorW(&mut cc) };

    ok.as_bool().then(|| Rgb::from_colorref(cc.rgbResult.0))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Null-terminated UTF-16 copy of `s`.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Convert a null-terminated UTF-16 buffer to a `PathBuf`.
fn path_from_buf(buf: &[u16]) -> PathBuf {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    PathBuf::from(String::from_utf16_lossy(&buf[..len]))
}
