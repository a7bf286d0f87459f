// ── Win32 shell ───────────────────────────────────────────────────────────────
//
// `Shell` implemented over the main window and its child controls: the EDIT
// text surface, the toolbar, the status bar and the menu bar.  Owned by the
// `App` that lives in the window's `WindowState`.

#![allow(unsafe_code)]

use std::{cell::Cell, path::PathBuf, rc::Rc, time::Duration};

use log::warn;
use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{COLORREF, HWND, LPARAM, WPARAM},
        Graphics::Gdi::{CreateSolidBrush, DeleteObject, HBRUSH, HGDIOBJ},
        UI::WindowsAndMessaging::{
            EnableMenuItem, GetSystemMetrics, GetWindowPlacement, KillTimer, LoadCursorW,
            PostMessageW, SendMessageW, SetCursor, SetTimer, SetWindowPos, SetWindowTextW, HMENU,
            IDC_ARROW, IDC_WAIT, MF_BYCOMMAND, MF_ENABLED, MF_GRAYED, SM_CXSCREEN, SM_CYSCREEN,
            SWP_NOACTIVATE, SWP_NOZORDER, SW_SHOWMAXIMIZED, WINDOWPLACEMENT, WM_APP, WM_CLOSE,
        },
    },
};

use super::{dialogs, dpi};
use crate::{
    actions::{self, ActionId},
    document::APP_NAME,
    editor::edit_control::EditView,
    platform::{Notice, SaveChoice, Shell},
    settings::Geometry,
    theme::{FontSpec, Rgb},
};

/// Posted to the main window to run the colour dialog once the triggering
/// action handler has returned.
pub(crate) const WM_APP_COLOR_PICKER: u32 = WM_APP + 1;
/// Posted to the main window when the EDIT selection may have changed.
pub(crate) const WM_APP_SELECTION: u32 = WM_APP + 2;

/// Timer that clears transient status-bar messages.
pub(crate) const STATUS_TIMER_ID: usize = 1;

/// Set the text of status-bar part 0.  LPARAM = null-terminated UTF-16.
const SB_SETTEXTW: u32 = 0x0400 + 11;
/// Enable or disable a toolbar button.  WPARAM = command id; LPARAM = BOOL.
const TB_ENABLEBUTTON: u32 = 0x0400 + 1;

// ── Paint state ───────────────────────────────────────────────────────────────

/// Background colour and brush for WM_CTLCOLOREDIT.
///
/// Shared between the shell and the window procedure so painting never needs
/// to borrow the `App`, which may be busy inside a modal dialog.
pub(crate) struct Paint {
    color: Cell<COLORREF>,
    brush: Cell<HBRUSH>,
}

impl Paint {
    pub(crate) fn new() -> Self {
        Self {
            color: Cell::new(COLORREF(Rgb::default().to_colorref())),
            brush: Cell::new(HBRUSH::default()),
        }
    }

    pub(crate) fn color(&self) -> COLORREF {
        self.color.get()
    }

    pub(crate) fn brush(&self) -> HBRUSH {
        self.brush.get()
    }

    fn set(&self, color: Rgb) {
        let colorref = COLORREF(color.to_colorref());
        // SAFETY: CreateSolidBrush has no preconditions; a null brush on
        // failure makes WM_CTLCOLOREDIT fall back to default painting.
        let brush = unsafe { CreateSolidBrush(colorref) };
        let old = self.brush.replace(brush);
        self.color.set(colorref);
        if !old.is_invalid() {
            // SAFETY: old was created by CreateSolidBrush above and is no
            // longer handed out.
            unsafe {
                let _ = DeleteObject(HGDIOBJ(old.0));
            }
        }
    }
}

impl Drop for Paint {
    fn drop(&mut self) {
        let brush = self.brush.get();
        if !brush.is_invalid() {
            // SAFETY: the window using the brush is gone.
            unsafe {
                let _ = DeleteObject(HGDIOBJ(brush.0));
            }
        }
    }
}

// ── Win32Shell ────────────────────────────────────────────────────────────────

/// Handles to the main window's controls, plus the colour picker state.
pub(crate) struct Win32Shell {
    hwnd: HWND,
    edit: EditView,
    toolbar: HWND,
    status: HWND,
    menu: HMENU,
    paint: Rc<Paint>,
    picker: Rgb,
    custom_colors: [COLORREF; 16],
    start_maximized: bool,
}

impl Win32Shell {
    pub(crate) fn new(
        hwnd: HWND,
        edit: EditView,
        toolbar: HWND,
        status: HWND,
        menu: HMENU,
        paint: Rc<Paint>,
    ) -> Self {
        let mut custom_colors = [COLORREF(0x00FF_FFFF); 16];
        custom_colors[0] = COLORREF(Rgb::LIGHT_GRAY.to_colorref());
        Self {
            hwnd,
            edit,
            toolbar,
            status,
            menu,
            paint,
            picker: Rgb::default(),
            custom_colors,
            start_maximized: false,
        }
    }

    /// Whether the restored geometry asked for a maximized window.
    pub(crate) fn start_maximized(&self) -> bool {
        self.start_maximized
    }

    /// Run the colour dialog.  Returns `true` if it was accepted; the chosen
    /// colour is then what `picker_color` reports.
    ///
    /// `ChooseColorW` is modal, unlike the picker the controller models.  It
    /// runs from the posted WM_APP_COLOR_PICKER so `open_color_picker`
    /// still returns at once, and the colour is read only when the dialog
    /// is accepted.
    pub(crate) fn run_color_picker(&mut self) -> bool {
        match dialogs::choose_color(self.hwnd, self.picker, &mut self.custom_colors) {
            Some(color) => {
                self.picker = color;
                true
            }
            None => false,
        }
    }
}

/// Restored position and size of `hwnd`, plus whether it is maximized.
pub(crate) fn window_geometry(hwnd: HWND) -> Option<Geometry> {
    let mut wp = WINDOWPLACEMENT {
        length: std::mem::size_of::<WINDOWPLACEMENT>() as u32,
        ..Default::default()
    };
    // SAFETY: hwnd valid; wp.length is set as the API requires.
    unsafe { GetWindowPlacement(hwnd, &mut wp) }.ok()?;
    let r = wp.rcNormalPosition;
    Some(Geometry {
        x: r.left,
        y: r.top,
        width: r.right - r.left,
        height: r.bottom - r.top,
        maximized: wp.showCmd == SW_SHOWMAXIMIZED.0 as u32,
    })
}

/// Replace the text of status-bar part 0.
pub(crate) fn set_status_text(status: HWND, text: &str) {
    let wide = dialogs::wide(text);
    // SAFETY: status is a status bar child of the main window; wide is
    // null-terminated and outlives the synchronous SendMessageW.
    unsafe {
        let _ = SendMessageW(status, SB_SETTEXTW, WPARAM(0), LPARAM(wide.as_ptr() as isize));
    }
}

impl Shell for Win32Shell {
    fn text(&self) -> String {
        self.edit.text()
    }

    fn set_text(&mut self, text: &str) {
        self.edit.set_text(text);
    }

    fn has_selection(&self) -> bool {
        self.edit.has_selection()
    }

    fn cut(&mut self) -> bool {
        self.edit.cut()
    }

    fn copy(&mut self) {
        self.edit.copy_to_clipboard();
    }

    fn paste(&mut self) -> bool {
        self.edit.paste()
    }

    fn set_editor_font(&mut self, font: &FontSpec) {
        let dpi = dpi::get_for_window(self.hwnd);
        if let Err(e) = self.edit.set_font(font, dpi) {
            warn!("could not apply font {font}: {e}");
        }
    }

    fn set_editor_background(&mut self, color: Rgb) {
        self.paint.set(color);
        self.edit.repaint();
    }

    fn set_title(&mut self, title: &str) {
        let wide = dialogs::wide(title);
        // SAFETY: hwnd is the main window; wide is null-terminated.
        unsafe {
            let _ = SetWindowTextW(self.hwnd, PCWSTR(wide.as_ptr()));
        }
    }

    fn show_status(&mut self, message: &str, timeout: Option<Duration>) {
        set_status_text(self.status, message);
        // SAFETY: hwnd is the main window; the timer is owned by it and
        // handled in WM_TIMER.
        unsafe {
            match timeout {
                Some(t) => {
                    let ms = u32::try_from(t.as_millis()).unwrap_or(u32::MAX);
                    let _ = SetTimer(self.hwnd, STATUS_TIMER_ID, ms, None);
                }
                None => {
                    let _ = KillTimer(self.hwnd, STATUS_TIMER_ID);
                }
            }
        }
    }

    fn set_action_enabled(&mut self, id: ActionId, enabled: bool) {
        let cmd = id.command_id();
        let state = if enabled { MF_ENABLED } else { MF_GRAYED };
        // SAFETY: menu is the attached menu bar; unknown ids are ignored by
        // EnableMenuItem.  The toolbar ignores ids it has no button for.
        unsafe {
            let _ = EnableMenuItem(self.menu, u32::from(cmd), MF_BYCOMMAND | state);
            if actions::action(id).toolbar.is_some() {
                let _ = SendMessageW(
                    self.toolbar,
                    TB_ENABLEBUTTON,
                    WPARAM(usize::from(cmd)),
                    LPARAM(isize::from(enabled)),
                );
            }
        }
    }

    fn set_busy(&mut self, busy: bool) {
        let id = if busy { IDC_WAIT } else { IDC_ARROW };
        // SAFETY: IDC_WAIT / IDC_ARROW are built-in cursors that always load.
        unsafe {
            if let Ok(cursor) = LoadCursorW(None, id) {
                let _ = SetCursor(cursor);
            }
        }
    }

    fn geometry(&self) -> Option<Geometry> {
        window_geometry(self.hwnd)
    }

    fn restore_geometry(&mut self, geometry: Option<Geometry>) {
        let g = geometry.unwrap_or_else(|| {
            // SAFETY: GetSystemMetrics has no preconditions.
            let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
            let dpi = dpi::get_for_window(self.hwnd);
            let screen = Geometry { x: 0, y: 0, width: w, height: h, maximized: false };
            let g = Geometry::centered_default(screen);
            Geometry {
                width: g.width.max(dpi::scale(crate::settings::MIN_WIDTH, dpi)).min(w),
                height: g.height.max(dpi::scale(crate::settings::MIN_HEIGHT, dpi)).min(h),
                ..g
            }
        });
        self.start_maximized = g.maximized;
        // SAFETY: hwnd valid; a null insert-after handle is ignored with
        // SWP_NOZORDER.
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                HWND::default(),
                g.x,
                g.y,
                g.width,
                g.height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            );
        }
    }

    fn request_close(&mut self) {
        // SAFETY: posting WM_CLOSE to our own window; it is handled after the
        // current handler returns.
        unsafe {
            let _ = PostMessageW(self.hwnd, WM_CLOSE, WPARAM(0), LPARAM(0));
        }
    }

    fn ask_save_changes(&mut self) -> SaveChoice {
        dialogs::ask_save_changes(self.hwnd, APP_NAME)
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        dialogs::show_open_dialog(self.hwnd)
    }

    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        dialogs::show_save_dialog(self.hwnd, suggested_name)
    }

    fn pick_font(&mut self, current: &FontSpec) -> Option<FontSpec> {
        dialogs::choose_font(self.hwnd, current)
    }

    fn open_color_picker(&mut self, initial: Rgb) {
        self.picker = initial;
        // The modal dialog is deferred to a posted message; see
        // `run_color_picker`.
        // SAFETY: posting to our own window; WM_APP_COLOR_PICKER is handled
        // in wnd_proc once the current action handler has returned.
        unsafe {
            let _ = PostMessageW(self.hwnd, WM_APP_COLOR_PICKER, WPARAM(0), LPARAM(0));
        }
    }

    fn picker_color(&self) -> Rgb {
        self.picker
    }

    fn message(&mut self, notice: Notice, title: &str, text: &str) {
        dialogs::message_box(self.hwnd, notice, title, text);
    }
}
