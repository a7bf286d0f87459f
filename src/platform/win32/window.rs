// ── Main window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the main window class and create the top-level window.
//   • Build the menu bar, toolbar, status bar and accelerator table from the
//     action table.
//   • Own the `App` in a boxed `WindowState` stored in GWLP_USERDATA.
//   • Run the message loop and translate window messages into `App` events.
//   • Expose a safe error-dialog helper for use by main().

#![allow(unsafe_code)]

use std::{cell::RefCell, ffi::c_void, path::Path, rc::Rc};

use log::{debug, warn};
use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{GetStockObject, SetBkColor, HBRUSH, HDC, WHITE_BRUSH},
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Controls::{
                InitCommonControlsEx, ICC_BAR_CLASSES, INITCOMMONCONTROLSEX, TBBUTTON,
            },
            Input::KeyboardAndMouse::{SetFocus, VK_F4, VK_OEM_MINUS, VK_OEM_PLUS},
            WindowsAndMessaging::{
                AppendMenuW, CreateAcceleratorTableW, CreateMenu, CreateWindowExW,
                DefWindowProcW, DestroyAcceleratorTable, DestroyWindow, DispatchMessageW,
                GetClientRect, GetMessageW, GetWindowLongPtrW, GetWindowRect, KillTimer,
                LoadCursorW, LoadIconW, MessageBoxW, MoveWindow, PostMessageW, PostQuitMessage,
                RegisterClassExW, SendMessageW, SetMenu, SetWindowLongPtrW, ShowWindow,
                TranslateAcceleratorW, TranslateMessage, UpdateWindow, ACCEL, CS_HREDRAW,
                CS_VREDRAW, CW_USEDEFAULT, FALT, FCONTROL, FSHIFT, FVIRTKEY, GWLP_USERDATA,
                HACCEL, HMENU, IDC_ARROW, IDI_APPLICATION, MB_ICONERROR, MB_OK, MF_GRAYED,
                MF_POPUP, MF_SEPARATOR, MF_STRING, MINMAXINFO, MSG, SW_SHOW, SW_SHOWMAXIMIZED,
                WINDOW_EX_STYLE, WINDOW_STYLE, WM_CLOSE, WM_COMMAND, WM_CTLCOLOREDIT,
                WM_DESTROY, WM_ENDSESSION, WM_GETMINMAXINFO, WM_INITMENUPOPUP, WM_KEYUP,
                WM_LBUTTONUP, WM_MENUSELECT, WM_NCDESTROY, WM_QUERYENDSESSION, WM_SETFOCUS,
                WM_SIZE, WM_TIMER, WNDCLASSEXW, WS_CHILD, WS_OVERLAPPEDWINDOW, WS_VISIBLE,
            },
        },
    },
};

use super::{
    dialogs::wide,
    dpi,
    shell::{
        set_status_text, window_geometry, Paint, Win32Shell, STATUS_TIMER_ID,
        WM_APP_COLOR_PICKER, WM_APP_SELECTION,
    },
};
use crate::{
    actions::{self, ActionId, Key, Menu, Toolbar, ACTIONS},
    app::App,
    document::APP_NAME,
    editor::edit_control::{EditView, EN_CHANGE},
    error::{Result, RiffError},
    settings::{SettingsStore, MIN_HEIGHT, MIN_WIDTH},
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the main window class.
const CLASS_NAME: PCWSTR = w!("RiffMainWindow");

// ── Common-control constants ──────────────────────────────────────────────────
//
// Source of truth: CommCtrl.h.  Only the subset Riff sends is listed.

const TB_BUTTONSTRUCTSIZE: u32 = 0x0400 + 30;
const TB_AUTOSIZE: u32 = 0x0400 + 33;
const TB_ADDSTRINGW: u32 = 0x0400 + 77;
const TB_ADDBUTTONSW: u32 = 0x0400 + 68;
const TB_SETEXTENDEDSTYLE: u32 = 0x0400 + 84;

const TBSTYLE_TOOLTIPS: u32 = 0x0100;
const TBSTYLE_FLAT: u32 = 0x0800;
const TBSTYLE_LIST: u32 = 0x1000;
const TBSTYLE_EX_MIXEDBUTTONS: isize = 0x0008;

const BTNS_SEP: u8 = 0x01;
const BTNS_AUTOSIZE: u8 = 0x10;
const BTNS_SHOWTEXT: u8 = 0x40;
const TBSTATE_ENABLED: u8 = 0x04;
const I_IMAGENONE: i32 = -2;

const SBARS_SIZEGRIP: u32 = 0x0100;

/// `lParam` flag of WM_QUERYENDSESSION: the shutdown cannot be refused and
/// the user cannot be asked anything.
const ENDSESSION_CRITICAL: isize = 0x4000_0000;

// ── Per-window state ──────────────────────────────────────────────────────────

/// Everything the window procedure needs, owned by the window.
///
/// Child handles and the paint state live outside the `RefCell` so layout
/// and WM_CTLCOLOREDIT work while the `App` is inside a modal dialog.
struct WindowState {
    edit: HWND,
    toolbar: HWND,
    status: HWND,
    paint: Rc<Paint>,
    app: RefCell<App<Win32Shell>>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Create the main window, optionally load `file`, and drive the message loop
/// until the window is destroyed.
pub(crate) fn run(file: Option<&Path>) -> Result<()> {
    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();

    dpi::init();
    init_common_controls();

    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // valid for the process lifetime.
    let hmodule = unsafe { GetModuleHandleW(None) }?;
    let hinstance = HINSTANCE(hmodule.0);

    register_class(hinstance)?;
    let hwnd = create_window(hinstance)?;

    let menu = build_menu()?;
    // SAFETY: hwnd and menu are valid; the window takes ownership of the menu.
    unsafe { SetMenu(hwnd, menu) }?;

    let toolbar = create_toolbar(hwnd, hinstance)?;
    let status = create_status_bar(hwnd, hinstance)?;
    let edit = EditView::create(hwnd, hinstance)?;
    let edit_hwnd = edit.hwnd();

    let paint = Rc::new(Paint::new());
    let shell = Win32Shell::new(hwnd, edit, toolbar, status, menu, Rc::clone(&paint));
    let app = App::new(shell, SettingsStore::open_default());
    let maximized = app.shell().start_maximized();

    let boxed = Box::new(WindowState {
        edit: edit_hwnd,
        toolbar,
        status,
        paint,
        app: RefCell::new(app),
    });
    // SAFETY: the pointer is reclaimed exactly once, in WM_NCDESTROY.
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(boxed) as isize);
        if let Some(state) = state(hwnd) {
            layout(hwnd, state);
        }
    }

    if let Some(path) = file {
        // A failed load has already been reported; start with an empty
        // document instead.
        with_app(hwnd, |app| {
            let _ = app.load_file(path);
        });
    }

    // SAFETY: hwnd is valid.  Return values are previous visibility and a
    // success BOOL; both are unused.
    unsafe {
        let _ = ShowWindow(hwnd, if maximized { SW_SHOWMAXIMIZED } else { SW_SHOW });
        let _ = UpdateWindow(hwnd);
        let _ = SetFocus(edit_hwnd);
    }

    #[cfg(debug_assertions)]
    debug!("window visible in {:.1} ms", t0.elapsed().as_secs_f64() * 1000.0);

    let accel = build_accelerators()?;
    let result = message_loop(hwnd, edit_hwnd, accel);
    // SAFETY: accel was created above and is no longer used.
    unsafe {
        let _ = DestroyAcceleratorTable(accel);
    }
    result
}

/// Show a modal error dialog with the given message.
///
/// Used by `main()` when `run()` returns an error.
pub(crate) fn show_error_dialog(message: &str) {
    let msg_wide = wide(message);
    let title_wide = wide(&format!("{APP_NAME} - Fatal Error"));

    // SAFETY: msg_wide and title_wide are valid null-terminated UTF-16 strings
    // that remain allocated for the duration of the MessageBoxW call.
    // HWND::default() (null) means the dialog has no owner window.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── Window class registration ─────────────────────────────────────────────────

fn init_common_controls() {
    let icc = INITCOMMONCONTROLSEX {
        dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
        dwICC: ICC_BAR_CLASSES,
    };
    // SAFETY: icc is fully initialised.  Failure only means the toolbar and
    // status bar classes are missing, which create_* then reports.
    unsafe {
        let _ = InitCommonControlsEx(&icc);
    }
}

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: IDI_APPLICATION and IDC_ARROW are built-in resources.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }?;
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }?;

    // SAFETY: GetStockObject with WHITE_BRUSH always returns a valid HGDIOBJ;
    // stock brush objects are HBRUSH-compatible.
    let bg_brush = unsafe { HBRUSH(GetStockObject(WHITE_BRUSH).0) };

    let wndclass = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        hbrBackground: bg_brush,
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
        ..Default::default()
    };

    // SAFETY: wndclass is fully initialised with valid handles; CLASS_NAME
    // is a valid null-terminated UTF-16 literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }
    Ok(())
}

// ── Window and control creation ───────────────────────────────────────────────

fn create_window(hinstance: HINSTANCE) -> Result<HWND> {
    // SAFETY: CLASS_NAME was just registered; hinstance is the exe's module.
    // The real size and position are applied by the shell's
    // restore_geometry before the window is shown.
    unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            w!("Riff"),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .map_err(|_| last_error("CreateWindowExW"))
}

/// Text-only toolbar: the File group, a separator, then the Edit group.
fn create_toolbar(parent: HWND, hinstance: HINSTANCE) -> Result<HWND> {
    // SAFETY: ToolbarWindow32 is registered by InitCommonControlsEx; parent
    // and hinstance are valid.
    let toolbar = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            w!("ToolbarWindow32"),
            PCWSTR::null(),
            WS_CHILD | WS_VISIBLE | WINDOW_STYLE(TBSTYLE_FLAT | TBSTYLE_LIST | TBSTYLE_TOOLTIPS),
            0,
            0,
            0,
            0,
            parent,
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .map_err(|_| last_error("CreateWindowExW (toolbar)"))?;

    // SAFETY: toolbar is the control just created; TBBUTTON size is what the
    // control uses to interpret TB_ADDBUTTONSW.
    unsafe {
        let _ = SendMessageW(
            toolbar,
            TB_BUTTONSTRUCTSIZE,
            WPARAM(std::mem::size_of::<TBBUTTON>()),
            LPARAM(0),
        );
        let _ = SendMessageW(toolbar, TB_SETEXTENDEDSTYLE, WPARAM(0), LPARAM(TBSTYLE_EX_MIXEDBUTTONS));
    }

    let mut buttons = Vec::new();
    for (group, bar) in [Toolbar::File, Toolbar::Edit].into_iter().enumerate() {
        if group > 0 {
            buttons.push(TBBUTTON { fsStyle: BTNS_SEP, ..Default::default() });
        }
        for a in actions::on_toolbar(bar) {
            // TB_ADDSTRINGW takes a double-null-terminated list and copies it.
            let mut label = wide(&a.button_text());
            label.push(0);
            // SAFETY: label is a valid double-null-terminated UTF-16 buffer
            // that outlives the synchronous call.
            let index = unsafe {
                SendMessageW(toolbar, TB_ADDSTRINGW, WPARAM(0), LPARAM(label.as_ptr() as isize))
            };
            buttons.push(TBBUTTON {
                iBitmap: I_IMAGENONE,
                idCommand: i32::from(a.id.command_id()),
                fsState: if a.initially_enabled() { TBSTATE_ENABLED } else { 0 },
                fsStyle: BTNS_AUTOSIZE | BTNS_SHOWTEXT,
                iString: index.0,
                ..Default::default()
            });
        }
    }

    // SAFETY: buttons holds buttons.len() initialised TBBUTTONs and outlives
    // the call; the control copies them.
    unsafe {
        let _ = SendMessageW(
            toolbar,
            TB_ADDBUTTONSW,
            WPARAM(buttons.len()),
            LPARAM(buttons.as_ptr() as isize),
        );
        let _ = SendMessageW(toolbar, TB_AUTOSIZE, WPARAM(0), LPARAM(0));
    }
    Ok(toolbar)
}

fn create_status_bar(parent: HWND, hinstance: HINSTANCE) -> Result<HWND> {
    // SAFETY: msctls_statusbar32 is registered by InitCommonControlsEx; the
    // control sizes itself against the parent.
    unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            w!("msctls_statusbar32"),
            PCWSTR::null(),
            WS_CHILD | WS_VISIBLE | WINDOW_STYLE(SBARS_SIZEGRIP),
            0,
            0,
            0,
            0,
            parent,
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .map_err(|_| last_error("CreateWindowExW (status bar)"))
}

// ── Menu and accelerators ─────────────────────────────────────────────────────

fn build_menu() -> Result<HMENU> {
    // SAFETY: every wide buffer outlives the AppendMenuW call that reads it;
    // popups are owned by the bar once appended.
    unsafe {
        let bar = CreateMenu()?;
        for menu in Menu::ALL {
            let popup = CreateMenu()?;
            for a in actions::in_menu(menu) {
                if a.separator_before {
                    AppendMenuW(popup, MF_SEPARATOR, 0, PCWSTR::null())?;
                }
                let flags = if a.initially_enabled() { MF_STRING } else { MF_STRING | MF_GRAYED };
                let text = wide(&a.menu_text());
                AppendMenuW(popup, flags, usize::from(a.id.command_id()), PCWSTR(text.as_ptr()))?;
            }
            let label = wide(menu.label());
            // For MF_POPUP the item id is the child HMENU.
            AppendMenuW(bar, MF_POPUP, popup.0 as usize, PCWSTR(label.as_ptr()))?;
        }
        Ok(bar)
    }
}

/// Accelerator entries for every action shortcut.  Alt+F4 is left to the
/// system, which turns it into WM_CLOSE.
fn accelerator_entries() -> Vec<ACCEL> {
    ACTIONS
        .iter()
        .filter_map(|a| {
            let s = a.shortcut?;
            let key = match s.key {
                Key::F4 if s.alt => return None,
                Key::F4 => VK_F4.0,
                Key::Char('+') => VK_OEM_PLUS.0,
                Key::Char('-') => VK_OEM_MINUS.0,
                Key::Char(c) => c.to_ascii_uppercase() as u16,
            };
            let mut flags = FVIRTKEY;
            if s.ctrl {
                flags |= FCONTROL;
            }
            if s.shift {
                flags |= FSHIFT;
            }
            if s.alt {
                flags |= FALT;
            }
            Some(ACCEL { fVirt: flags, key, cmd: a.id.command_id() })
        })
        .collect()
}

fn build_accelerators() -> Result<HACCEL> {
    let entries = accelerator_entries();
    // SAFETY: entries is a valid slice of initialised ACCELs; the table
    // copies it.
    unsafe { CreateAcceleratorTableW(&entries) }.map_err(|_| last_error("CreateAcceleratorTableW"))
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop(hwnd: HWND, edit: HWND, accel: HACCEL) -> Result<()> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

        match ret.0 {
            -1 => return Err(last_error("GetMessageW")),
            0 => break,
            // SAFETY: msg was populated by a successful GetMessageW call.
            _ => unsafe {
                if TranslateAcceleratorW(hwnd, accel, &msg) != 0 {
                    continue;
                }
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);

                // EDIT has no selection-change notification; re-check after
                // any input that can move the selection.
                if msg.hwnd == edit && matches!(msg.message, WM_KEYUP | WM_LBUTTONUP) {
                    let _ = PostMessageW(hwnd, WM_APP_SELECTION, WPARAM(0), LPARAM(0));
                }
            },
        }
    }

    Ok(())
}

// ── State access ──────────────────────────────────────────────────────────────

/// The `WindowState` attached to `hwnd`, if it has been installed.
///
/// # Safety
/// Must be called on the UI thread between installation in `run` and
/// reclamation in WM_NCDESTROY.
unsafe fn state<'a>(hwnd: HWND) -> Option<&'a WindowState> {
    let ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const WindowState;
    ptr.as_ref()
}

/// Run `f` against the `App`, unless it is already borrowed by a handler
/// further up the stack (re-entrant message from a modal loop).
fn with_app<R>(hwnd: HWND, f: impl FnOnce(&mut App<Win32Shell>) -> R) -> Option<R> {
    // SAFETY: called from wnd_proc or run on the UI thread.
    let state = unsafe { state(hwnd) }?;
    match state.app.try_borrow_mut() {
        Ok(mut app) => Some(f(&mut app)),
        Err(_) => {
            debug!("re-entrant message ignored");
            None
        }
    }
}

/// Answer to WM_QUERYENDSESSION.  `verdict` is `None` when the `App` was
/// busy in a dialog: an interactive end is then refused, since the save
/// prompt cannot run; a critical one cannot be refused anyway.
fn end_session_reply(interactive: bool, verdict: Option<bool>) -> bool {
    verdict.unwrap_or(!interactive)
}

fn loword(v: usize) -> u16 {
    (v & 0xFFFF) as u16
}

fn hiword(v: usize) -> u16 {
    ((v >> 16) & 0xFFFF) as u16
}

fn hwnd_from(lparam: LPARAM) -> HWND {
    HWND(lparam.0 as *mut c_void)
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Toolbar on top, status bar at the bottom, EDIT fills the rest.
fn layout(hwnd: HWND, state: &WindowState) {
    // SAFETY: all handles are children of hwnd, which is alive.
    unsafe {
        let _ = SendMessageW(state.toolbar, TB_AUTOSIZE, WPARAM(0), LPARAM(0));
        let _ = SendMessageW(state.status, WM_SIZE, WPARAM(0), LPARAM(0));

        let mut client = RECT::default();
        let mut tb = RECT::default();
        let mut sb = RECT::default();
        if GetClientRect(hwnd, &mut client).is_err()
            || GetWindowRect(state.toolbar, &mut tb).is_err()
            || GetWindowRect(state.status, &mut sb).is_err()
        {
            return;
        }
        let top = tb.bottom - tb.top;
        let bottom = sb.bottom - sb.top;
        let height = (client.bottom - top - bottom).max(0);
        let _ = MoveWindow(state.edit, 0, top, client.right, height, true);
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.  Windows
// guarantees the parameters are valid for the duration of the call.
unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let Some(state) = state(hwnd) else {
        // Messages sent during CreateWindowExW, before the state exists.
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };

    match msg {
        // ── Commands ──────────────────────────────────────────────────────────
        WM_COMMAND => {
            if hwnd_from(lparam) == state.edit {
                if u32::from(hiword(wparam.0)) == EN_CHANGE {
                    with_app(hwnd, |app| app.contents_changed());
                }
                return LRESULT(0);
            }
            match ActionId::from_command_id(loword(wparam.0)) {
                Some(id) => {
                    with_app(hwnd, |app| app.trigger(id));
                    LRESULT(0)
                }
                None => DefWindowProcW(hwnd, msg, wparam, lparam),
            }
        }

        WM_APP_SELECTION => {
            with_app(hwnd, |app| app.selection_changed());
            LRESULT(0)
        }

        WM_INITMENUPOPUP => {
            with_app(hwnd, |app| app.selection_changed());
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_APP_COLOR_PICKER => {
            // ChooseColorW is modal, so it runs here rather than inside the
            // action; the App reads the colour once the dialog is accepted.
            with_app(hwnd, |app| {
                let accepted = app.shell_mut().run_color_picker();
                app.color_dialog_finished(accepted);
            });
            LRESULT(0)
        }

        // ── Status bar ────────────────────────────────────────────────────────
        WM_MENUSELECT => {
            let id = loword(wparam.0);
            let flags = hiword(wparam.0);
            if flags == 0xFFFF && lparam.0 == 0 {
                // Menu closed.
                set_status_text(state.status, "");
            } else if let Some(id) = ActionId::from_command_id(id) {
                set_status_text(state.status, actions::action(id).status_tip);
            }
            LRESULT(0)
        }

        WM_TIMER if wparam.0 == STATUS_TIMER_ID => {
            let _ = KillTimer(hwnd, STATUS_TIMER_ID);
            set_status_text(state.status, "");
            LRESULT(0)
        }

        // ── Appearance and layout ─────────────────────────────────────────────
        WM_CTLCOLOREDIT if hwnd_from(lparam) == state.edit && !state.paint.brush().is_invalid() => {
            let hdc = HDC(wparam.0 as *mut c_void);
            let _ = SetBkColor(hdc, state.paint.color());
            LRESULT(state.paint.brush().0 as isize)
        }

        WM_SIZE => {
            layout(hwnd, state);
            LRESULT(0)
        }

        WM_GETMINMAXINFO => {
            let dpi = dpi::get_for_window(hwnd);
            // SAFETY: for WM_GETMINMAXINFO lparam points at a MINMAXINFO the
            // system owns for the duration of the message.
            if let Some(info) = (lparam.0 as *mut MINMAXINFO).as_mut() {
                info.ptMinTrackSize.x = dpi::scale(MIN_WIDTH, dpi);
                info.ptMinTrackSize.y = dpi::scale(MIN_HEIGHT, dpi);
            }
            LRESULT(0)
        }

        WM_SETFOCUS => {
            let _ = SetFocus(state.edit);
            LRESULT(0)
        }

        // ── Lifecycle ─────────────────────────────────────────────────────────
        WM_CLOSE => {
            // A vetoed close, or a close arriving while a dialog is up, keeps
            // the window.
            if with_app(hwnd, |app| app.close_requested()).unwrap_or(false) {
                let _ = DestroyWindow(hwnd);
            }
            LRESULT(0)
        }

        WM_QUERYENDSESSION => {
            let interactive = lparam.0 & ENDSESSION_CRITICAL == 0;
            let verdict = with_app(hwnd, |app| app.commit_data(interactive));
            LRESULT(isize::from(end_session_reply(interactive, verdict)))
        }

        WM_ENDSESSION => {
            if wparam.0 != 0 && with_app(hwnd, |app| app.end_session()).is_none() {
                // A dialog still holds the App; store the geometry directly.
                if let Some(g) = window_geometry(hwnd) {
                    if let Err(e) = SettingsStore::open_default().save_geometry(g) {
                        warn!("could not store window geometry: {e}");
                    }
                }
            }
            LRESULT(0)
        }

        WM_DESTROY => {
            PostQuitMessage(0);
            LRESULT(0)
        }

        WM_NCDESTROY => {
            let ptr = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut WindowState;
            if ptr.is_null() {
                warn!("window state already released");
            } else {
                // SAFETY: ptr came from Box::into_raw in run and has just been
                // detached from the window, so this is the only release.
                drop(Box::from_raw(ptr));
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `RiffError`.
///
/// Call immediately after the failing Win32 function: `GetLastError` reads
/// thread-local state that any subsequent API call can overwrite.
fn last_error(function: &'static str) -> RiffError {
    // SAFETY: GetLastError reads thread-local state and never fails.
    let code = unsafe { GetLastError() };
    RiffError::Win32 { function, code: code.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accelerators_cover_shortcuts_except_alt_f4() {
        let entries = accelerator_entries();
        let with_shortcut = ACTIONS.iter().filter(|a| a.shortcut.is_some()).count();
        assert_eq!(entries.len(), with_shortcut - 1);
        assert!(entries.iter().all(|e| e.cmd != ActionId::Exit.command_id()));
    }

    #[test]
    fn zoom_shortcuts_use_oem_keys() {
        let entries = accelerator_entries();
        let zoom_in = entries.iter().find(|e| e.cmd == ActionId::ZoomIn.command_id());
        assert_eq!(zoom_in.map(|e| e.key), Some(VK_OEM_PLUS.0));
        let zoom_out = entries.iter().find(|e| e.cmd == ActionId::ZoomOut.command_id());
        assert_eq!(zoom_out.map(|e| e.key), Some(VK_OEM_MINUS.0));
    }

    #[test]
    fn busy_app_refuses_interactive_session_end() {
        assert!(!end_session_reply(true, None));
        assert!(end_session_reply(false, None));
        assert!(end_session_reply(true, Some(true)));
        assert!(!end_session_reply(true, Some(false)));
    }

    #[test]
    fn word_helpers_split_wparam() {
        assert_eq!(loword(0x0300_03E9), 0x03E9);
        assert_eq!(hiword(0x0300_03E9), 0x0300);
    }
}
