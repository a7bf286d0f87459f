// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface the controller uses to talk to the
// windowing toolkit.  No `unsafe` lives here; all Win32 FFI is confined to the
// `win32` sub-module and never leaks outward.  Tests drive the controller
// through the scripted `headless` shell instead.

use std::{path::PathBuf, time::Duration};

use crate::{
    actions::ActionId,
    settings::Geometry,
    theme::{FontSpec, Rgb},
};

#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub(crate) mod headless;

/// Answer to the "document has been modified" question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// Severity of a message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notice {
    Information,
    Warning,
}

/// The toolkit as seen by the controller: the text surface, the window
/// chrome, and the standard dialogs.
///
/// All calls happen on the UI thread.  Dialog methods block until the user
/// answers, except `open_color_picker`, whose result arrives later through
/// `App::color_dialog_finished`.
pub(crate) trait Shell {
    // ── Text surface ──────────────────────────────────────────────────────────

    /// Full text with `\n` line endings.
    fn text(&self) -> String;
    /// Replace the whole text.  Must not report a content change back to the
    /// controller.
    fn set_text(&mut self, text: &str);
    /// `true` while a non-empty range is selected.
    fn has_selection(&self) -> bool;
    /// Cut the selection to the clipboard.  Returns `true` if the text
    /// changed.
    fn cut(&mut self) -> bool;
    fn copy(&mut self);
    /// Paste the clipboard over the selection.  Returns `true` if the text
    /// changed.
    fn paste(&mut self) -> bool;
    fn set_editor_font(&mut self, font: &FontSpec);
    fn set_editor_background(&mut self, color: Rgb);

    // ── Window chrome ─────────────────────────────────────────────────────────

    fn set_title(&mut self, title: &str);
    /// Show `message` in the status bar, cleared after `timeout` if given.
    fn show_status(&mut self, message: &str, timeout: Option<Duration>);
    fn set_action_enabled(&mut self, id: ActionId, enabled: bool);
    /// Show or hide the busy cursor.
    fn set_busy(&mut self, busy: bool);
    /// Current window placement, if the window exists.
    fn geometry(&self) -> Option<Geometry>;
    /// Move and size the window; `None` means "pick the default placement".
    fn restore_geometry(&mut self, geometry: Option<Geometry>);
    /// Ask the toolkit to close the window.  The close request comes back
    /// through `App::close_requested`.
    fn request_close(&mut self);

    // ── Dialogs ───────────────────────────────────────────────────────────────

    fn ask_save_changes(&mut self) -> SaveChoice;
    fn pick_open_path(&mut self) -> Option<PathBuf>;
    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf>;
    fn pick_font(&mut self, current: &FontSpec) -> Option<FontSpec>;
    /// Show the colour picker seeded with `initial` and return immediately.
    fn open_color_picker(&mut self, initial: Rgb);
    /// The colour currently selected in the picker.
    fn picker_color(&self) -> Rgb;
    fn message(&mut self, notice: Notice, title: &str, text: &str);
}
