// ── Application controller ────────────────────────────────────────────────────
//
// A single `App` is created on startup and owned by the window for its whole
// lifetime.  It owns the document state and reacts to events delivered by
// the shell: triggered actions, content and selection changes, close
// requests and session-end queries.  All mutations happen on the UI thread; there
// is no global mutable state.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use log::{debug, info, warn};

use crate::{
    actions::{ActionId, ACTIONS},
    document::{self, DocumentState, APP_NAME},
    error::Result,
    platform::{Notice, SaveChoice, Shell},
    settings::{Geometry, SettingsStore},
    theme::{FontSpec, Rgb},
};

/// How long transient status-bar messages stay visible.
const STATUS_TIMEOUT: Duration = Duration::from_millis(2000);

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Result of the save prompt: may the caller discard the current text?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    Proceed,
    Abort,
}

/// Result of Save / Save As.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SaveOutcome {
    Saved,
    /// The user dismissed the file dialog.  Not an error.
    Cancelled,
    /// Writing failed; the user has already been warned.
    Failed,
}

impl SaveOutcome {
    pub(crate) fn is_saved(self) -> bool {
        self == SaveOutcome::Saved
    }
}

// ── Dispatch table ────────────────────────────────────────────────────────────

/// Handler invoked when an action is triggered.
pub(crate) type Handler<S> = fn(&mut App<S>);

fn dispatch_table<S: Shell>() -> HashMap<ActionId, Handler<S>> {
    let entries: [(ActionId, Handler<S>); 14] = [
        (ActionId::New, App::new_file),
        (ActionId::Open, App::open),
        (ActionId::Save, |app: &mut App<S>| {
            app.save();
        }),
        (ActionId::SaveAs, |app: &mut App<S>| {
            app.save_as();
        }),
        (ActionId::Exit, App::exit),
        (ActionId::Cut, App::cut),
        (ActionId::Copy, App::copy),
        (ActionId::Paste, App::paste),
        (ActionId::ZoomIn, App::zoom_in),
        (ActionId::ZoomOut, App::zoom_out),
        (ActionId::Font, App::change_font),
        (ActionId::BackgroundColor, App::change_background),
        (ActionId::Preferences, App::preferences),
        (ActionId::About, App::about),
    ];
    entries.into_iter().collect()
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Top-level application state, generic over the toolkit it drives.
pub(crate) struct App<S: Shell> {
    shell: S,
    doc: DocumentState,
    settings: SettingsStore,
    font: FontSpec,
    background: Rgb,
    handlers: HashMap<ActionId, Handler<S>>,
}

impl<S: Shell> App<S> {
    /// Wire up a controller for a freshly created window: apply the default
    /// appearance, restore the saved geometry and show an untitled document.
    pub(crate) fn new(shell: S, settings: SettingsStore) -> Self {
        let mut app = Self {
            shell,
            doc: DocumentState::new_untitled(),
            settings,
            font: FontSpec::default(),
            background: Rgb::default(),
            handlers: dispatch_table(),
        };

        app.shell.set_editor_font(&app.font);
        app.shell.set_editor_background(app.background);
        for a in &ACTIONS {
            app.shell.set_action_enabled(a.id, a.initially_enabled());
        }
        app.shell.show_status("Ready", None);

        let geometry = app.settings.load_geometry().map(Geometry::at_least_minimum);
        debug!("restoring geometry {geometry:?}");
        app.shell.restore_geometry(geometry);

        app.set_current_file(None);
        app
    }

    pub(crate) fn shell(&self) -> &S {
        &self.shell
    }

    pub(crate) fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub(crate) fn document(&self) -> &DocumentState {
        &self.doc
    }

    pub(crate) fn font(&self) -> &FontSpec {
        &self.font
    }

    pub(crate) fn background(&self) -> Rgb {
        self.background
    }

    // ── Event entry points ────────────────────────────────────────────────────

    /// Run the handler bound to `id`.  Returns `false` if nothing is bound.
    pub(crate) fn trigger(&mut self, id: ActionId) -> bool {
        match self.handlers.get(&id).copied() {
            Some(handler) => {
                debug!("action {id:?}");
                handler(self);
                true
            }
            None => false,
        }
    }

    /// The text surface reported an edit.
    pub(crate) fn contents_changed(&mut self) {
        if !self.doc.dirty {
            self.doc.dirty = true;
            self.shell.set_title(&self.doc.window_title());
        }
        self.selection_changed();
    }

    /// The selection may have changed: re-read it from the surface and update
    /// every selection-dependent action.
    pub(crate) fn selection_changed(&mut self) {
        let available = self.shell.has_selection();
        for a in ACTIONS.iter().filter(|a| a.needs_selection) {
            self.shell.set_action_enabled(a.id, available);
        }
    }

    /// The window is about to close.  Returns `false` to veto the close.
    pub(crate) fn close_requested(&mut self) -> bool {
        if self.maybe_save() == Gate::Abort {
            info!("close cancelled");
            return false;
        }
        self.write_settings();
        info!("closing");
        true
    }

    /// The session manager asks whether the session may end.  Returns `false`
    /// to cancel the shutdown.
    ///
    /// Without interaction there is nobody to ask, so a dirty document is
    /// saved unconditionally.  An untitled one goes to the recovery file and
    /// stays dirty.
    pub(crate) fn commit_data(&mut self, interaction_allowed: bool) -> bool {
        if interaction_allowed {
            if self.maybe_save() == Gate::Abort {
                info!("session end cancelled by user");
                return false;
            }
        } else if self.doc.dirty {
            match self.doc.path.clone() {
                Some(path) => {
                    info!("session ending, saving {} without prompt", path.display());
                    self.save_file(path);
                }
                None => self.write_recovery(),
            }
        }
        true
    }

    /// The session is ending for real; the window will be torn down without
    /// a close request.
    pub(crate) fn end_session(&mut self) {
        self.write_settings();
    }

    // ── File actions ──────────────────────────────────────────────────────────

    pub(crate) fn new_file(&mut self) {
        if self.maybe_save() == Gate::Proceed {
            self.shell.set_text("");
            self.set_current_file(None);
            self.selection_changed();
        }
    }

    pub(crate) fn open(&mut self) {
        if self.maybe_save() == Gate::Abort {
            return;
        }
        if let Some(path) = self.shell.pick_open_path() {
            // Failure has already been reported to the user.
            let _ = self.load_file(&path);
        }
    }

    /// Replace the document with the contents of `path`.
    ///
    /// On failure a warning is shown and the current document is left as it
    /// was; the error is also returned for the caller's benefit.
    pub(crate) fn load_file(&mut self, path: &Path) -> Result<()> {
        self.shell.set_busy(true);
        let read = document::read_text(path);
        self.shell.set_busy(false);

        let text = match read {
            Ok(text) => text,
            Err(e) => {
                warn!("{e}");
                self.shell.message(Notice::Warning, APP_NAME, &e.to_string());
                return Err(e);
            }
        };

        self.shell.set_text(&text);
        self.set_current_file(Some(path.to_path_buf()));
        self.selection_changed();
        info!("loaded {} ({} bytes)", path.display(), text.len());
        self.shell.show_status("File loaded", Some(STATUS_TIMEOUT));
        Ok(())
    }

    /// Save to the current path, or ask for one if the document is untitled.
    ///
    /// A clean document that already has a path is reported as saved without
    /// touching the disk.
    pub(crate) fn save(&mut self) -> SaveOutcome {
        match self.doc.path.clone() {
            Some(_) if !self.doc.dirty => SaveOutcome::Saved,
            Some(path) => self.save_file(path),
            None => self.save_as(),
        }
    }

    pub(crate) fn save_as(&mut self) -> SaveOutcome {
        let suggested = self.doc.display_name();
        match self.shell.pick_save_path(&suggested) {
            Some(path) => self.save_file(path),
            None => {
                debug!("save as cancelled");
                SaveOutcome::Cancelled
            }
        }
    }

    fn save_file(&mut self, path: PathBuf) -> SaveOutcome {
        let text = self.shell.text();
        self.shell.set_busy(true);
        let written = document::write_text(&path, &text);
        self.shell.set_busy(false);

        if let Err(e) = written {
            warn!("{e}");
            self.shell.message(Notice::Warning, APP_NAME, &e.to_string());
            return SaveOutcome::Failed;
        }

        info!("saved {} ({} bytes)", path.display(), text.len());
        self.set_current_file(Some(path));
        self.shell.show_status("File saved", Some(STATUS_TIMEOUT));
        SaveOutcome::Saved
    }

    /// Ask before discarding unsaved changes.
    pub(crate) fn maybe_save(&mut self) -> Gate {
        if !self.doc.dirty {
            return Gate::Proceed;
        }
        let choice = self.shell.ask_save_changes();
        debug!("save prompt answered {choice:?}");
        match choice {
            SaveChoice::Save if self.save().is_saved() => Gate::Proceed,
            SaveChoice::Save | SaveChoice::Cancel => Gate::Abort,
            SaveChoice::Discard => Gate::Proceed,
        }
    }

    pub(crate) fn exit(&mut self) {
        self.shell.request_close();
    }

    fn set_current_file(&mut self, path: Option<PathBuf>) {
        self.doc.set_current_file(path);
        self.shell.set_title(&self.doc.window_title());
    }

    fn write_recovery(&mut self) {
        let Some(path) = self.settings.recovery_path() else {
            warn!("session ending with unsaved untitled document, nowhere to keep it");
            return;
        };
        if let Some(dir) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                warn!("could not create {}: {e}", dir.display());
                return;
            }
        }
        match document::write_text(&path, &self.shell.text()) {
            Ok(()) => info!("session ending, untitled document kept in {}", path.display()),
            Err(e) => warn!("{e}"),
        }
    }

    fn write_settings(&mut self) {
        let Some(geometry) = self.shell.geometry() else {
            return;
        };
        if let Err(e) = self.settings.save_geometry(geometry) {
            warn!("could not store window geometry: {e}");
        }
    }

    // ── Edit actions ──────────────────────────────────────────────────────────

    pub(crate) fn cut(&mut self) {
        if self.shell.cut() {
            self.contents_changed();
        } else {
            self.selection_changed();
        }
    }

    pub(crate) fn copy(&mut self) {
        self.shell.copy();
    }

    pub(crate) fn paste(&mut self) {
        if self.shell.paste() {
            self.contents_changed();
        }
    }

    pub(crate) fn zoom_in(&mut self) {
        self.apply_font(self.font.zoomed_in());
    }

    pub(crate) fn zoom_out(&mut self) {
        self.apply_font(self.font.zoomed_out());
    }

    pub(crate) fn change_font(&mut self) {
        if let Some(font) = self.shell.pick_font(&self.font) {
            self.apply_font(font);
        }
    }

    fn apply_font(&mut self, font: FontSpec) {
        debug!("font {font}");
        self.shell.set_editor_font(&font);
        self.font = font;
    }

    /// Open the colour picker.  The colour is applied by
    /// `color_dialog_finished` once the picker is accepted.
    pub(crate) fn change_background(&mut self) {
        self.shell.open_color_picker(self.background);
    }

    /// The colour picker closed.  On accept, the colour selected in the
    /// picker *now* becomes the background.
    pub(crate) fn color_dialog_finished(&mut self, accepted: bool) {
        if !accepted {
            return;
        }
        let color = self.shell.picker_color();
        debug!("background {color}");
        self.shell.set_editor_background(color);
        self.background = color;
    }

    // ── Informational dialogs ─────────────────────────────────────────────────

    pub(crate) fn preferences(&mut self) {
        let settings_path = self
            .settings
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_owned());
        let text = format!(
            "Font: {}\nBackground: {}\nSettings file: {settings_path}",
            self.font, self.background
        );
        self.shell.message(Notice::Information, "Preferences", &text);
    }

    pub(crate) fn about(&mut self) {
        let text = format!(
            "{APP_NAME} {}\n\nRiff is a small plain-text editor with a menu bar, \
             toolbars, and a status bar.",
            env!("CARGO_PKG_VERSION")
        );
        self.shell.message(Notice::Information, "About Riff", &text);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
