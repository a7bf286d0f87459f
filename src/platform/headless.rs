// ── Scripted headless shell ───────────────────────────────────────────────────
//
// A `Shell` with no window behind it.  Dialog answers are queued up front by
// the test; everything the controller shows is recorded for assertions.  A
// dialog with no queued answer panics, which is how tests catch prompts that
// should never have appeared.

use std::{collections::HashMap, collections::VecDeque, path::PathBuf, time::Duration};

use super::{Notice, SaveChoice, Shell};
use crate::{
    actions::ActionId,
    settings::Geometry,
    theme::{FontSpec, Rgb},
};

#[derive(Debug, Default)]
pub(crate) struct HeadlessShell {
    // Text surface
    pub(crate) text: String,
    /// Selected byte range, `start..end`.
    pub(crate) selection: Option<(usize, usize)>,
    pub(crate) clipboard: String,
    pub(crate) font: Option<FontSpec>,
    pub(crate) background: Option<Rgb>,

    // Chrome
    pub(crate) title: String,
    pub(crate) statuses: Vec<(String, Option<Duration>)>,
    pub(crate) enabled: HashMap<ActionId, bool>,
    pub(crate) busy_calls: Vec<bool>,
    pub(crate) window: Option<Geometry>,
    pub(crate) restored: Vec<Option<Geometry>>,
    pub(crate) close_requests: usize,

    // Dialogs
    pub(crate) save_choices: VecDeque<SaveChoice>,
    pub(crate) open_paths: VecDeque<Option<PathBuf>>,
    pub(crate) save_paths: VecDeque<Option<PathBuf>>,
    pub(crate) fonts: VecDeque<Option<FontSpec>>,
    pub(crate) picker: Rgb,
    pub(crate) picker_opened_with: Vec<Rgb>,
    pub(crate) prompts_shown: usize,
    pub(crate) suggested_names: Vec<String>,
    pub(crate) messages: Vec<(Notice, String, String)>,
}

impl HeadlessShell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append `s` at the end of the text, as if typed.  The caller still has
    /// to deliver the content-change notification to the controller.
    pub(crate) fn type_text(&mut self, s: &str) {
        self.text.push_str(s);
        self.selection = None;
    }

    pub(crate) fn select(&mut self, start: usize, end: usize) {
        self.selection = Some((start, end));
    }

    pub(crate) fn warnings(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(n, _, _)| *n == Notice::Warning)
            .map(|(_, _, text)| text.as_str())
            .collect()
    }

    pub(crate) fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(|(s, _)| s.as_str())
    }

    fn take_selection(&mut self) -> Option<String> {
        let (start, end) = self.selection.take()?;
        let taken: String = self.text[start..end].to_owned();
        self.text.replace_range(start..end, "");
        Some(taken)
    }
}

impl Shell for HeadlessShell {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.selection = None;
    }

    fn has_selection(&self) -> bool {
        matches!(self.selection, Some((start, end)) if end > start)
    }

    fn cut(&mut self) -> bool {
        match self.take_selection() {
            Some(taken) if !taken.is_empty() => {
                self.clipboard = taken;
                true
            }
            _ => false,
        }
    }

    fn copy(&mut self) {
        if let Some((start, end)) = self.selection {
            self.clipboard = self.text[start..end].to_owned();
        }
    }

    fn paste(&mut self) -> bool {
        let before = self.text.clone();
        let at = match self.selection {
            Some((start, _)) => {
                self.take_selection();
                start
            }
            None => self.text.len(),
        };
        let clip = self.clipboard.clone();
        self.text.insert_str(at, &clip);
        self.text != before
    }

    fn set_editor_font(&mut self, font: &FontSpec) {
        self.font = Some(font.clone());
    }

    fn set_editor_background(&mut self, color: Rgb) {
        self.background = Some(color);
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    fn show_status(&mut self, message: &str, timeout: Option<Duration>) {
        self.statuses.push((message.to_owned(), timeout));
    }

    fn set_action_enabled(&mut self, id: ActionId, enabled: bool) {
        self.enabled.insert(id, enabled);
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy_calls.push(busy);
    }

    fn geometry(&self) -> Option<Geometry> {
        self.window
    }

    fn restore_geometry(&mut self, geometry: Option<Geometry>) {
        self.restored.push(geometry);
        if geometry.is_some() {
            self.window = geometry;
        }
    }

    fn request_close(&mut self) {
        self.close_requests += 1;
    }

    fn ask_save_changes(&mut self) -> SaveChoice {
        self.prompts_shown += 1;
        self.save_choices
            .pop_front()
            .expect("save prompt shown without a scripted answer")
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        self.open_paths
            .pop_front()
            .expect("open dialog shown without a scripted answer")
    }

    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        self.suggested_names.push(suggested_name.to_owned());
        self.save_paths
            .pop_front()
            .expect("save dialog shown without a scripted answer")
    }

    fn pick_font(&mut self, _current: &FontSpec) -> Option<FontSpec> {
        self.fonts
            .pop_front()
            .expect("font dialog shown without a scripted answer")
    }

    fn open_color_picker(&mut self, initial: Rgb) {
        self.picker_opened_with.push(initial);
        self.picker = initial;
    }

    fn picker_color(&self) -> Rgb {
        self.picker
    }

    fn message(&mut self, notice: Notice, title: &str, text: &str) {
        self.messages.push((notice, title.to_owned(), text.to_owned()));
    }
}
