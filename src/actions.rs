// ── UI actions ────────────────────────────────────────────────────────────────
//
// Stateless descriptors for every menu / toolbar / accelerator command, and
// the command-id mapping used by the Win32 shell.  The handlers live in
// `app::App`'s dispatch table; nothing here knows how an action is carried
// out.

use std::fmt;

/// Identifier of a user-triggerable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ActionId {
    New,
    Open,
    Save,
    SaveAs,
    Exit,
    Cut,
    Copy,
    Paste,
    ZoomIn,
    ZoomOut,
    Font,
    BackgroundColor,
    Preferences,
    About,
}

/// Top-level menu an action lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Menu {
    File,
    Edit,
    Preferences,
    Help,
}

impl Menu {
    pub(crate) const ALL: [Menu; 4] = [Menu::File, Menu::Edit, Menu::Preferences, Menu::Help];

    /// Menu-bar label with the mnemonic marker.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Menu::File => "&File",
            Menu::Edit => "&Edit",
            Menu::Preferences => "&Preferences",
            Menu::Help => "&Help",
        }
    }
}

/// Toolbar an action is placed on, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Toolbar {
    File,
    Edit,
}

/// Keyboard shortcut.  `key` is an uppercase ASCII letter, or one of the
/// ASCII punctuation keys `+` / `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Shortcut {
    pub(crate) ctrl: bool,
    pub(crate) shift: bool,
    pub(crate) alt: bool,
    pub(crate) key: Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Key {
    Char(char),
    F4,
}

impl Shortcut {
    const fn ctrl(c: char) -> Self {
        Self { ctrl: true, shift: false, alt: false, key: Key::Char(c) }
    }

    const fn ctrl_shift(c: char) -> Self {
        Self { ctrl: true, shift: true, alt: false, key: Key::Char(c) }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            Key::F4 => f.write_str("F4"),
        }
    }
}

/// Everything the shell needs to present an action.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Action {
    pub(crate) id: ActionId,
    /// Menu text with `&` mnemonic.
    pub(crate) label: &'static str,
    /// Freedesktop icon-theme name, also used as the toolbar tooltip key.
    pub(crate) icon: Option<&'static str>,
    pub(crate) shortcut: Option<Shortcut>,
    pub(crate) status_tip: &'static str,
    pub(crate) menu: Menu,
    pub(crate) toolbar: Option<Toolbar>,
    /// Draw a separator above this entry in its menu.
    pub(crate) separator_before: bool,
    /// Enabled only while the text surface has a selection.
    pub(crate) needs_selection: bool,
}

impl Action {
    /// Whether the action starts out enabled.  Selection-dependent actions
    /// start disabled; there is no selection in an empty document.
    pub(crate) fn initially_enabled(&self) -> bool {
        !self.needs_selection
    }

    /// Menu text including the shortcut hint, e.g. `"&Save\tCtrl+S"`.
    pub(crate) fn menu_text(&self) -> String {
        match self.shortcut {
            Some(s) => format!("{}\t{s}", self.label),
            None => self.label.to_owned(),
        }
    }

    /// Plain label for toolbar buttons: mnemonics and ellipsis removed.
    pub(crate) fn button_text(&self) -> String {
        self.label.replace('&', "").trim_end_matches("...").to_owned()
    }
}

// ── Action table ──────────────────────────────────────────────────────────────

/// All actions in menu order.  Entries follow `ActionId` declaration order,
/// so an id's discriminant is its index.
pub(crate) static ACTIONS: [Action; 14] = [
    Action {
        id: ActionId::New,
        label: "&New",
        icon: Some("document-new"),
        shortcut: Some(Shortcut::ctrl('N')),
        status_tip: "Create a new file",
        menu: Menu::File,
        toolbar: Some(Toolbar::File),
        separator_before: false,
        needs_selection: false,
    },
    Action {
        id: ActionId::Open,
        label: "&Open...",
        icon: Some("document-open"),
        shortcut: Some(Shortcut::ctrl('O')),
        status_tip: "Open an existing file",
        menu: Menu::File,
        toolbar: Some(Toolbar::File),
        separator_before: false,
        needs_selection: false,
    },
    Action {
        id: ActionId::Save,
        label: "&Save",
        icon: Some("document-save"),
        shortcut: Some(Shortcut::ctrl('S')),
        status_tip: "Save the document to disk",
        menu: Menu::File,
        toolbar: Some(Toolbar::File),
        separator_before: false,
        needs_selection: false,
    },
    Action {
        id: ActionId::SaveAs,
        label: "Save &As...",
        icon: Some("document-save-as"),
        shortcut: Some(Shortcut::ctrl_shift('S')),
        status_tip: "Save the document under a new name",
        menu: Menu::File,
        toolbar: Some(Toolbar::File),
        separator_before: false,
        needs_selection: false,
    },
    Action {
        id: ActionId::Exit,
        label: "E&xit",
        icon: Some("application-exit"),
        shortcut: Some(Shortcut { ctrl: false, shift: false, alt: true, key: Key::F4 }),
        status_tip: "Exit the application",
        menu: Menu::File,
        toolbar: None,
        separator_before: true,
        needs_selection: false,
    },
    Action {
        id: ActionId::Cut,
        label: "Cu&t",
        icon: Some("edit-cut"),
        shortcut: Some(Shortcut::ctrl('X')),
        status_tip: "Cut the current selection's contents to the clipboard",
        menu: Menu::Edit,
        toolbar: Some(Toolbar::Edit),
        separator_before: false,
        needs_selection: true,
    },
    Action {
        id: ActionId::Copy,
        label: "&Copy",
        icon: Some("edit-copy"),
        shortcut: Some(Shortcut::ctrl('C')),
        status_tip: "Copy the current selection's contents to the clipboard",
        menu: Menu::Edit,
        toolbar: Some(Toolbar::Edit),
        separator_before: false,
        needs_selection: true,
    },
    Action {
        id: ActionId::Paste,
        label: "&Paste",
        icon: Some("edit-paste"),
        shortcut: Some(Shortcut::ctrl('V')),
        status_tip: "Paste the clipboard's contents into the current selection",
        menu: Menu::Edit,
        toolbar: Some(Toolbar::Edit),
        separator_before: false,
        needs_selection: false,
    },
    Action {
        id: ActionId::ZoomIn,
        label: "&Zoom In",
        icon: Some("zoom-in"),
        shortcut: Some(Shortcut::ctrl('+')),
        status_tip: "Text zoom in",
        menu: Menu::Edit,
        toolbar: Some(Toolbar::Edit),
        separator_before: true,
        needs_selection: false,
    },
    Action {
        id: ActionId::ZoomOut,
        label: "Zoom &Out",
        icon: Some("zoom-out"),
        shortcut: Some(Shortcut::ctrl('-')),
        status_tip: "Text zoom out",
        menu: Menu::Edit,
        toolbar: Some(Toolbar::Edit),
        separator_before: false,
        needs_selection: false,
    },
    Action {
        id: ActionId::Font,
        label: "&Font...",
        icon: Some("format-text-bold"),
        shortcut: Some(Shortcut::ctrl('B')),
        status_tip: "Change the editor font",
        menu: Menu::Edit,
        toolbar: Some(Toolbar::Edit),
        separator_before: false,
        needs_selection: false,
    },
    Action {
        id: ActionId::BackgroundColor,
        label: "Background &Color...",
        icon: Some("color-picker"),
        shortcut: None,
        status_tip: "Select background color",
        menu: Menu::Edit,
        toolbar: Some(Toolbar::Edit),
        separator_before: false,
        needs_selection: false,
    },
    Action {
        id: ActionId::Preferences,
        label: "&Preferences...",
        icon: None,
        shortcut: None,
        status_tip: "Adjust preferences",
        menu: Menu::Preferences,
        toolbar: None,
        separator_before: false,
        needs_selection: false,
    },
    Action {
        id: ActionId::About,
        label: "&About Riff",
        icon: None,
        shortcut: None,
        status_tip: "Show the application's About box",
        menu: Menu::Help,
        toolbar: None,
        separator_before: false,
        needs_selection: false,
    },
];

/// First Win32 command id; ids are assigned in table order from here.
const FIRST_COMMAND_ID: u16 = 1001;

/// Look up the descriptor for `id`.
pub(crate) fn action(id: ActionId) -> &'static Action {
    &ACTIONS[id.index()]
}

/// Actions in `menu`, in display order.
pub(crate) fn in_menu(menu: Menu) -> impl Iterator<Item = &'static Action> {
    ACTIONS.iter().filter(move |a| a.menu == menu)
}

/// Actions on `toolbar`, in display order.
pub(crate) fn on_toolbar(toolbar: Toolbar) -> impl Iterator<Item = &'static Action> {
    ACTIONS.iter().filter(move |a| a.toolbar == Some(toolbar))
}

impl ActionId {
    /// Position of this action in `ACTIONS`.
    const fn index(self) -> usize {
        self as usize
    }

    /// WM_COMMAND identifier for menu items, toolbar buttons and accelerators.
    pub(crate) fn command_id(self) -> u16 {
        FIRST_COMMAND_ID + self.index() as u16
    }

    pub(crate) fn from_command_id(cmd: u16) -> Option<Self> {
        let index = cmd.checked_sub(FIRST_COMMAND_ID)?;
        ACTIONS.get(usize::from(index)).map(|a| a.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_ids_roundtrip() {
        for a in &ACTIONS {
            assert_eq!(ActionId::from_command_id(a.id.command_id()), Some(a.id));
        }
        assert_eq!(ActionId::from_command_id(0), None);
        assert_eq!(ActionId::from_command_id(FIRST_COMMAND_ID + 500), None);
    }

    #[test]
    fn table_follows_declaration_order() {
        for (i, a) in ACTIONS.iter().enumerate() {
            assert_eq!(a.id.index(), i, "{:?} is out of place", a.id);
            assert_eq!(action(a.id).id, a.id);
        }
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in ACTIONS.iter().enumerate() {
            assert!(ACTIONS[i + 1..].iter().all(|b| b.id != a.id), "{:?} twice", a.id);
        }
    }

    #[test]
    fn only_cut_and_copy_track_selection() {
        let tracked: Vec<_> = ACTIONS.iter().filter(|a| a.needs_selection).map(|a| a.id).collect();
        assert_eq!(tracked, vec![ActionId::Cut, ActionId::Copy]);
        assert!(!action(ActionId::Cut).initially_enabled());
        assert!(action(ActionId::Paste).initially_enabled());
    }

    #[test]
    fn menu_text_carries_shortcut_hint() {
        assert_eq!(action(ActionId::Save).menu_text(), "&Save\tCtrl+S");
        assert_eq!(action(ActionId::SaveAs).menu_text(), "Save &As...\tCtrl+Shift+S");
        assert_eq!(action(ActionId::Exit).menu_text(), "E&xit\tAlt+F4");
        assert_eq!(action(ActionId::About).menu_text(), "&About Riff");
    }

    #[test]
    fn button_text_drops_markers() {
        assert_eq!(action(ActionId::Open).button_text(), "Open");
        assert_eq!(action(ActionId::Cut).button_text(), "Cut");
    }

    #[test]
    fn menus_and_toolbars_are_populated() {
        for m in Menu::ALL {
            assert!(in_menu(m).count() > 0, "{m:?} is empty");
        }
        let file: Vec<_> = on_toolbar(Toolbar::File).map(|a| a.id).collect();
        assert_eq!(file, vec![ActionId::New, ActionId::Open, ActionId::Save, ActionId::SaveAs]);
        assert!(on_toolbar(Toolbar::Edit).any(|a| a.id == ActionId::BackgroundColor));
    }
}
