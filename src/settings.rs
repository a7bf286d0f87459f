// ── Settings persistence ──────────────────────────────────────────────────────
//
// A tiny key-value store addressed by (organization, application).  Backed by
// `<config dir>/<organization>/<application>.json`.  The only entry Riff keeps
// is the main window geometry.
// No `unsafe`; pure safe Rust + serde_json.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Organization half of the settings key.
pub(crate) const ORGANIZATION: &str = "Riff";
/// Application half of the settings key.
pub(crate) const APPLICATION: &str = "Riff Editor";
/// Where an untitled document goes when the session ends without a prompt.
const RECOVERY_FILE_NAME: &str = "untitled-recovery.txt";

/// The main window never shrinks below this width, in pixels.
pub(crate) const MIN_WIDTH: i32 = 640;
/// The main window never shrinks below this height.
pub(crate) const MIN_HEIGHT: i32 = 480;

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Position and size of the main window, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Geometry {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
    #[serde(default)]
    pub(crate) maximized: bool,
}

impl Geometry {
    /// Geometry used when nothing is stored: one third of the available
    /// width, half of the available height, centred in `available`.
    pub(crate) fn centered_default(available: Geometry) -> Self {
        let width = (available.width / 3).max(MIN_WIDTH);
        let height = (available.height / 2).max(MIN_HEIGHT);
        Self {
            x: available.x + (available.width - width) / 2,
            y: available.y + (available.height - height) / 2,
            width,
            height,
            maximized: false,
        }
    }

    /// The same geometry grown to at least `MIN_WIDTH` x `MIN_HEIGHT`.
    pub(crate) fn at_least_minimum(self) -> Self {
        Self {
            width: self.width.max(MIN_WIDTH),
            height: self.height.max(MIN_HEIGHT),
            ..self
        }
    }
}

/// Root of the JSON settings file.
#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    version: u32,
    #[serde(default)]
    geometry: Option<Geometry>,
}

// ── Format version ────────────────────────────────────────────────────────────

const SETTINGS_VERSION: u32 = 1;

// ── Paths ─────────────────────────────────────────────────────────────────────

/// Per-user configuration root: `%APPDATA%` on Windows, `$XDG_CONFIG_HOME` or
/// `$HOME/.config` elsewhere.
///
/// Returns `None` if none of the variables is set.
pub(crate) fn config_root() -> Option<PathBuf> {
    if cfg!(windows) {
        return std::env::var_os("APPDATA").map(PathBuf::from);
    }
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
}

/// Directory holding everything Riff writes: `<config root>/<organization>`.
pub(crate) fn organization_dir() -> Option<PathBuf> {
    config_root().map(|root| root.join(ORGANIZATION))
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Handle to the settings file of one (organization, application) pair.
#[derive(Debug, Clone)]
pub(crate) struct SettingsStore {
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// The store for `ORGANIZATION` / `APPLICATION` under the user's config
    /// root.  Without a config root the store reads nothing and writes fail.
    pub(crate) fn open_default() -> Self {
        Self {
            path: organization_dir().map(|dir| dir.join(format!("{APPLICATION}.json"))),
        }
    }

    /// A store backed by an explicit file.
    pub(crate) fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Recovery file next to the settings file.
    pub(crate) fn recovery_path(&self) -> Option<PathBuf> {
        Some(self.path.as_deref()?.parent()?.join(RECOVERY_FILE_NAME))
    }

    /// Read the `geometry` entry.
    ///
    /// Returns `None` on any error: file missing, JSON parse failure, or an
    /// unrecognised version number.  The window then uses its default size.
    pub(crate) fn load_geometry(&self) -> Option<Geometry> {
        let path = self.path.as_deref()?;
        let data = fs::read(path).ok()?;
        let sf: SettingsFile = match serde_json::from_slice(&data) {
            Ok(sf) => sf,
            Err(e) => {
                warn!("ignoring unreadable settings file {}: {e}", path.display());
                return None;
            }
        };
        if sf.version != SETTINGS_VERSION {
            debug!("ignoring settings version {} in {}", sf.version, path.display());
            return None;
        }
        sf.geometry
    }

    /// Write the `geometry` entry, creating the settings directory if needed.
    pub(crate) fn save_geometry(&self, geometry: Geometry) -> io::Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no configuration directory"))?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let sf = SettingsFile {
            version: SETTINGS_VERSION,
            geometry: Some(geometry),
        };
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &sf).map_err(io::Error::other)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Geometry {
        Geometry { x: 10, y: 20, width: 800, height: 600, maximized: false }
    }

    #[test]
    fn geometry_roundtrips_through_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SettingsStore::at(dir.path().join("Riff").join("Riff Editor.json"));
        store.save_geometry(sample()).expect("save");
        assert_eq!(store.load_geometry(), Some(sample()));
    }

    #[test]
    fn missing_file_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SettingsStore::at(dir.path().join("absent.json"));
        assert_eq!(store.load_geometry(), None);
    }

    #[test]
    fn recovery_file_sits_next_to_settings() {
        let store = SettingsStore::at("/cfg/Riff/Riff Editor.json");
        assert_eq!(store.recovery_path(), Some(PathBuf::from("/cfg/Riff/untitled-recovery.txt")));
        assert_eq!(SettingsStore { path: None }.recovery_path(), None);
    }

    #[test]
    fn garbage_file_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("s.json");
        fs::write(&path, "not json").expect("fixture");
        assert_eq!(SettingsStore::at(path).load_geometry(), None);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("s.json");
        fs::write(
            &path,
            r#"{"version":99,"geometry":{"x":0,"y":0,"width":700,"height":500}}"#,
        )
        .expect("fixture");
        assert_eq!(SettingsStore::at(path).load_geometry(), None);
    }

    /// Files written before `maximized` existed parse as not maximized.
    #[test]
    fn maximized_defaults_to_false_when_absent() {
        let json = r#"{"version":1,"geometry":{"x":1,"y":2,"width":700,"height":500}}"#;
        let sf: SettingsFile = serde_json::from_str(json).expect("deserialize");
        assert!(!sf.geometry.expect("geometry").maximized);
    }

    #[test]
    fn store_without_path_cannot_save() {
        let store = SettingsStore { path: None };
        assert!(store.save_geometry(sample()).is_err());
        assert_eq!(store.load_geometry(), None);
    }

    #[test]
    fn default_geometry_is_centered_third_by_half() {
        let screen = Geometry { x: 0, y: 0, width: 2400, height: 1200, maximized: false };
        let g = Geometry::centered_default(screen);
        assert_eq!((g.width, g.height), (800, 600));
        assert_eq!((g.x, g.y), (800, 300));
    }

    #[test]
    fn default_geometry_respects_minimum_size() {
        let screen = Geometry { x: 0, y: 0, width: 1280, height: 720, maximized: false };
        let g = Geometry::centered_default(screen);
        assert_eq!((g.width, g.height), (MIN_WIDTH, MIN_HEIGHT));
        assert_eq!((g.x, g.y), (320, 120));
    }

    #[test]
    fn at_least_minimum_grows_small_windows() {
        let g = Geometry { width: 100, height: 900, ..sample() }.at_least_minimum();
        assert_eq!((g.width, g.height), (MIN_WIDTH, 900));
    }
}
