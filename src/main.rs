// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32`        : Win32 / WinAPI FFI
//   • `editor::edit_control`   : EDIT child-window hosting
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that stderr logging is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
// Off Windows only the platform-neutral core is built, for its tests.
#![cfg_attr(not(windows), allow(dead_code))]

mod actions;
mod app;
mod cli;
mod document;
mod editor;
mod error;
mod logging;
mod platform;
mod settings;
mod theme;

use clap::Parser;
use log::{error, info};

fn main() {
    let args = cli::Args::parse();

    if let Err(e) = logging::init() {
        // Keep going without a log file; the editor itself still works.
        eprintln!("riff: {e}");
    }
    info!("starting {} {}", document::APP_NAME, env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args) {
        error!("startup failed: {e}");
        // Startup failed before or during the message loop.
        fatal(&e.to_string());
        std::process::exit(1);
    }
}

#[cfg(windows)]
fn run(args: cli::Args) -> error::Result<()> {
    platform::win32::window::run(args.file.as_deref())
}

#[cfg(not(windows))]
fn run(_args: cli::Args) -> error::Result<()> {
    Err(error::RiffError::Unsupported)
}

/// Report a fatal error: a modal dialog is the only visible output path in a
/// GUI app.
#[cfg(windows)]
fn fatal(message: &str) {
    platform::win32::window::show_error_dialog(message);
}

#[cfg(not(windows))]
fn fatal(message: &str) {
    eprintln!("riff: {message}");
}
