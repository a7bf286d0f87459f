// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is one of exactly two modules in the codebase where `unsafe` code is
// permitted (the other is `editor::edit_control`).  Every `unsafe` block MUST
// carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod dialogs; // common open/save/font/colour dialogs and message boxes
pub mod shell; // `Shell` implementation over the main window's controls
pub mod window; // main window, WndProc, message loop

pub(crate) mod dpi; // per-monitor DPI v2 helpers
