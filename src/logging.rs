// ── Logging ───────────────────────────────────────────────────────────────────
//
// Log records go to `<config root>/Riff/riff.log`.  Debug builds also echo
// them to stderr, which is only visible when the console subsystem is kept.

use std::fs::{self, File};

use log::LevelFilter;
use simplelog::{CombinedLogger, ConfigBuilder, SharedLogger, WriteLogger};

use crate::{error::Result, settings};

const LOG_FILE_NAME: &str = "riff.log";

/// Install the global logger.  Call once, before the window is created.
pub(crate) fn init() -> Result<()> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if let Some(dir) = settings::organization_dir() {
        fs::create_dir_all(&dir)?;
        let file = File::create(dir.join(LOG_FILE_NAME))?;
        loggers.push(WriteLogger::new(level, config.clone(), file));
    }

    #[cfg(debug_assertions)]
    loggers.push(simplelog::TermLogger::new(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ));

    CombinedLogger::init(loggers)?;
    Ok(())
}
