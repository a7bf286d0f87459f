// ── Command line ──────────────────────────────────────────────────────────────

use std::path::PathBuf;

use clap::Parser;

/// A small plain-text editor.
#[derive(Parser, Debug)]
#[command(name = "riff", version, about)]
pub(crate) struct Args {
    /// The file to open.
    pub(crate) file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_argument_is_optional() {
        let args = Args::try_parse_from(["riff"]).expect("parse");
        assert_eq!(args.file, None);
    }

    #[test]
    fn positional_file_is_captured() {
        let args = Args::try_parse_from(["riff", "notes.txt"]).expect("parse");
        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
    }

    #[test]
    fn help_and_version_are_provided() {
        let help = Args::try_parse_from(["riff", "--help"]).expect_err("help exits");
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
        let version = Args::try_parse_from(["riff", "--version"]).expect_err("version exits");
        assert_eq!(version.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Args::try_parse_from(["riff", "--frobnicate"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
