use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "brewkeeper",
    about = "Brewkeeper - Review outdated Homebrew packages ranked by upgrade risk",
    version,
    author
)]
pub struct Cli {
    /// Directory holding profiles.json (defaults to $XDG_CONFIG_HOME/brewkeeper)
    #[arg(long, global = true, env = "BREWKEEPER_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List outdated packages ranked riskiest first
    Check {
        /// Profile to filter with (defaults to the active profile)
        #[arg(short, long, value_name = "ID")]
        profile: Option<String>,

        /// Only show minor and patch bumps, regardless of the profile setting
        #[arg(short, long, conflicts_with = "all")]
        safe_only: bool,

        /// Show every bump, regardless of the profile setting
        #[arg(short, long)]
        all: bool,

        /// Read a saved `brew outdated --json=v2` payload instead of running brew
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Skip the installed-dependents lookup
        #[arg(long)]
        no_impact: bool,

        /// Fetch the latest GitHub release notes for GitHub-hosted packages
        #[arg(long)]
        release_notes: bool,

        /// Emit a JSON report instead of the terminal view
        #[arg(long)]
        json: bool,

        /// Homebrew executable to run
        #[arg(long, env = "BREWKEEPER_BREW", default_value = "brew", value_name = "PATH")]
        brew: PathBuf,
    },

    /// Inspect or change operator profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// List stored profiles
    List,

    /// Make a profile the active one
    Use {
        /// Profile id
        id: String,
    },

    /// Turn safe mode on or off for the active profile
    SafeMode {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_check_flags() {
        let cli = Cli::parse_from([
            "brewkeeper",
            "check",
            "--profile",
            "work",
            "--safe-only",
            "--input",
            "outdated.json",
            "--json",
        ]);
        match cli.command {
            Commands::Check {
                profile,
                safe_only,
                all,
                input,
                json,
                ..
            } => {
                assert_eq!(profile.as_deref(), Some("work"));
                assert!(safe_only);
                assert!(!all);
                assert_eq!(input, Some(PathBuf::from("outdated.json")));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn safe_only_conflicts_with_all() {
        assert!(Cli::try_parse_from(["brewkeeper", "check", "--safe-only", "--all"]).is_err());
    }

    #[test]
    fn parses_profile_safe_mode() {
        let cli = Cli::parse_from(["brewkeeper", "profiles", "safe-mode", "off"]);
        match cli.command {
            Commands::Profiles {
                action: ProfileAction::SafeMode { state },
            } => assert!(!state.enabled()),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
