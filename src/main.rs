mod cli;

use brewkeeper::workflow::{self, CheckOptions};
use clap::Parser;
use cli::{Cli, Commands, ProfileAction};
use colored::Colorize;
use log::LevelFilter;
use std::process;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_dir = cli.config_dir;
    let result = match cli.command {
        Commands::Check {
            profile,
            safe_only,
            all,
            input,
            no_impact,
            release_notes,
            json,
            brew,
        } => {
            let safe_mode = if safe_only {
                Some(true)
            } else if all {
                Some(false)
            } else {
                None
            };
            workflow::execute_check(
                config_dir,
                CheckOptions {
                    profile,
                    safe_mode,
                    input,
                    with_impact: !no_impact,
                    release_notes,
                    json,
                    brew,
                },
            )
        }
        Commands::Profiles { action } => match action {
            ProfileAction::List => workflow::execute_profiles_list(config_dir),
            ProfileAction::Use { id } => workflow::execute_profile_use(config_dir, &id),
            ProfileAction::SafeMode { state } => {
                workflow::execute_profile_safe_mode(config_dir, state.enabled())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

/// `BREWKEEPER_LOG` overrides the level picked by `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("brewkeeper", level)
        .parse_env("BREWKEEPER_LOG")
        .format_timestamp(None)
        .init();
}
