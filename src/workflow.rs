use crate::brew::{CollectOptions, Homebrew, OfflineSource, PackageManager, collect};
use crate::domain::Profile;
use crate::error::{BrewkeeperError, Result};
use crate::profile::{ProfileSettings, ProfileStore, visible_packages};
use crate::releases::{GithubClient, resolve_links};
use crate::risk::{PackageViewModel, RiskLevel, build};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::path::PathBuf;

/// Dependents listed inline before the rest are summarised.
const DEPENDENT_DISPLAY_LIMIT: usize = 3;

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub profile: Option<String>,
    /// Explicit safe-mode choice; `None` defers to the profile.
    pub safe_mode: Option<bool>,
    pub input: Option<PathBuf>,
    pub with_impact: bool,
    pub release_notes: bool,
    pub json: bool,
    pub brew: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport<'a> {
    generated_at: String,
    profile: Option<&'a str>,
    safe_mode_only: bool,
    total: usize,
    visible: usize,
    packages: &'a [PackageViewModel],
}

/// Execute the check workflow: collect, assess, filter and report.
pub fn execute_check(config_dir: Option<PathBuf>, options: CheckOptions) -> Result<()> {
    let human = !options.json;
    if human {
        println!("{}", "Checking outdated Homebrew packages...".cyan().bold());
    }

    // Step 1: Resolve the profile
    step(human, "1. Loading profiles...");
    let settings = ProfileStore::new(config_dir).load();
    let profile = select_profile(&settings, options.profile.as_deref())?;
    let safe_mode = effective_safe_mode(options.safe_mode, profile);
    if human {
        match profile {
            Some(profile) => println!(
                "   Using profile {} ({})",
                profile.name.bright_cyan(),
                profile.id.dimmed()
            ),
            None => println!("   {}", "No profile selected".dimmed()),
        }
    }

    // Step 2: Collect package data
    step(human, "2. Collecting package data...");
    let source: Box<dyn PackageManager> = match &options.input {
        Some(path) => Box::new(OfflineSource::from_file(path)?),
        None => Box::new(Homebrew::new(&options.brew)),
    };
    let collected = collect(
        source.as_ref(),
        CollectOptions {
            with_impact: options.with_impact,
            show_progress: human,
        },
    )?;
    if human {
        println!(
            "{}",
            format!("✓ Found {} outdated package(s)", collected.packages.len()).green()
        );
    }

    // Step 3: Resolve release links
    step(human, "3. Resolving release links...");
    let client = if options.release_notes {
        Some(GithubClient::new()?)
    } else {
        None
    };
    let links = resolve_links(&collected.packages, client.as_ref());

    // Step 4: Assess, rank and filter
    step(human, "4. Assessing upgrade risk...");
    let ranked = build(&collected.packages, &collected.impacts, &links);
    let total = ranked.len();
    let visible = visible_packages(ranked, profile, safe_mode);

    if options.json {
        let report = CheckReport {
            generated_at: jiff::Timestamp::now().to_string(),
            profile: profile.map(|p| p.id.as_str()),
            safe_mode_only: safe_mode,
            total,
            visible: visible.len(),
            packages: &visible,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&visible, total, safe_mode);
    }

    Ok(())
}

/// List stored profiles, marking the active one.
pub fn execute_profiles_list(config_dir: Option<PathBuf>) -> Result<()> {
    let settings = ProfileStore::new(config_dir).load();

    println!("{}", "Profiles:".cyan().bold());
    for profile in &settings.profiles {
        let marker = if profile.id == settings.active_profile_id {
            "*".green().bold()
        } else {
            " ".normal()
        };
        let safe_mode = if profile.safe_mode_only {
            "safe mode".green()
        } else {
            "all bumps".yellow()
        };
        println!(
            "{} {} {} ({})",
            marker,
            profile.id.white().bold(),
            profile.name.dimmed(),
            safe_mode
        );
        if !profile.include_names.is_empty() {
            println!("    include: {}", join(&profile.include_names));
        }
        if !profile.exclude_names.is_empty() {
            println!("    exclude: {}", join(&profile.exclude_names));
        }
    }

    Ok(())
}

/// Persist `id` as the active profile.
pub fn execute_profile_use(config_dir: Option<PathBuf>, id: &str) -> Result<()> {
    let store = ProfileStore::new(config_dir);
    let mut settings = store.load();
    let name = settings.select(id)?.name.clone();
    let path = store.save(&settings)?;

    println!("{}", format!("✓ Profile switched to {}.", name).green());
    log::debug!("Saved profiles to {}", path.display());
    Ok(())
}

/// Persist the safe-mode default of the active profile.
pub fn execute_profile_safe_mode(config_dir: Option<PathBuf>, enabled: bool) -> Result<()> {
    let store = ProfileStore::new(config_dir);
    let mut settings = store.load();
    let name = settings.set_safe_mode(enabled)?.name.clone();
    let path = store.save(&settings)?;

    let state = if enabled { "on" } else { "off" };
    println!(
        "{}",
        format!("✓ Safe mode {} for {}.", state, name).green()
    );
    log::debug!("Saved profiles to {}", path.display());
    Ok(())
}

fn step(human: bool, message: &str) {
    if human {
        println!("\n{}", message.yellow());
    }
}

fn select_profile<'a>(
    settings: &'a ProfileSettings,
    requested: Option<&str>,
) -> Result<Option<&'a Profile>> {
    match requested {
        Some(id) => settings
            .get(id)
            .map(Some)
            .ok_or_else(|| BrewkeeperError::ProfileNotFound(id.to_string())),
        None => Ok(settings.active_profile()),
    }
}

fn effective_safe_mode(explicit: Option<bool>, profile: Option<&Profile>) -> bool {
    explicit.unwrap_or_else(|| profile.is_some_and(|p| p.safe_mode_only))
}

fn print_report(visible: &[PackageViewModel], total: usize, safe_mode: bool) {
    if total == 0 {
        println!("\n{}", "✨ Everything is up to date!".green().bold());
        return;
    }

    println!("\n{}", "📦 Outdated packages:".cyan().bold());
    println!(
        "{}",
        format!("Showing {} of {} package(s)", visible.len(), total).yellow()
    );
    if safe_mode {
        println!("{}", "   (safe mode: minor and patch bumps only)".dimmed());
    }

    if visible.is_empty() {
        println!("\n{}", "Nothing matches the current filters.".yellow());
        return;
    }

    for view_model in visible {
        print_package(view_model);
    }
}

fn print_package(view_model: &PackageViewModel) {
    let pkg = &view_model.pkg;
    let risk = &view_model.risk;

    let pinned = if pkg.pinned {
        format!(" {}", "[pinned]".magenta())
    } else {
        String::new()
    };
    println!(
        "\n  {} {} {} → {} {}{}",
        level_badge(view_model),
        pkg.name.white().bold(),
        pkg.current_version.red(),
        pkg.latest_version.green(),
        format!("({})", pkg.kind).dimmed(),
        pinned
    );

    for reason in &risk.reasons {
        println!("    • {}", reason);
    }

    if risk.dependency_impact_count > 0 {
        let shown: Vec<&str> = risk
            .dependency_impact_preview
            .iter()
            .take(DEPENDENT_DISPLAY_LIMIT)
            .map(String::as_str)
            .collect();
        let rest = risk.dependency_impact_count - shown.len();
        let suffix = if rest > 0 {
            format!(" (+{} more)", rest)
        } else {
            String::new()
        };
        println!(
            "    {} {}{}",
            "dependents:".dimmed(),
            shown.join(", "),
            suffix.dimmed()
        );
    }

    if let Some(caveat) = &risk.caveat_warning {
        println!("    {} {}", "caveats:".dimmed(), caveat.replace('\n', " "));
    }

    let links = &view_model.links;
    if let Some(url) = links.releases.as_ref().or(links.homepage.as_ref()) {
        println!("    {} {}", "links:".dimmed(), url.cyan());
    }
    if let Some(notes) = &links.latest_notes {
        let first_line = notes.lines().next().unwrap_or_default();
        println!("    {} {}", "latest notes:".dimmed(), first_line);
    }
}

fn level_badge(view_model: &PackageViewModel) -> ColoredString {
    let badge = format!("{:<14}", view_model.badge());
    match view_model.risk.level {
        RiskLevel::High => badge.red().bold(),
        RiskLevel::Medium => badge.yellow(),
        RiskLevel::Low => badge.green(),
    }
}

fn join<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const OUTDATED: &str = r#"{
        "formulae": [
            {"name": "node", "installed_versions": ["20.11.0"], "current_version": "22.2.0", "pinned": false},
            {"name": "jq", "installed_versions": ["1.7"], "current_version": "1.7.1", "pinned": false}
        ],
        "casks": [
            {"name": "slack", "installed_versions": "4.36.0", "current_version": "4.38.0"}
        ]
    }"#;

    fn options(input: PathBuf) -> CheckOptions {
        CheckOptions {
            profile: None,
            safe_mode: None,
            input: Some(input),
            with_impact: true,
            release_notes: false,
            json: true,
            brew: PathBuf::from("brew"),
        }
    }

    #[test]
    fn explicit_safe_mode_overrides_profile() {
        let work = Profile::new("work", "Work", true);
        assert!(effective_safe_mode(None, Some(&work)));
        assert!(!effective_safe_mode(Some(false), Some(&work)));
        assert!(effective_safe_mode(Some(true), None));
        assert!(!effective_safe_mode(None, None));
    }

    #[test]
    fn selects_requested_or_active_profile() {
        let settings = ProfileSettings::default();
        assert_eq!(select_profile(&settings, None).unwrap().unwrap().id, "work");
        assert_eq!(
            select_profile(&settings, Some("hobby")).unwrap().unwrap().id,
            "hobby"
        );
        assert!(matches!(
            select_profile(&settings, Some("missing")),
            Err(BrewkeeperError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn check_runs_against_saved_payload() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("outdated.json");
        fs::write(&input, OUTDATED).unwrap();

        let config_dir = dir.path().join("config");
        assert!(execute_check(Some(config_dir.clone()), options(input.clone())).is_ok());

        let mut human = options(input);
        human.json = false;
        human.safe_mode = Some(false);
        assert!(execute_check(Some(config_dir), human).is_ok());
    }

    #[test]
    fn check_rejects_unknown_profile() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("outdated.json");
        fs::write(&input, OUTDATED).unwrap();

        let mut opts = options(input);
        opts.profile = Some("nope".into());
        let err = execute_check(Some(dir.path().to_path_buf()), opts).unwrap_err();
        assert!(matches!(err, BrewkeeperError::ProfileNotFound(_)));
    }

    #[test]
    fn profile_commands_persist_changes() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().to_path_buf();

        execute_profile_use(Some(config_dir.clone()), "hobby").unwrap();
        execute_profile_safe_mode(Some(config_dir.clone()), true).unwrap();
        execute_profiles_list(Some(config_dir.clone())).unwrap();

        let settings = ProfileStore::new(Some(config_dir)).load();
        assert_eq!(settings.active_profile_id, "hobby");
        assert!(settings.active_profile().unwrap().safe_mode_only);
    }

    #[test]
    fn using_unknown_profile_fails_without_writing() {
        let dir = tempdir().unwrap();
        let err = execute_profile_use(Some(dir.path().to_path_buf()), "ghost").unwrap_err();
        assert!(matches!(err, BrewkeeperError::ProfileNotFound(_)));
        assert!(!dir.path().join(crate::profile::store::PROFILES_FILE).exists());
    }
}
