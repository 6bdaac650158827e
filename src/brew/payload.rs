//! Validation of Homebrew's `--json=v2` output into domain records.
//!
//! Homebrew's JSON is loosely shaped. Every entry is checked on its own and
//! entries missing a required field are dropped, so one odd formula never
//! sinks a whole refresh.

use crate::brew::PackageDetails;
use crate::domain::{PackageKind, PackageRecord};
use crate::error::{BrewkeeperError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstalledVersions {
    One(String),
    Many(Vec<Value>),
}

impl InstalledVersions {
    fn first(&self) -> Option<&str> {
        match self {
            InstalledVersions::One(version) => Some(version),
            InstalledVersions::Many(versions) => versions.first().and_then(Value::as_str),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OutdatedEntry {
    name: Option<String>,
    installed_versions: Option<InstalledVersions>,
    current_version: Option<String>,
    pinned: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct FormulaInfo {
    name: Option<String>,
    homepage: Option<String>,
    caveats: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaskInfo {
    token: Option<String>,
    name: Option<Vec<String>>,
    homepage: Option<String>,
    caveats: Option<String>,
}

/// Parse `brew outdated --json=v2`.
pub fn parse_outdated(json: &str) -> Result<Vec<PackageRecord>> {
    let document = parse_document(json, "outdated packages")?;

    let formulae = entries(&document, "formulae")
        .filter_map(|entry| outdated_record(entry, PackageKind::Library));
    let casks = entries(&document, "casks")
        .filter_map(|entry| outdated_record(entry, PackageKind::Application));

    Ok(formulae.chain(casks).collect())
}

/// Parse `brew info --json=v2 [--cask] …` into homepage/caveats keyed by name.
pub fn parse_info(json: &str, kind: PackageKind) -> Result<HashMap<String, PackageDetails>> {
    let document = parse_document(json, "package info")?;
    let mut details = HashMap::new();

    match kind {
        PackageKind::Library => {
            for entry in entries(&document, "formulae") {
                let Some(info) = decode::<FormulaInfo>(entry) else {
                    continue;
                };
                let Some(name) = info.name else {
                    continue;
                };
                details.insert(name, PackageDetails::new(info.homepage, info.caveats));
            }
        }
        PackageKind::Application => {
            for entry in entries(&document, "casks") {
                let Some(info) = decode::<CaskInfo>(entry) else {
                    continue;
                };
                let token = info
                    .token
                    .or_else(|| info.name.and_then(|names| names.into_iter().next()));
                let Some(token) = token else {
                    continue;
                };
                details.insert(token, PackageDetails::new(info.homepage, info.caveats));
            }
        }
    }

    Ok(details)
}

/// Parse the line-per-package output of `brew uses`.
pub fn parse_dependents(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_document(json: &str, what: &str) -> Result<Value> {
    serde_json::from_str(json).map_err(|e| {
        BrewkeeperError::InvalidPayload(format!("Homebrew returned invalid JSON for {what}: {e}"))
    })
}

fn entries<'a>(document: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> + 'a {
    document
        .get(key)
        .and_then(Value::as_array)
        .map(|list| list.as_slice())
        .unwrap_or_default()
        .iter()
}

fn decode<T: DeserializeOwned>(entry: &Value) -> Option<T> {
    match T::deserialize(entry) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("Dropping malformed Homebrew entry: {e}");
            None
        }
    }
}

fn outdated_record(entry: &Value, kind: PackageKind) -> Option<PackageRecord> {
    let raw = decode::<OutdatedEntry>(entry)?;

    // Formulae always report a list; casks may report a bare string.
    let current = match (raw.installed_versions.as_ref(), kind) {
        (Some(InstalledVersions::One(_)), PackageKind::Library) => None,
        (Some(versions), _) => versions.first(),
        (None, _) => None,
    };

    let (Some(name), Some(current), Some(latest)) =
        (raw.name.as_deref(), current, raw.current_version.as_deref())
    else {
        log::debug!("Dropping incomplete {kind} entry: {entry}");
        return None;
    };

    let pinned = kind == PackageKind::Library && raw.pinned.unwrap_or(false);
    Some(PackageRecord::new(name, kind, current, latest).pinned(pinned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const OUTDATED: &str = indoc! {r#"
        {
          "formulae": [
            {
              "name": "git",
              "installed_versions": ["2.44.0"],
              "current_version": "2.45.1",
              "pinned": false,
              "pinned_version": null
            },
            {
              "name": "postgresql@16",
              "installed_versions": ["16.2_1", "16.1"],
              "current_version": "16.3",
              "pinned": true,
              "pinned_version": "16.2_1"
            },
            { "name": "broken", "installed_versions": [], "current_version": "1.0" },
            { "installed_versions": ["1.0"], "current_version": "1.1" },
            { "name": "string-version", "installed_versions": "1.0", "current_version": "1.1" }
          ],
          "casks": [
            { "name": "iterm2", "installed_versions": "3.4.23", "current_version": "3.5.0" },
            { "name": "firefox", "installed_versions": ["125.0"], "current_version": "126.0" },
            { "name": "no-latest", "installed_versions": "1.0" }
          ]
        }
    "#};

    #[test]
    fn keeps_valid_formulae_and_casks() {
        let records = parse_outdated(OUTDATED).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["git", "postgresql@16", "iterm2", "firefox"]);

        let pg = &records[1];
        assert_eq!(pg.kind, PackageKind::Library);
        assert_eq!(pg.current_version, "16.2_1");
        assert_eq!(pg.latest_version, "16.3");
        assert!(pg.pinned);

        let iterm = &records[2];
        assert_eq!(iterm.kind, PackageKind::Application);
        assert_eq!(iterm.current_version, "3.4.23");
        assert!(!iterm.pinned);
    }

    #[test]
    fn missing_sections_are_empty() {
        assert!(parse_outdated("{}").unwrap().is_empty());
        assert!(parse_outdated(r#"{"formulae": null, "casks": 3}"#).unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_outdated("Error: not json").unwrap_err();
        assert!(matches!(err, BrewkeeperError::InvalidPayload(_)));
    }

    #[test]
    fn parses_formula_info() {
        let json = indoc! {r#"
            {
              "formulae": [
                { "name": "node", "homepage": "https://nodejs.org/", "caveats": null },
                { "name": "postgresql@16", "homepage": "https://www.postgresql.org/", "caveats": "Run initdb\n" },
                { "name": "blank", "homepage": "https://example.com", "caveats": "   " }
              ],
              "casks": []
            }
        "#};
        let details = parse_info(json, PackageKind::Library).unwrap();
        assert_eq!(details.len(), 3);
        assert_eq!(details["node"].homepage.as_deref(), Some("https://nodejs.org/"));
        assert_eq!(details["node"].caveats, None);
        assert_eq!(details["postgresql@16"].caveats.as_deref(), Some("Run initdb\n"));
        assert_eq!(details["blank"].caveats, None);
    }

    #[test]
    fn parses_cask_info_with_name_fallback() {
        let json = indoc! {r#"
            {
              "formulae": [],
              "casks": [
                { "token": "iterm2", "name": ["iTerm2"], "homepage": "https://iterm2.com/" },
                { "name": ["docker"], "homepage": "https://www.docker.com/", "caveats": "Start Docker.app" },
                { "homepage": "https://nameless.example" }
              ]
            }
        "#};
        let details = parse_info(json, PackageKind::Application).unwrap();
        assert_eq!(details.len(), 2);
        assert!(details.contains_key("iterm2"));
        assert_eq!(details["docker"].caveats.as_deref(), Some("Start Docker.app"));
    }

    #[test]
    fn dependents_are_trimmed_and_ordered() {
        let stdout = "ffmpeg\n  imagemagick \n\nlibheif\n";
        assert_eq!(
            parse_dependents(stdout),
            vec!["ffmpeg", "imagemagick", "libheif"]
        );
        assert!(parse_dependents("\n\n").is_empty());
    }
}
