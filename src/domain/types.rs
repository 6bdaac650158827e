use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which Homebrew namespace a package lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageKind {
    /// A formula (command-line tool or library).
    #[serde(rename = "formula")]
    Library,
    /// A cask (desktop application).
    #[serde(rename = "cask")]
    Application,
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PackageKind::Library => "formula",
            PackageKind::Application => "cask",
        };
        f.write_str(label)
    }
}

/// One outdated package as reported by the package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    pub name: String,
    pub kind: PackageKind,
    pub current_version: String,
    pub latest_version: String,
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveats: Option<String>,
}

impl PackageRecord {
    pub fn new(
        name: impl Into<String>,
        kind: PackageKind,
        current_version: impl Into<String>,
        latest_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            current_version: current_version.into(),
            latest_version: latest_version.into(),
            pinned: false,
            homepage: None,
            caveats: None,
        }
    }

    pub fn with_caveats(mut self, caveats: impl Into<String>) -> Self {
        self.caveats = Some(caveats.into());
        self
    }

    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = Some(homepage.into());
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}

/// Installed packages that (transitively) depend on `package_name`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyImpact {
    pub package_name: String,
    pub dependents: Vec<String>,
}

impl DependencyImpact {
    pub fn new(package_name: impl Into<String>, dependents: Vec<String>) -> Self {
        Self {
            package_name: package_name.into(),
            dependents,
        }
    }

    pub fn none(package_name: impl Into<String>) -> Self {
        Self::new(package_name, Vec::new())
    }
}

/// Decorative links shown next to a package. Never influences risk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub releases: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_notes: Option<String>,
}

impl ReleaseLinks {
    pub fn is_empty(&self) -> bool {
        self.homepage.is_none()
            && self.repository.is_none()
            && self.releases.is_none()
            && self.changelog.is_none()
            && self.latest_notes.is_none()
    }
}

/// A named allow/deny filter over package names plus a safe-mode default.
///
/// Field names on disk follow the profile store format (`includePackages`,
/// `excludePackages`); the `includeNames`/`excludeNames` spellings are
/// accepted on input as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub safe_mode_only: bool,
    #[serde(rename = "includePackages", alias = "includeNames")]
    pub include_names: BTreeSet<String>,
    #[serde(rename = "excludePackages", alias = "excludeNames")]
    pub exclude_names: BTreeSet<String>,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, safe_mode_only: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            safe_mode_only,
            include_names: BTreeSet::new(),
            exclude_names: BTreeSet::new(),
        }
    }

    pub fn including<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_names.extend(names.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_kind_uses_homebrew_names_on_the_wire() {
        let json = serde_json::to_string(&PackageKind::Application).unwrap();
        assert_eq!(json, "\"cask\"");
        assert_eq!(PackageKind::Library.to_string(), "formula");
    }

    #[test]
    fn profile_reads_both_field_spellings() {
        let stored: Profile = serde_json::from_str(
            r#"{"id":"w","name":"Work","safeModeOnly":true,"includePackages":["git"],"excludePackages":[]}"#,
        )
        .unwrap();
        let alias_style: Profile = serde_json::from_str(
            r#"{"id":"w","name":"Work","safeModeOnly":true,"includeNames":["git"],"excludeNames":[]}"#,
        )
        .unwrap();
        assert_eq!(stored, alias_style);
        assert!(stored.include_names.contains("git"));
    }

    #[test]
    fn empty_links_report_empty() {
        assert!(ReleaseLinks::default().is_empty());
        let links = ReleaseLinks {
            homepage: Some("https://brew.sh".into()),
            ..ReleaseLinks::default()
        };
        assert!(!links.is_empty());
    }
}
