use crate::domain::{PackageRecord, Profile};
use crate::risk::{PackageViewModel, is_safe_upgrade};

/// Anything that can be filtered by package name.
pub trait PackageName {
    fn package_name(&self) -> &str;
}

impl PackageName for PackageRecord {
    fn package_name(&self) -> &str {
        &self.name
    }
}

impl PackageName for PackageViewModel {
    fn package_name(&self) -> &str {
        &self.pkg.name
    }
}

impl PackageName for String {
    fn package_name(&self) -> &str {
        self
    }
}

impl PackageName for str {
    fn package_name(&self) -> &str {
        self
    }
}

impl<T: PackageName + ?Sized> PackageName for &T {
    fn package_name(&self) -> &str {
        (**self).package_name()
    }
}

/// Whether `name` passes the profile's include/exclude lists.
///
/// An empty include list places no restriction. Exclusion always wins.
pub fn allows(profile: &Profile, name: &str) -> bool {
    let included = profile.include_names.is_empty() || profile.include_names.contains(name);
    included && !profile.exclude_names.contains(name)
}

/// Keep the entries the profile allows, preserving order. Without a profile
/// the input is returned untouched.
pub fn filter<T: PackageName>(items: Vec<T>, profile: Option<&Profile>) -> Vec<T> {
    let Some(profile) = profile else {
        return items;
    };

    items
        .into_iter()
        .filter(|item| allows(profile, item.package_name()))
        .collect()
}

/// The set an operator actually sees: profile filter first, then the
/// bump-only safe-mode lens when it is switched on.
pub fn visible_packages(
    view_models: Vec<PackageViewModel>,
    profile: Option<&Profile>,
    safe_mode_only: bool,
) -> Vec<PackageViewModel> {
    let mut visible = filter(view_models, profile);
    if safe_mode_only {
        visible.retain(is_safe_upgrade);
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageKind;
    use crate::risk::build;
    use std::collections::HashMap;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_profile_returns_input_unchanged() {
        let input = names(&["zsh", "git", "awk"]);
        assert_eq!(filter(input.clone(), None), input);
    }

    #[test]
    fn empty_include_means_no_restriction() {
        let profile = Profile::new("p", "P", false).excluding(["foo"]);
        let input = names(&["bar", "foo", "baz", "foo-utils"]);
        assert_eq!(
            filter(input, Some(&profile)),
            names(&["bar", "baz", "foo-utils"])
        );
    }

    #[test]
    fn empty_profile_keeps_everything() {
        let profile = Profile::new("p", "P", false);
        let input = names(&["c", "a", "b"]);
        assert_eq!(filter(input.clone(), Some(&profile)), input);
    }

    #[test]
    fn include_list_restricts() {
        let profile = Profile::new("p", "P", false).including(["git", "gh"]);
        let input = names(&["gh", "node", "git", "python"]);
        assert_eq!(filter(input, Some(&profile)), names(&["gh", "git"]));
    }

    #[test]
    fn exclude_wins_over_include() {
        let profile = Profile::new("p", "P", false)
            .including(["git", "gh"])
            .excluding(["gh"]);
        let input = names(&["gh", "git"]);
        assert_eq!(filter(input, Some(&profile)), names(&["git"]));
    }

    #[test]
    fn filters_borrowed_records() {
        let records = vec![
            PackageRecord::new("git", PackageKind::Library, "2.44.0", "2.45.0"),
            PackageRecord::new("iterm2", PackageKind::Application, "3.4", "3.5"),
        ];
        let profile = Profile::new("p", "P", false).excluding(["iterm2"]);
        let borrowed: Vec<&PackageRecord> = records.iter().collect();
        let kept = filter(borrowed, Some(&profile));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "git");
    }

    #[test]
    fn visible_packages_applies_profile_then_safe_mode() {
        let packages = vec![
            PackageRecord::new("node", PackageKind::Library, "20.0.0", "22.0.0"),
            PackageRecord::new("git", PackageKind::Library, "2.44.0", "2.45.0"),
            PackageRecord::new("jq", PackageKind::Library, "1.7.0", "1.7.1"),
            PackageRecord::new("slack", PackageKind::Application, "4.36.0", "4.37.0"),
        ];
        let ranked = build(&packages, &HashMap::new(), &HashMap::new());
        let profile = Profile::new("work", "Work", true).excluding(["slack"]);

        let all: Vec<String> = visible_packages(ranked.clone(), Some(&profile), false)
            .into_iter()
            .map(|vm| vm.pkg.name)
            .collect();
        assert_eq!(all, names(&["node", "git", "jq"]));

        let safe: Vec<String> = visible_packages(ranked, Some(&profile), true)
            .into_iter()
            .map(|vm| vm.pkg.name)
            .collect();
        assert_eq!(safe, names(&["git", "jq"]));
    }
}
