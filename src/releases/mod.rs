//! Release-link resolution. Purely decorative: nothing here affects risk.

pub mod github;

use crate::domain::{PackageRecord, ReleaseLinks};
use std::collections::HashMap;

pub use github::{GithubClient, GithubRepo};

impl ReleaseLinks {
    /// Links derivable from a homepage alone, without any network access.
    pub fn from_homepage(homepage: Option<&str>) -> Self {
        let Some(homepage) = homepage else {
            return Self::default();
        };

        let mut links = Self {
            homepage: Some(homepage.to_string()),
            ..Self::default()
        };
        if let Some(repo) = GithubRepo::from_url(homepage) {
            let base = repo.web_url();
            links.releases = Some(format!("{base}/releases"));
            links.changelog = Some(format!("{base}/blob/HEAD/CHANGELOG.md"));
            links.repository = Some(base);
        }
        links
    }
}

/// Links for every package, keyed by name. With a client, GitHub-hosted
/// packages also get their latest release notes.
pub fn resolve_links(
    packages: &[PackageRecord],
    client: Option<&GithubClient>,
) -> HashMap<String, ReleaseLinks> {
    packages
        .iter()
        .map(|pkg| {
            let mut links = ReleaseLinks::from_homepage(pkg.homepage.as_deref());
            if let (Some(client), Some(repo)) = (
                client,
                pkg.homepage.as_deref().and_then(GithubRepo::from_url),
            ) {
                links.latest_notes = client.latest_release_notes(&repo);
            }
            (pkg.name.clone(), links)
        })
        .collect()
}
