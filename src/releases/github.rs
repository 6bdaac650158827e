use crate::error::{BrewkeeperError, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const GITHUB_API: &str = "https://api.github.com";
/// Release notes are cut to this many characters.
pub const NOTES_LIMIT: usize = 400;

/// `owner/repo` of a GitHub project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubRepo {
    pub owner: String,
    pub repo: String,
}

impl GithubRepo {
    /// Recognise `https://github.com/<owner>/<repo>[/...]` homepages.
    pub fn from_url(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        if parsed.host_str() != Some("github.com") {
            return None;
        }

        let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
        let owner = segments.next()?;
        let repo = segments.next()?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if repo.is_empty() {
            return None;
        }

        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn web_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    body: Option<String>,
}

/// Fetches release notes from the GitHub REST API.
pub struct GithubClient {
    client: Client,
    api_base: String,
}

impl GithubClient {
    pub fn new() -> Result<Self> {
        Self::with_base(GITHUB_API)
    }

    pub fn with_base(api_base: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("brewkeeper/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| BrewkeeperError::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Body of the latest release, trimmed and cut to [`NOTES_LIMIT`]
    /// characters. Any failure yields `None`.
    pub fn latest_release_notes(&self, repo: &GithubRepo) -> Option<String> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, repo.owner, repo.repo
        );
        log::debug!("Fetching: {}", url);

        let response = match self.client.get(&url).send() {
            Ok(resp) => resp,
            Err(e) => {
                log::debug!("Request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            log::debug!("HTTP {}: {}", response.status(), url);
            return None;
        }

        let release: LatestRelease = match response.json() {
            Ok(release) => release,
            Err(e) => {
                log::debug!("Unreadable release payload from {}: {}", url, e);
                return None;
            }
        };

        release.body.as_deref().and_then(truncate_notes)
    }
}

fn truncate_notes(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(NOTES_LIMIT).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_github_homepages() {
        let repo = GithubRepo::from_url("https://github.com/jqlang/jq").unwrap();
        assert_eq!(repo.owner, "jqlang");
        assert_eq!(repo.repo, "jq");
        assert_eq!(repo.web_url(), "https://github.com/jqlang/jq");

        let repo = GithubRepo::from_url("https://github.com/cli/cli.git").unwrap();
        assert_eq!(repo.repo, "cli");

        let repo = GithubRepo::from_url("https://github.com/BurntSushi/ripgrep/tree/master").unwrap();
        assert_eq!(repo.owner, "BurntSushi");
        assert_eq!(repo.repo, "ripgrep");
    }

    #[test]
    fn rejects_other_hosts_and_short_paths() {
        assert_eq!(GithubRepo::from_url("https://nodejs.org/"), None);
        assert_eq!(GithubRepo::from_url("https://gist.github.com/a/b"), None);
        assert_eq!(GithubRepo::from_url("https://github.com/only-owner"), None);
        assert_eq!(GithubRepo::from_url("not a url"), None);
    }

    #[test]
    fn notes_are_trimmed_and_truncated() {
        assert_eq!(truncate_notes("  \n "), None);
        assert_eq!(truncate_notes("\n## Fixes\n").as_deref(), Some("## Fixes"));
        let long = "x".repeat(1000);
        assert_eq!(truncate_notes(&long).unwrap().len(), NOTES_LIMIT);
    }

    #[test]
    #[ignore] // Requires network access
    fn fetches_real_release_notes() {
        let client = GithubClient::new().unwrap();
        let repo = GithubRepo::from_url("https://github.com/jqlang/jq").unwrap();
        let notes = client.latest_release_notes(&repo);
        assert!(notes.is_some());
    }
}
