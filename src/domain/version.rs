use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// First numeric run: `major[.minor[.patch]]`. ASCII digits only.
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)(?:\.([0-9]+))?(?:\.([0-9]+))?").expect("version pattern is valid")
});

/// Magnitude of change between two version strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
    Unknown,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
            VersionBump::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// The `(major, minor, patch)` triple pulled out of a free-form version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionTriple {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionTriple {
    /// Best-effort parse. Everything outside the first numeric run is ignored,
    /// so `v1.2.3-beta+7` yields `1.2.3` and `1.2` yields `1.2.0`.
    pub fn parse(version: &str) -> Option<Self> {
        let captures = VERSION_RE.captures(version)?;

        let major = captures.get(1)?.as_str().parse::<u64>().ok()?;
        let minor = Self::component(captures.get(2))?;
        let patch = Self::component(captures.get(3))?;

        Some(Self {
            major,
            minor,
            patch,
        })
    }

    fn component(group: Option<regex::Match<'_>>) -> Option<u64> {
        match group {
            Some(m) => m.as_str().parse::<u64>().ok(),
            None => Some(0),
        }
    }
}

impl fmt::Display for VersionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Classify the bump from `from` to `to`.
///
/// The first differing component decides: if `to` is larger there the bump
/// is that component's kind, otherwise (equal versions or a downgrade) the
/// result is [`VersionBump::Unknown`]. Unparsable input is also `Unknown`.
pub fn classify(from: &str, to: &str) -> VersionBump {
    let (Some(from), Some(to)) = (VersionTriple::parse(from), VersionTriple::parse(to)) else {
        return VersionBump::Unknown;
    };

    let steps = [
        (from.major.cmp(&to.major), VersionBump::Major),
        (from.minor.cmp(&to.minor), VersionBump::Minor),
        (from.patch.cmp(&to.patch), VersionBump::Patch),
    ];

    for (ordering, bump) in steps {
        match ordering {
            Ordering::Equal => continue,
            Ordering::Less => return bump,
            Ordering::Greater => return VersionBump::Unknown,
        }
    }

    VersionBump::Unknown
}
