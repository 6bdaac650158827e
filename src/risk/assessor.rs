use crate::domain::{DependencyImpact, PackageRecord, VersionBump, classify};
use serde::{Deserialize, Serialize};
use std::fmt;

/// At most this many dependents are kept for display.
pub const IMPACT_PREVIEW_LIMIT: usize = 6;
/// Caveat text is cut to this many characters.
pub const CAVEAT_WARNING_LIMIT: usize = 180;
/// This many dependents make an upgrade high risk on their own.
pub const HIGH_IMPACT_THRESHOLD: usize = 5;

/// Ordered riskiest first: `High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Sort rank: high = 0, medium = 1, low = 2.
    pub fn rank(self) -> u8 {
        match self {
            RiskLevel::High => 0,
            RiskLevel::Medium => 1,
            RiskLevel::Low => 2,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub package_name: String,
    pub bump: VersionBump,
    pub likely_breaking: bool,
    pub dependency_impact_count: usize,
    pub dependency_impact_preview: Vec<String>,
    pub caveat_warning: Option<String>,
    pub level: RiskLevel,
    pub reasons: Vec<String>,
}

/// Assess the upgrade risk of one package. Pure and total: a missing impact
/// record counts as zero dependents.
pub fn assess(pkg: &PackageRecord, impact: Option<&DependencyImpact>) -> RiskAssessment {
    let bump = classify(&pkg.current_version, &pkg.latest_version);

    let dependents = impact.map(|i| i.dependents.as_slice()).unwrap_or_default();
    let dependency_impact_count = dependents.len();
    let dependency_impact_preview = dependents
        .iter()
        .take(IMPACT_PREVIEW_LIMIT)
        .cloned()
        .collect();

    let caveat_warning = caveat_warning(pkg.caveats.as_deref());
    let has_caveat = caveat_warning.is_some();
    let likely_breaking = bump == VersionBump::Major || has_caveat;

    RiskAssessment {
        package_name: pkg.name.clone(),
        bump,
        likely_breaking,
        dependency_impact_count,
        dependency_impact_preview,
        caveat_warning,
        level: risk_level(bump, dependency_impact_count, has_caveat),
        reasons: reasons(bump, dependency_impact_count, has_caveat),
    }
}

fn caveat_warning(caveats: Option<&str>) -> Option<String> {
    let trimmed = caveats?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(CAVEAT_WARNING_LIMIT).collect())
}

fn risk_level(bump: VersionBump, impact_count: usize, has_caveat: bool) -> RiskLevel {
    if bump == VersionBump::Major {
        return RiskLevel::High;
    }
    if impact_count >= HIGH_IMPACT_THRESHOLD || has_caveat {
        return RiskLevel::High;
    }
    if bump == VersionBump::Minor || impact_count >= 1 {
        return RiskLevel::Medium;
    }
    RiskLevel::Low
}

fn reasons(bump: VersionBump, impact_count: usize, has_caveat: bool) -> Vec<String> {
    let mut reasons = Vec::with_capacity(3);

    let bump_reason = match bump {
        VersionBump::Major => "Major version bump detected.",
        VersionBump::Minor => "Minor version bump; potential behavior changes.",
        VersionBump::Patch => "Patch release; generally safer update.",
        VersionBump::Unknown => "Could not confidently classify semantic version bump.",
    };
    reasons.push(bump_reason.to_string());

    if impact_count > 0 {
        reasons.push(format!(
            "Impacts {} installed dependent package(s).",
            impact_count
        ));
    }
    if has_caveat {
        reasons.push(
            "Homebrew caveats indicate additional migration or runtime caution.".to_string(),
        );
    }

    reasons
}
