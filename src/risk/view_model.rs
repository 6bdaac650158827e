use crate::domain::{DependencyImpact, PackageRecord, ReleaseLinks, VersionBump};
use crate::risk::assessor::{RiskAssessment, assess};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A package joined with its assessment and links for one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageViewModel {
    pub pkg: PackageRecord,
    pub risk: RiskAssessment,
    pub links: ReleaseLinks,
}

impl PackageViewModel {
    pub fn name(&self) -> &str {
        &self.pkg.name
    }

    /// Compact `LEVEL/BUMP` label, e.g. `HIGH/MAJOR`.
    pub fn badge(&self) -> String {
        format!(
            "{}/{}",
            self.risk.level.to_string().to_uppercase(),
            self.risk.bump.to_string().to_uppercase()
        )
    }
}

/// Assess every package and rank the result riskiest first, alphabetical
/// within a risk level.
pub fn build(
    packages: &[PackageRecord],
    impacts: &HashMap<String, DependencyImpact>,
    links: &HashMap<String, ReleaseLinks>,
) -> Vec<PackageViewModel> {
    let mut view_models: Vec<PackageViewModel> = packages
        .iter()
        .map(|pkg| PackageViewModel {
            risk: assess(pkg, impacts.get(&pkg.name)),
            links: links.get(&pkg.name).cloned().unwrap_or_default(),
            pkg: pkg.clone(),
        })
        .collect();

    view_models.sort_by(|a, b| {
        a.risk
            .level
            .rank()
            .cmp(&b.risk.level.rank())
            .then_with(|| a.pkg.name.cmp(&b.pkg.name))
    });

    view_models
}

/// Safe mode lens: only the size of the bump matters here. Dependents,
/// caveats and the computed risk level are deliberately not consulted.
pub fn is_safe_upgrade(view_model: &PackageViewModel) -> bool {
    matches!(view_model.risk.bump, VersionBump::Patch | VersionBump::Minor)
}
