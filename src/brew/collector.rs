use crate::brew::{PackageDetails, PackageManager};
use crate::domain::{DependencyImpact, PackageKind, PackageRecord};
use crate::error::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct CollectOptions {
    /// Query installed dependents for every outdated formula.
    pub with_impact: bool,
    pub show_progress: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            with_impact: true,
            show_progress: true,
        }
    }
}

/// Validated records for one refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub packages: Vec<PackageRecord>,
    pub impacts: HashMap<String, DependencyImpact>,
}

/// Gather outdated packages, their metadata and their installed dependents.
///
/// Only listing outdated packages may fail. Metadata and dependent lookups
/// that fail are logged and treated as "no data".
pub fn collect(manager: &dyn PackageManager, options: CollectOptions) -> Result<Collected> {
    let outdated = manager.outdated()?;
    log::debug!("Found {} outdated package(s)", outdated.len());

    let mut details = HashMap::new();
    for kind in [PackageKind::Library, PackageKind::Application] {
        let names: Vec<String> = outdated
            .iter()
            .filter(|pkg| pkg.kind == kind)
            .map(|pkg| pkg.name.clone())
            .collect();

        match manager.details(kind, &names) {
            Ok(found) => details.extend(found),
            Err(e) => log::warn!("Skipping {kind} metadata: {e}"),
        }
    }

    let packages: Vec<PackageRecord> = outdated
        .into_iter()
        .map(|pkg| {
            let found = details.get(&pkg.name);
            enrich(pkg, found)
        })
        .collect();

    let impacts = if options.with_impact {
        dependency_impacts(manager, &packages, options.show_progress)
    } else {
        packages
            .iter()
            .map(|pkg| (pkg.name.clone(), DependencyImpact::none(&pkg.name)))
            .collect()
    };

    Ok(Collected { packages, impacts })
}

/// Metadata fills in only what it actually provides.
fn enrich(mut pkg: PackageRecord, details: Option<&PackageDetails>) -> PackageRecord {
    if let Some(details) = details {
        if details.homepage.is_some() {
            pkg.homepage = details.homepage.clone();
        }
        if details.caveats.is_some() {
            pkg.caveats = details.caveats.clone();
        }
    }
    pkg
}

fn dependency_impacts(
    manager: &dyn PackageManager,
    packages: &[PackageRecord],
    show_progress: bool,
) -> HashMap<String, DependencyImpact> {
    let pb = ProgressBar::new(packages.len() as u64);
    if !show_progress {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    if let Ok(style) = ProgressStyle::default_bar().template("  [{bar:40}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("=>-"));
    }

    let mut impacts = HashMap::with_capacity(packages.len());
    for pkg in packages {
        pb.set_message(format!("Checking dependents of {}", pkg.name));

        // Casks cannot be depended upon.
        let dependents = match pkg.kind {
            PackageKind::Application => Vec::new(),
            PackageKind::Library => manager.dependents(&pkg.name).unwrap_or_else(|e| {
                log::warn!("Treating {} as having no dependents: {e}", pkg.name);
                Vec::new()
            }),
        };

        impacts.insert(pkg.name.clone(), DependencyImpact::new(&pkg.name, dependents));
        pb.inc(1);
    }
    pb.finish_and_clear();

    impacts
}
