//! Package data collection from Homebrew.

pub mod collector;
pub mod homebrew;
pub mod offline;
pub mod payload;

use crate::domain::{PackageKind, PackageRecord};
use crate::error::Result;
use std::collections::HashMap;

pub use collector::{CollectOptions, Collected, collect};
pub use homebrew::Homebrew;
pub use offline::OfflineSource;

/// Metadata that `outdated` does not report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageDetails {
    pub homepage: Option<String>,
    pub caveats: Option<String>,
}

impl PackageDetails {
    /// Blank caveats are treated as absent.
    pub fn new(homepage: Option<String>, caveats: Option<String>) -> Self {
        Self {
            homepage,
            caveats: caveats.filter(|text| !text.trim().is_empty()),
        }
    }
}

/// Source of outdated-package data.
pub trait PackageManager: Send + Sync {
    fn outdated(&self) -> Result<Vec<PackageRecord>>;

    /// Homepage and caveats for the named packages of one kind.
    fn details(&self, kind: PackageKind, names: &[String])
    -> Result<HashMap<String, PackageDetails>>;

    /// Installed packages that transitively depend on `name`, in reported order.
    fn dependents(&self, name: &str) -> Result<Vec<String>>;
}
