use crate::brew::payload::parse_outdated;
use crate::brew::{PackageDetails, PackageManager};
use crate::domain::{PackageKind, PackageRecord};
use crate::error::Result;
use crate::utils::PathValidator;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A saved `brew outdated --json=v2` payload. Carries no metadata and no
/// dependents.
pub struct OfflineSource {
    packages: Vec<PackageRecord>,
}

impl OfflineSource {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = PathValidator::validate_input_file(path)?;
        log::debug!("Reading outdated payload from {}", path.display());
        let raw = fs::read_to_string(&path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self {
            packages: parse_outdated(json)?,
        })
    }
}

impl PackageManager for OfflineSource {
    fn outdated(&self) -> Result<Vec<PackageRecord>> {
        Ok(self.packages.clone())
    }

    fn details(
        &self,
        _kind: PackageKind,
        _names: &[String],
    ) -> Result<HashMap<String, PackageDetails>> {
        Ok(HashMap::new())
    }

    fn dependents(&self, _name: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
