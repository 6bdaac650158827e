use crate::error::{BrewkeeperError, Result};
use std::path::{Path, PathBuf};

const FORBIDDEN: &[&str] = &["/etc", "/sys", "/proc", "/dev", "/boot"];

/// Guards the handful of paths brewkeeper reads from or writes to.
pub struct PathValidator;

impl PathValidator {
    /// Canonicalises a configuration directory and refuses system locations.
    pub fn validate_config_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();

        let canonical = path.canonicalize().map_err(|e| {
            BrewkeeperError::PathValidation(format!("Invalid path '{}': {e}", path.display()))
        })?;

        if !canonical.is_dir() {
            return Err(BrewkeeperError::PathValidation(format!(
                "Path '{}' is not a directory",
                canonical.display()
            )));
        }

        Self::reject_system_dir(path, &canonical)?;
        Ok(canonical)
    }

    /// Canonicalises a payload file given on the command line.
    pub fn validate_input_file(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();

        let canonical = path.canonicalize().map_err(|e| {
            BrewkeeperError::PathValidation(format!(
                "Invalid input file '{}': {e}",
                path.display()
            ))
        })?;

        if !canonical.is_file() {
            return Err(BrewkeeperError::PathValidation(format!(
                "Path '{}' is not a regular file",
                canonical.display()
            )));
        }

        Ok(canonical)
    }

    fn reject_system_dir(original: &Path, canonical: &Path) -> Result<()> {
        for forbidden in FORBIDDEN {
            let forbidden_path = Path::new(forbidden);

            let blocked = original.starts_with(forbidden_path)
                || canonical.starts_with(forbidden_path)
                || forbidden_path
                    .canonicalize()
                    .map(|resolved| canonical.starts_with(resolved))
                    .unwrap_or(false);

            if blocked {
                return Err(BrewkeeperError::PathValidation(format!(
                    "Access to system directory '{}' is not allowed",
                    forbidden
                )));
            }
        }
        Ok(())
    }
}
