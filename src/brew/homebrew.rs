use crate::brew::payload::{parse_dependents, parse_info, parse_outdated};
use crate::brew::{PackageDetails, PackageManager};
use crate::domain::{PackageKind, PackageRecord};
use crate::error::{BrewkeeperError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Runs the `brew` executable.
pub struct Homebrew {
    program: PathBuf,
}

impl Homebrew {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        log::debug!("Executing: {} {}", self.program.display(), args.join(" "));

        Command::new(&self.program)
            .args(args)
            .env("HOMEBREW_NO_AUTO_UPDATE", "1")
            .output()
            .map_err(|e| {
                BrewkeeperError::BrewExecution(format!(
                    "Failed to execute '{} {}': {e}",
                    self.program.display(),
                    args.join(" ")
                ))
            })
    }

    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        Self::ensure_success(&output, &args.join(" "))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn ensure_success(output: &Output, command: &str) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if stderr.trim().is_empty() {
            format!(
                "brew {} exited with code {}",
                command,
                output.status.code().unwrap_or(-1)
            )
        } else {
            format!("brew {} failed: {}", command, stderr.trim())
        };
        Err(BrewkeeperError::BrewExecution(message))
    }
}

impl Default for Homebrew {
    fn default() -> Self {
        Self::new("brew")
    }
}

impl PackageManager for Homebrew {
    fn outdated(&self) -> Result<Vec<PackageRecord>> {
        let stdout = self.run_checked(&["outdated", "--json=v2"])?;
        parse_outdated(&stdout)
    }

    fn details(
        &self,
        kind: PackageKind,
        names: &[String],
    ) -> Result<HashMap<String, PackageDetails>> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }

        let mut args = vec!["info", "--json=v2"];
        if kind == PackageKind::Application {
            args.push("--cask");
        }
        args.extend(names.iter().map(String::as_str));

        let stdout = self.run_checked(&args)?;
        parse_info(&stdout, kind)
    }

    fn dependents(&self, name: &str) -> Result<Vec<String>> {
        let stdout = self.run_checked(&["uses", "--installed", "--recursive", name])?;
        Ok(parse_dependents(&stdout))
    }
}
