//! Brewkeeper: review outdated Homebrew packages ranked by upgrade risk.
//!
//! Packages are collected from `brew` (or a saved `brew outdated --json=v2`
//! payload), classified by semantic-version bump, scored against installed
//! dependents and caveats, then filtered through the active operator profile.

pub mod brew;
pub mod domain;
pub mod error;
pub mod profile;
pub mod releases;
pub mod risk;
pub mod utils;
pub mod workflow;

pub use error::{BrewkeeperError, Result};
