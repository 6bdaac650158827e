//! Operator profiles: name filtering and persistence.

pub mod filter;
pub mod store;

pub use filter::{PackageName, allows, filter, visible_packages};
pub use store::{ProfileSettings, ProfileStore};
