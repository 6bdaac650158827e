pub mod types;
pub mod version;

pub use types::{DependencyImpact, PackageKind, PackageRecord, Profile, ReleaseLinks};
pub use version::{classify, VersionBump, VersionTriple};
