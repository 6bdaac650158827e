//! Upgrade-risk assessment: per-package verdicts and the ranked view list.

pub mod assessor;
pub mod view_model;

pub use assessor::{RiskAssessment, RiskLevel, assess};
pub use view_model::{PackageViewModel, build, is_safe_upgrade};
