//! Package installation through pip.
//!
//! - [`PackageManager`] is the seam to pip; [`Pip`] is the real one
//! - [`install_all`] installs specifiers one at a time, in order
//! - [`InstallationSummary`] aggregates the run for the log and exit code

pub mod outcome;
pub mod pip;
pub mod runner;
pub mod summary;

pub use outcome::{InstallOutcome, InstallRecord};
pub use pip::{PackageManager, Pip, LISTING_UNAVAILABLE};
pub use runner::{install_all, upgrade_package_manager};
pub use summary::InstallationSummary;
