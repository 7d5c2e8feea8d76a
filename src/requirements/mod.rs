//! Python requirements files.
//!
//! See [`reader::parse_requirements`] for the accepted line format.

pub mod reader;

pub use reader::{parse_requirements, read_requirements, PackageSpecifier};
