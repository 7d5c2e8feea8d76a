//! Requirements file parsing.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Result, SetupError};

const COMMENT_MARKER: char = '#';
const SECTION_MARKER: char = '=';

/// One package to install, exactly as written in the requirements file.
///
/// The text is passed to pip verbatim; `numpy`, `pandas>=2.0` and
/// `requests[socks]==2.31.0` are all valid specifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSpecifier(String);

impl PackageSpecifier {
    /// Wrap a specifier string.
    pub fn new(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    /// The specifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageSpecifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Parse requirements text into specifiers, preserving file order.
///
/// Blank lines, `#` comment lines and `=` section dividers are dropped.
/// Inline `#` comments are stripped from the remaining lines.
pub fn parse_requirements(content: &str) -> Vec<PackageSpecifier> {
    content.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<PackageSpecifier> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_MARKER) || line.starts_with(SECTION_MARKER) {
        return None;
    }

    let spec = line.split(COMMENT_MARKER).next().unwrap_or_default().trim();
    if spec.is_empty() {
        None
    } else {
        Some(PackageSpecifier::new(spec))
    }
}

/// Read and parse a requirements file.
///
/// # Errors
///
/// Returns `RequirementsNotFound` if the file doesn't exist.
pub fn read_requirements(path: &Path) -> Result<Vec<PackageSpecifier>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SetupError::RequirementsNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SetupError::Io(e)
        }
    })?;

    let specs = parse_requirements(&content);
    tracing::debug!("Read {} specifiers from {}", specs.len(), path.display());
    Ok(specs)
}
