//! `major.minor` versions for interpreters and packages.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*v?(\d+)(?:\.(\d+))?").unwrap());

/// A `major.minor` version, ordered numerically.
///
/// Patch levels and pre-release suffixes are ignored when parsing, so
/// `"2.1.0rc1"` and `"2.1"` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawVersion", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// Create a version from its parts.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether this version is at least `floor`.
    pub fn satisfies(&self, floor: Version) -> bool {
        *self >= floor
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = VERSION_PREFIX
            .captures(s)
            .ok_or_else(|| format!("invalid version: {}", s))?;

        let major = caps[1]
            .parse()
            .map_err(|_| format!("invalid version: {}", s))?;
        let minor = match caps.get(2) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| format!("invalid version: {}", s))?,
            None => 0,
        };

        Ok(Self { major, minor })
    }
}

/// Config files may write `min_python: "3.9"` or a bare major such as `2`.
///
/// Unquoted decimals are refused: YAML reads `3.10` as the float `3.1`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Text(String),
    Major(u32),
    Float(f64),
}

impl TryFrom<RawVersion> for Version {
    type Error = String;

    fn try_from(value: RawVersion) -> Result<Self, Self::Error> {
        match value {
            RawVersion::Text(s) => s.parse(),
            RawVersion::Major(major) => Ok(Self::new(major, 0)),
            RawVersion::Float(n) => Err(format!(
                "version {} must be quoted (e.g. \"3.10\") so trailing zeros are kept",
                n
            )),
        }
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}
