//! Package reference as given on the command line, e.g. `gcd` or `gcd@1.0.2`.

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PackageName, ValidationError};

/// Error returned when a package reference string cannot be parsed.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The name segment is invalid.
    #[error("invalid package name: {0}")]
    InvalidName(#[from] ValidationError),
    /// The version segment cannot be parsed as semver.
    #[error("invalid semver version: {0}")]
    InvalidVersion(#[from] semver::Error),
}

/// A package reference: a name with an optional pinned version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRef {
    /// Package name.
    pub name: PackageName,
    /// Optional pinned version; `None` means "latest".
    pub version: Option<Version>,
}

impl PackageRef {
    /// Parse a package reference from a string in the form `name[@version]`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the name or version segment is malformed.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let (name_str, version) = match input.split_once('@') {
            Some((left, v)) => (left, Some(Version::parse(v)?)),
            None => (input, None),
        };

        Ok(Self {
            name: PackageName::new(name_str)?,
            version,
        })
    }

    /// Build a reference with a pinned version.
    #[must_use]
    pub fn pinned(name: PackageName, version: Version) -> Self {
        Self {
            name,
            version: Some(version),
        }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(v) = &self.version {
            write!(f, "@{v}")?;
        }
        Ok(())
    }
}
