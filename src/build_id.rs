use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static BUILD_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    let number = r"(0|[1-9][0-9]*)";
    let pattern = format!(r"^v{number}\.{number}\.{number}(?:-([1-9][0-9]*)-([a-z0-9]+))?$");
    Regex::new(&pattern).expect("static regex must compile")
});

/// The error for a string which does not match the build identifier grammar.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid format")]
pub struct InvalidBuildId;

/// A build identifier: a semantic version triple, optionally followed by a development build
/// suffix of the form `-<commit count>-<revision>`.
///
/// Identifiers round-trip through [`FromStr`] and [`fmt::Display`]:
///
/// ```
/// use declargs::BuildId;
///
/// let id: BuildId = "v1.2.3-17-f1d2d2f".parse().unwrap();
/// assert_eq!(id.to_string(), "v1.2.3-17-f1d2d2f");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildId {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
    /// Number of commits since the release tag, for a development build.
    pub commit_count: Option<u32>,
    /// Revision identifier, for a development build.
    pub revision: Option<String>,
}

impl BuildId {
    /// Whether the identifier names a stable release, i.e. carries no development build suffix.
    pub fn is_stable(&self) -> bool {
        self.commit_count.is_none() && self.revision.is_none()
    }

    /// Order on the version triple, then on the commit count (absent counts as zero).
    /// A stable release sorts before or equal to any development build of the same triple.
    pub fn lower_or_equal(&self, other: &BuildId) -> bool {
        if self.major != other.major {
            return self.major < other.major;
        }

        if self.minor != other.minor {
            return self.minor < other.minor;
        }

        if self.patch != other.patch {
            return self.patch < other.patch;
        }

        self.commit_count.unwrap_or(0) <= other.commit_count.unwrap_or(0)
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;

        if let (Some(commit_count), Some(revision)) = (&self.commit_count, &self.revision) {
            write!(f, "-{commit_count}-{revision}")?;
        }

        Ok(())
    }
}

impl FromStr for BuildId {
    type Err = InvalidBuildId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let captures = BUILD_ID_RE.captures(value).ok_or(InvalidBuildId)?;
        let number = |i: usize| -> Result<u32, InvalidBuildId> {
            captures
                .get(i)
                .ok_or(InvalidBuildId)?
                .as_str()
                .parse()
                .map_err(|_| InvalidBuildId)
        };

        let mut id = BuildId {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            commit_count: None,
            revision: None,
        };

        if captures.get(4).is_some() {
            id.commit_count = Some(number(4)?);
            id.revision = captures.get(5).map(|m| m.as_str().to_string());
        }

        Ok(id)
    }
}
