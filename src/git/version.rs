use crate::error::{GitError, GitResult};
use crate::git::executor::{CommandRunner, GitCommand};

/// Oldest git that understands `git -C <dir>`
const MIN_GIT_VERSION: (u32, u32, u32) = (1, 8, 5);

/// Represents a git version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GitVersion {
    /// Detect the git version behind `runner`
    pub fn detect<R: CommandRunner + ?Sized>(runner: &R) -> GitResult<Self> {
        let lines = runner.run(&GitCommand::new("--version"), None)?;
        let first = lines.first().map(String::as_str).unwrap_or_default();

        Self::parse(first)
    }

    /// Parse git version from string like "git version 2.39.2"
    pub fn parse(version_str: &str) -> GitResult<Self> {
        let invalid = || GitError::UnexpectedOutput {
            command: "git --version".to_string(),
            output: version_str.to_string(),
        };

        // Expected format: "git version X.Y.Z" or "git version X.Y.Z.windows.1" etc.
        let parts: Vec<&str> = version_str.split_whitespace().collect();
        if parts.len() < 3 || parts[0] != "git" || parts[1] != "version" {
            return Err(invalid());
        }

        let nums: Vec<&str> = parts[2].split('.').collect();
        if nums.len() < 2 {
            return Err(invalid());
        }

        let major = nums[0].parse::<u32>().map_err(|_| invalid())?;
        let minor = nums[1].parse::<u32>().map_err(|_| invalid())?;
        // Patch may carry a suffix such as "rc1"
        let patch = nums
            .get(2)
            .and_then(|p| p.parse::<u32>().ok())
            .unwrap_or(0);

        Ok(GitVersion {
            major,
            minor,
            patch,
        })
    }

    /// Check if this version meets minimum requirements
    pub fn is_supported(&self) -> bool {
        (self.major, self.minor, self.patch) >= MIN_GIT_VERSION
    }

    /// Detect the version and fail when it is too old
    pub fn validate<R: CommandRunner + ?Sized>(runner: &R) -> GitResult<Self> {
        let version = Self::detect(runner)?;

        if !version.is_supported() {
            return Err(GitError::VersionTooOld(version.to_string()));
        }

        Ok(version)
    }
}

impl std::fmt::Display for GitVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
