//! Classification of git failure output.
//!
//! git only reports what went wrong through human-readable text. Every
//! decision that depends on that text goes through [`classify`], so a change
//! in git's wording needs one update here.

/// Broad category of a failed git command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The target directory is not inside a work tree
    NotARepository,
    /// The current branch has no commits yet
    NoCommits,
    /// A revision, path or ref given to git does not exist
    UnknownRevision,
    /// The remote could not be reached or does not exist
    RemoteNotFound,
    /// Credentials were missing or rejected
    AuthenticationFailed,
    /// Local changes would be overwritten
    LocalChanges,
    Other,
}

/// Match common git failure messages
pub fn classify(output: &str) -> FailureKind {
    let lower = output.to_lowercase();

    if lower.contains("not a git repository") {
        return FailureKind::NotARepository;
    }

    if lower.contains("does not have any commits yet") {
        return FailureKind::NoCommits;
    }

    if lower.contains("unknown revision")
        || lower.contains("bad revision")
        || (lower.contains("pathspec") && lower.contains("did not match"))
    {
        return FailureKind::UnknownRevision;
    }

    if lower.contains("authentication failed") || lower.contains("permission denied") {
        return FailureKind::AuthenticationFailed;
    }

    if lower.contains("does not appear to be a git repository")
        || lower.contains("repository not found")
        || lower.contains("could not read from remote")
    {
        return FailureKind::RemoteNotFound;
    }

    if lower.contains("would be overwritten") {
        return FailureKind::LocalChanges;
    }

    FailureKind::Other
}
