use crate::error::{GitError, GitResult};
use crate::git::executor::{CommandRunner, GitCommand, GitExecutor};
use crate::git::failure::FailureKind;
use crate::git::log;
use crate::git::revision::Revision;
use crate::git::status::{self, StatusReport};
use crate::git::tags::{self, TagMap};
use std::fs;
use std::path::{Path, PathBuf};

/// A git working directory and the runner used to query it
///
/// Holds no cached state: every call runs exactly one git command.
#[derive(Debug)]
pub struct Repository<R = GitExecutor> {
    path: PathBuf,
    runner: R,
}

impl Repository<GitExecutor> {
    /// Bind to `path` using a default [`GitExecutor`]
    pub fn open<P: AsRef<Path>>(path: P) -> GitResult<Self> {
        Self::with_runner(path, GitExecutor::new())
    }
}

impl<R: CommandRunner> Repository<R> {
    /// Bind to `path` using `runner`
    ///
    /// The path is canonicalized when it exists and made absolute otherwise,
    /// so a handle can point at the target of a clone that has not run yet.
    pub fn with_runner<P: AsRef<Path>>(path: P, runner: R) -> GitResult<Self> {
        let path = resolve_path(path.as_ref())?;
        Ok(Self { path, runner })
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, command: &GitCommand) -> GitResult<Vec<String>> {
        self.runner.run(command, Some(&self.path))
    }

    /// Clone `url` into `path`, or into git's default directory when `None`
    pub fn clone_repo(runner: &R, url: &str, path: Option<&Path>) -> GitResult<()> {
        let mut command = GitCommand::new("clone").arg(url);
        if let Some(path) = path {
            command = command.arg(path.display().to_string());
        }

        runner.run(&command, None)?;
        Ok(())
    }

    /// Clone `url` into `path`, defaulting to this repository's path
    pub fn clone_remote(&self, url: &str, path: Option<&Path>) -> GitResult<()> {
        let target = path.unwrap_or(self.path.as_path());
        Self::clone_repo(&self.runner, url, Some(target))
    }

    /// Force-checkout a revision, branch or tag
    pub fn checkout(&self, revision: &str) -> GitResult<()> {
        let command = GitCommand::new("checkout")
            .args(["--force", "--quiet"])
            .arg(revision);

        self.run(&command)?;
        Ok(())
    }

    /// Run `git fetch` with whitespace separated `args`
    pub fn fetch(&self, args: &str) -> GitResult<()> {
        let command = GitCommand::new("fetch").args(args.split_whitespace());

        self.run(&command)?;
        Ok(())
    }

    /// Get the current branch name (`HEAD` when detached)
    pub fn current_branch(&self) -> GitResult<String> {
        let command = GitCommand::new("rev-parse").args(["--abbrev-ref", "HEAD"]);
        let lines = self.run(&command)?;

        match lines.first() {
            Some(branch) if !branch.trim().is_empty() => Ok(branch.trim().to_string()),
            _ => Err(GitError::unexpected(command.command_line(Some(&self.path)), &lines)),
        }
    }

    /// List up to `limit` non-merge revisions, newest first unless `ascending`
    pub fn revisions(&self, limit: i64, ascending: bool) -> GitResult<Vec<Revision>> {
        let sentinel = log::generate_sentinel();
        let command = log::log_command(limit, ascending, &sentinel);
        let lines = self.run(&command)?;

        log::parse_revisions(&lines, &sentinel)
            .map_err(|_| GitError::unexpected(command.command_line(Some(&self.path)), &lines))
    }

    /// The most recent non-merge revision
    pub fn current_revision(&self) -> GitResult<Option<Revision>> {
        Ok(self.revisions(1, false)?.into_iter().next())
    }

    /// The non-merge revision before the current one
    pub fn previous_revision(&self) -> GitResult<Option<Revision>> {
        Ok(self.revisions(2, false)?.into_iter().nth(1))
    }

    /// Diff between two revisions as one block of text
    pub fn diff(&self, from: &str, to: &str) -> GitResult<String> {
        let command = GitCommand::new("diff").arg("--no-ext-diff").args([from, to]);
        Ok(self.run(&command)?.join("\n"))
    }

    /// Tags of `remote`, or of the default remote when `None`
    pub fn remote_tags(&self, remote: Option<&str>) -> GitResult<TagMap> {
        let command = GitCommand::new("ls-remote").arg("--tags").args(remote);
        let lines = self.run(&command)?;

        Ok(tags::parse_tag_listing(&lines))
    }

    /// Name of the remote tag pointing at `hash`
    pub fn tag_for_hash(&self, hash: &str, remote: Option<&str>) -> GitResult<Option<String>> {
        let tags = self.remote_tags(remote)?;
        Ok(tags.tag_for_hash(hash).map(str::to_string))
    }

    pub fn status(&self) -> GitResult<StatusReport> {
        let lines = self.run(&GitCommand::new("status"))?;
        Ok(status::parse_status(&lines))
    }

    pub fn is_working_copy_clean(&self) -> GitResult<bool> {
        let lines = self.run(&GitCommand::new("status"))?;
        Ok(status::is_clean_status(&lines))
    }

    /// Whether `path` (default: this repository's path) is inside a work tree
    pub fn is_repository(&self, path: Option<&Path>) -> GitResult<bool> {
        Self::is_repository_at(&self.runner, path.unwrap_or(self.path.as_path()))
    }

    /// Whether `path` is inside a work tree
    ///
    /// A "not a git repository" failure answers `false`; any other failure is
    /// returned as an error.
    pub fn is_repository_at(runner: &R, path: &Path) -> GitResult<bool> {
        let command = GitCommand::new("rev-parse").arg("--is-inside-work-tree");

        match runner.run(&command, Some(path)) {
            Ok(lines) => Ok(lines.first().is_some_and(|line| line.trim() == "true")),
            Err(err) if err.failure_kind() == Some(FailureKind::NotARepository) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

fn resolve_path(path: &Path) -> GitResult<PathBuf> {
    let resolved = fs::canonicalize(path).or_else(|_| std::path::absolute(path))?;
    Ok(resolved)
}
