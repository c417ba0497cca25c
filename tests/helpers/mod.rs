use gitfacade::config::GitConfig;
use gitfacade::{GitExecutor, Repository};
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Author date of the first commit made by [`create_commit_at`] callers
pub const BASE_TIME: i64 = 1472399160;

/// Run git in `repo_path`, panicking on failure
pub fn git(repo_path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Helper to create a test git repository on branch `main`
pub fn create_test_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().canonicalize().unwrap();

    git(&repo_path, &["init", "--quiet"]);
    git(&repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(&repo_path, &["config", "user.name", "Test User"]);
    git(&repo_path, &["config", "user.email", "test@example.com"]);
    git(&repo_path, &["config", "commit.gpgsign", "false"]);
    git(&repo_path, &["config", "tag.gpgsign", "false"]);

    (temp_dir, repo_path)
}

/// Helper to create a commit with fixed author and committer dates
pub fn create_commit_at(repo_path: &Path, file: &str, content: &str, message: &str, time: i64) -> String {
    fs::write(repo_path.join(file), content).expect("Failed to write file");
    git(repo_path, &["add", file]);

    let date = format!("{} +0000", time);
    let output = Command::new("git")
        .args(["commit", "--quiet", "-m", message])
        .env("GIT_AUTHOR_DATE", &date)
        .env("GIT_COMMITTER_DATE", &date)
        .current_dir(repo_path)
        .output()
        .expect("Failed to commit");
    assert!(output.status.success(), "commit failed: {}", String::from_utf8_lossy(&output.stderr));

    git(repo_path, &["rev-parse", "HEAD"])
}

/// Helper to create a commit; successive calls get later dates
pub fn create_commit(repo_path: &Path, file: &str, content: &str, message: &str) -> String {
    let count = git_count(repo_path);
    create_commit_at(repo_path, file, content, message, BASE_TIME + count * 60)
}

fn git_count(repo_path: &Path) -> i64 {
    let output = Command::new("git")
        .args(["rev-list", "--count", "HEAD"])
        .current_dir(repo_path)
        .output()
        .expect("Failed to count commits");
    String::from_utf8_lossy(&output.stdout).trim().parse().unwrap_or(0)
}

/// Open `path` with an executor that does not pause between commands
#[allow(dead_code)] // unused by the CLI tests
pub fn open_repository(path: &Path) -> Repository {
    let config = GitConfig {
        settle_delay_micros: 0,
        ..GitConfig::default()
    };
    Repository::with_runner(path, GitExecutor::with_config(config)).expect("Failed to open repository")
}
