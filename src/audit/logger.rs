use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Append-only history of executed git commands
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
    max_size: u64,
}

impl AuditLogger {
    /// Create an AuditLogger writing to `path`
    pub fn with_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let log_path = path.as_ref().to_path_buf();

        // Ensure directory exists
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            log_path,
            max_size: MAX_LOG_SIZE,
        })
    }

    /// Rotate once the log grows past `bytes`
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    /// Log a command execution
    ///
    /// Format: `[timestamp] [user] [dir] [exit:N] command`
    pub fn log_command(&self, command: &str, dir: &Path, exit_code: i32) -> std::io::Result<()> {
        self.rotate_if_needed()?;

        let timestamp = Utc::now().to_rfc3339();
        let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());

        let log_entry = format!(
            "[{}] [{}] [{}] [exit:{}] {}\n",
            timestamp,
            user,
            dir.display(),
            exit_code,
            command
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        file.write_all(log_entry.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Rotate log file if it exceeds the size limit
    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(&self.log_path)?;
        if metadata.len() > self.max_size {
            // Rotate: history.log -> history.log.1
            let backup_path = self.log_path.with_extension("log.1");
            fs::rename(&self.log_path, backup_path)?;
        }

        Ok(())
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_logger_makes_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("nested").join("history.log");

        let logger = AuditLogger::with_path(&log_path).unwrap();
        assert_eq!(logger.log_path(), log_path);
        assert!(log_path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_log_command() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("history.log");

        let logger = AuditLogger::with_path(&log_path).unwrap();
        logger
            .log_command("git rev-parse --abbrev-ref HEAD", Path::new("/test/repo"), 0)
            .unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("git rev-parse --abbrev-ref HEAD"));
        assert!(content.contains("[/test/repo]"));
        assert!(content.contains("exit:0"));
    }

    #[test]
    fn test_multiple_log_entries() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("history.log");

        let logger = AuditLogger::with_path(&log_path).unwrap();
        let repo_path = Path::new("/test/repo");

        logger.log_command("git status", repo_path, 0).unwrap();
        logger.log_command("git ls-remote --tags", repo_path, 0).unwrap();
        logger.log_command("git checkout --force --quiet nope", repo_path, 1).unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("exit:1"));
    }

    #[test]
    fn test_log_rotation() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("history.log");

        let logger = AuditLogger::with_path(&log_path).unwrap().with_max_size(64);
        let repo_path = Path::new("/test/repo");

        let large_command = "git ".to_string() + &"x".repeat(128);
        logger.log_command(&large_command, repo_path, 0).unwrap();

        // Next write rotates the oversized file away
        logger.log_command("git status", repo_path, 0).unwrap();

        let backup_path = log_path.with_extension("log.1");
        assert!(backup_path.exists());
        assert!(fs::read_to_string(&backup_path).unwrap().contains(&large_command));

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("git status"));
        assert!(!content.contains(&large_command));
    }
}
