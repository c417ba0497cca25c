//! Parsing of sentinel-terminated `git log` output.
//!
//! Each commit is printed as five fields joined by [`FIELD_SEPARATOR`] and
//! followed by a line holding a random sentinel. The message field is `%B`,
//! so a record usually spans several lines; only the sentinel line ends it.

use crate::error::{GitError, GitResult};
use crate::git::executor::GitCommand;
use crate::git::revision::Revision;
use uuid::Uuid;

/// Separator between the fields of one log record
pub const FIELD_SEPARATOR: &str = ";;;";

/// Number of fields in a log record: hash, message, author, email, epoch
const RECORD_FIELDS: usize = 5;

/// Generate a single-use end-of-record marker such as `end:3f9a01c2`
pub fn generate_sentinel() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("end:{}", &id[..8])
}

/// Build the log query for at most `limit` non-merge commits
///
/// Negative limits count the same as positive ones. `ascending` lists the
/// oldest commit first.
pub fn log_command(limit: i64, ascending: bool, sentinel: &str) -> GitCommand {
    let sep = FIELD_SEPARATOR;
    let command = GitCommand::new("log")
        .arg("--no-merges")
        .arg("--date-order")
        .arg(format!(
            "--format=%H{sep} %B{sep} %an{sep} %ae{sep} %at %n{sentinel}"
        ));

    let command = if ascending {
        command.arg("--reverse")
    } else {
        command
    };

    command.arg(format!("-{}", limit.unsigned_abs()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Collecting(String),
}

/// Line-by-line accumulator for sentinel-terminated log records
#[derive(Debug, Clone)]
pub struct LogAccumulator {
    sentinel: String,
    state: State,
}

impl LogAccumulator {
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
            state: State::Idle,
        }
    }

    /// Feed one output line
    ///
    /// Returns the finished revision when `line` is the sentinel closing a
    /// non-empty record. A sentinel arriving with nothing collected is kept
    /// as record text.
    pub fn push(&mut self, line: &str) -> GitResult<Option<Revision>> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Collecting(record) if line == self.sentinel && !record.is_empty() => {
                split_record(&record).map(Some)
            }
            State::Collecting(mut record) => {
                record.push('\n');
                record.push_str(line);
                self.state = State::Collecting(record);
                Ok(None)
            }
            State::Idle => {
                self.state = State::Collecting(line.to_string());
                Ok(None)
            }
        }
    }

    /// Whether part of a record has been collected but not yet closed
    pub fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting(_))
    }

    /// Consume the accumulator, returning any unterminated trailing text
    pub fn finish(self) -> Option<String> {
        match self.state {
            State::Idle => None,
            State::Collecting(record) => Some(record),
        }
    }
}

/// Split one record into a revision
///
/// The message sits between the hash and the last three fields, so a
/// message that itself contains the separator is kept whole.
fn split_record(record: &str) -> GitResult<Revision> {
    let fields: Vec<&str> = record.split(FIELD_SEPARATOR).collect();
    if fields.len() < RECORD_FIELDS {
        return Err(GitError::UnexpectedOutput {
            command: "git log".to_string(),
            output: record.to_string(),
        });
    }

    let n = fields.len();
    let message = fields[1..n - 3].join(FIELD_SEPARATOR);

    Ok(Revision::from_fields(
        fields[0],
        &message,
        fields[n - 3],
        fields[n - 2],
        fields[n - 1],
    ))
}

/// Parse log output produced by [`log_command`] with the same `sentinel`
///
/// A final record without a closing sentinel is dropped.
pub fn parse_revisions<S: AsRef<str>>(lines: &[S], sentinel: &str) -> GitResult<Vec<Revision>> {
    let mut accumulator = LogAccumulator::new(sentinel);
    let mut revisions = Vec::new();

    for line in lines {
        if let Some(revision) = accumulator.push(line.as_ref())? {
            revisions.push(revision);
        }
    }

    Ok(revisions)
}
