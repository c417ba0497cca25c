use chrono::{DateTime, Utc};
use serde::Serialize;

/// Represents a commit read from git log
///
/// Every field may be empty; log output with blank fields still produces a
/// revision rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Revision {
    hash: String,
    message: String,
    author: String,
    email: String,
    date: Option<DateTime<Utc>>,
}

impl Revision {
    /// Build a revision from raw log fields
    ///
    /// All fields are trimmed, angle brackets are removed from `email` and
    /// `epoch_seconds` becomes the date when it parses as an integer.
    pub fn from_fields(
        hash: &str,
        message: &str,
        author: &str,
        email: &str,
        epoch_seconds: &str,
    ) -> Self {
        Self {
            hash: hash.trim().to_string(),
            message: message.trim().to_string(),
            author: author.trim().to_string(),
            email: strip_angle_brackets(email.trim()),
            date: parse_epoch(epoch_seconds),
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(self.hash.as_str())
    }

    pub fn set_hash(&mut self, hash: impl Into<String>) {
        self.hash = hash.into();
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_date(&mut self, date: Option<DateTime<Utc>>) {
        self.date = date;
    }
}

fn strip_angle_brackets(email: &str) -> String {
    email.replace(['<', '>'], "")
}

fn parse_epoch(value: &str) -> Option<DateTime<Utc>> {
    let seconds = value.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(seconds, 0)
}
