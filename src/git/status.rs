use serde::Serialize;

const MODIFIED_MARKER: &str = "modified:";
const NEW_FILE_MARKER: &str = "new file:";
const CLEAN_MARKER: &str = "nothing to commit";

/// Result of one `git status` query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Unmodified status output
    pub raw_lines: Vec<String>,
    pub modified: Vec<String>,
    pub added: Vec<String>,
}

impl StatusReport {
    pub fn has_changes(&self) -> bool {
        !self.modified.is_empty() || !self.added.is_empty()
    }

    /// The raw output as one block of text
    pub fn message(&self) -> String {
        self.raw_lines.join("\n")
    }
}

/// Parse the human-readable `git status` output
pub fn parse_status<S: AsRef<str>>(lines: &[S]) -> StatusReport {
    let mut report = StatusReport::default();

    for line in lines {
        let line = line.as_ref();

        if let Some(path) = path_after(line, MODIFIED_MARKER) {
            report.modified.push(path.to_string());
        }
        if let Some(path) = path_after(line, NEW_FILE_MARKER) {
            report.added.push(path.to_string());
        }

        report.raw_lines.push(line.to_string());
    }

    report
}

/// Whether the last status line reports a clean working tree
pub fn is_clean_status<S: AsRef<str>>(lines: &[S]) -> bool {
    lines
        .last()
        .is_some_and(|line| line.as_ref().to_lowercase().contains(CLEAN_MARKER))
}

/// Text following the last case-insensitive occurrence of `marker`
fn path_after<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    // ASCII lowercasing keeps byte offsets valid for slicing the original
    let lower = line.to_ascii_lowercase();
    let start = lower.rfind(marker)? + marker.len();
    let path = line[start..].trim_start();

    if path.is_empty() { None } else { Some(path) }
}
