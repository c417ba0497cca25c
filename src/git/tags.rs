use serde::Serialize;
use std::collections::BTreeMap;

const TAG_REF_PREFIX: &str = "refs/tags/";
const PEELED_SUFFIX: &str = "^{}";

/// Mapping from tag name to commit hash
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagMap {
    tags: BTreeMap<String, String>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name -> hash`, replacing any earlier hash for `name`
    pub fn insert(&mut self, name: impl Into<String>, hash: impl Into<String>) {
        self.tags.insert(name.into(), hash.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// First tag, in name order, that points at `hash`
    pub fn tag_for_hash(&self, hash: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(_, value)| value.as_str() == hash)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse `git ls-remote --tags` output
///
/// Each line looks like `<hash>\trefs/tags/<name>`. Lines without a tag ref
/// are skipped. The peeled entry of an annotated tag (`<name>^{}`) follows the
/// tag object in the listing and replaces it, so annotated tags resolve to the
/// commit they point at.
pub fn parse_tag_listing<S: AsRef<str>>(lines: &[S]) -> TagMap {
    let mut tags = TagMap::new();

    for line in lines {
        if let Some((name, hash)) = parse_tag_line(line.as_ref()) {
            tags.insert(name, hash);
        }
    }

    tags
}

fn parse_tag_line(line: &str) -> Option<(&str, &str)> {
    // ASCII lowercasing keeps byte offsets valid for slicing the original
    let start = line.to_ascii_lowercase().rfind(TAG_REF_PREFIX)?;
    let hash = line[..start].trim();
    let name = line[start + TAG_REF_PREFIX.len()..].trim_end();
    let name = name.strip_suffix(PEELED_SUFFIX).unwrap_or(name);

    if name.is_empty() { None } else { Some((name, hash)) }
}
