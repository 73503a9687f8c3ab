//! Skill tags: an ordered, duplicate-free list of trimmed strings.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordered unique skill tags. Duplicate detection is case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim `text` and append it unless it is empty or already present.
    /// Returns whether the tag was added.
    pub fn add(&mut self, text: &str) -> bool {
        let tag = text.trim();
        if tag.is_empty() {
            debug!("Empty skill ignored");
            return false;
        }
        if self.contains(tag) {
            debug!(skill = tag, "Duplicate skill ignored");
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    /// Remove an exact match. Returns whether anything was removed.
    pub fn remove(&mut self, text: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|s| s != text);
        before != self.0.len()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.0.iter().any(|s| s == text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
