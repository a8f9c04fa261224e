//! Core data model: content hashes, merge actions, plans.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SHA-256 digest of a file's bytes.
///
/// A file absent from a tree is `Option::<ContentHash>::None`, never an empty hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-char hex digest.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..12])
    }
}

impl Serialize for ContentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContentHash::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid content hash: {}", s)))
    }
}

/// Merge action assigned to a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Nothing to do
    Keep,
    /// Fast-forward upstream content into local
    Apply,
    /// Local modification wins; upstream unchanged
    PreserveLocal,
    /// Both sides changed; needs manual resolution
    Conflict,
    /// Upstream removed the file and local never touched it
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Keep => "keep",
            Action::Apply => "apply",
            Action::PreserveLocal => "preserve_local",
            Action::Conflict => "conflict",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of difference between two versions of one path (diagnostic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    New,
    Modified,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::New => "new",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
        }
    }

    /// One-character marker used in status listings.
    pub fn symbol(&self) -> char {
        match self {
            ChangeKind::New => '+',
            ChangeKind::Modified => 'M',
            ChangeKind::Deleted => '-',
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the three trees a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeSide {
    Upstream,
    Baseline,
    Local,
}

impl fmt::Display for TreeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TreeSide::Upstream => "upstream",
            TreeSide::Baseline => "baseline",
            TreeSide::Local => "local",
        })
    }
}

/// Final merge decision for one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub path: String,
    pub action: Action,
    pub reason: String,
}

/// Informational change between Baseline and another tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub path: String,
    #[serde(rename = "action")]
    pub change: ChangeKind,
    pub reason: String,
}

/// Complete 3-way merge plan.
///
/// `upstream_changes` (baseline -> upstream) and `local_changes`
/// (baseline -> local) are diagnostics; only `merge` drives the applier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub upstream_changes: Vec<ChangeEntry>,
    pub local_changes: Vec<ChangeEntry>,
    pub merge: Vec<PlanEntry>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.merge.is_empty()
    }

    /// Look up the merge entry for a path.
    pub fn entry(&self, path: &str) -> Option<&PlanEntry> {
        self.merge.iter().find(|e| e.path == path)
    }

    /// Action for a path; paths absent from `merge` are logically `keep`.
    pub fn action_for(&self, path: &str) -> Action {
        self.entry(path).map(|e| e.action).unwrap_or(Action::Keep)
    }

    pub fn count(&self, action: Action) -> usize {
        self.merge.iter().filter(|e| e.action == action).count()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &PlanEntry> {
        self.merge.iter().filter(|e| e.action == Action::Conflict)
    }
}
