use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BoneId
// ---------------------------------------------------------------------------

/// Opaque identifier for a bone in a skeletal hierarchy.
///
/// Equality-comparable and hashable; carries no ordering semantics beyond
/// what its string representation implies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoneId(String);

impl BoneId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BoneId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for BoneId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for BoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// One of a bone's three local basis directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All three axes in X, Y, Z order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Index of this axis within a 3-vector (X=0, Y=1, Z=2).
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}
