//! Instruction metadata tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A metadata marker attached to an instruction.
///
/// Tags survive decomposition: every instruction a rule generates inherits
/// the tags of the instruction it replaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Part of the compute half of a compute/uncompute bracket.
    Compute,
    /// Part of the uncompute half of a compute/uncompute bracket.
    Uncompute,
    /// An application-defined marker.
    Custom(String),
}

impl Tag {
    /// Create an application-defined tag.
    pub fn custom(label: impl Into<String>) -> Self {
        Tag::Custom(label.into())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Compute => write!(f, "compute"),
            Tag::Uncompute => write!(f, "uncompute"),
            Tag::Custom(label) => write!(f, "{label}"),
        }
    }
}
