use std::fmt;

use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Path of sibling indices addressing a node from the root collection.
///
/// The empty path addresses the root collection itself. Each entry is the
/// index of an item within the collection reached by the preceding entries,
/// so the path length equals the node's depth.
///
/// Positions are pure values: they are not stable identities. Any insert or
/// removal that changes a sibling collection's length shifts the positions
/// of the following siblings, and holders of stale positions must
/// re-resolve them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TreePosition(SmallVec<[usize; 8]>);

impl TreePosition {
    /// The empty position: the root collection itself.
    pub const fn root() -> Self {
        Self(SmallVec::new_const())
    }

    /// Sibling indices from root to node.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Depth of the addressed node; `0` addresses the root collection.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty position.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The position extended by one more sibling index.
    pub fn child(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.0.push(index);
        child
    }

    /// Appends a sibling index in place.
    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    /// The position of the owning collection, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.split_last().map(|(parent, _)| parent)
    }

    /// The last sibling index, or `None` for the root.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Splits into the parent path and the final sibling index.
    pub fn split_last(&self) -> Option<(Self, usize)> {
        let (&last, parent) = self.0.split_last()?;
        Some((Self(SmallVec::from_slice(parent)), last))
    }
}

impl From<&[usize]> for TreePosition {
    fn from(indices: &[usize]) -> Self {
        Self(SmallVec::from_slice(indices))
    }
}

impl<const N: usize> From<[usize; N]> for TreePosition {
    fn from(indices: [usize; N]) -> Self {
        Self(SmallVec::from_slice(&indices))
    }
}

impl From<Vec<usize>> for TreePosition {
    fn from(indices: Vec<usize>) -> Self {
        Self(SmallVec::from_vec(indices))
    }
}

impl FromIterator<usize> for TreePosition {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for TreePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, "]")
    }
}
