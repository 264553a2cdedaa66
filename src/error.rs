use thiserror::Error;

use crate::position::TreePosition;

/// Errors surfaced by store mutations and draw entry points.
///
/// Every operation validates eligibility fully before mutating, so a
/// rejected call leaves the logical tree unchanged. Read-only queries
/// return `Option` instead of erroring.
#[derive(Error, Debug)]
pub enum Error {
    /// The position does not resolve to an existing item or collection.
    #[error("no item or collection at position {0}")]
    PositionInvalid(TreePosition),

    /// The position is neither insert- nor update-eligible.
    #[error("position {0} is not available to insert or update")]
    NotEligible(TreePosition),

    /// The item exists but has no rendered fragment yet; draw it first.
    #[error("item at position {0} has not been drawn")]
    NotRendered(TreePosition),

    /// A fully-formed sub-tree was supplied where none is accepted.
    #[error("a nested sub-tree cannot be supplied on {0}")]
    SubtreeNotAccepted(&'static str),

    /// The logical and rendered trees disagree on a joint invariant.
    /// A programming defect, not a user-recoverable condition.
    #[error("render state out of sync: {0}")]
    Desync(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
