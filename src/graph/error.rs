use super::atom::AtomId;
use thiserror::Error;

/// Errors raised while mutating a [`super::Molecule`](crate::graph::Molecule).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("atom {0} is out of bounds")]
    UnknownAtom(AtomId),

    #[error("a bond already exists between atoms {0} and {1}")]
    DuplicateBond(AtomId, AtomId),

    #[error("self-loop bond is not allowed on atom {0}")]
    SelfLoop(AtomId),

    #[error("molecule exceeds the {0}-atom capacity")]
    AtomCapacityExceeded(usize),

    #[error("molecule exceeds the {0}-bond capacity")]
    BondCapacityExceeded(usize),
}
