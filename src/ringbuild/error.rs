use crate::locant::Locant;
use thiserror::Error;

/// Errors PathSolver III raises when a ring block's descriptors cannot be
/// realized as a consistent skeleton (§4.2, Failure).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingError {
    #[error("ring under-specified: walk from {start} could not complete {needed} step(s)")]
    UnderSpecified { start: Locant, needed: u8 },

    #[error("impossible fusion: no atom with a free ring-share near {start}")]
    ImpossibleFusion { start: Locant },

    #[error("ring size {0} is too small to hold any subring")]
    DegenerateSize(u16),
}
