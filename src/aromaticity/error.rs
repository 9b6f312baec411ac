use thiserror::Error;

/// Non-fatal: the resolver always leaves every aromatic bond at some
/// concrete order, but a failed component keeps its provisional single
/// orders and is reported rather than silently accepted.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("kekulization failed for an aromatic component of {atoms} atoms")]
pub struct KekulizationFailure {
    pub atoms: usize,
}
