use thiserror::Error;

/// Crate-level error aggregating every component's own error type (§7).
/// [`crate::read::read`] and [`crate::write::write`] return their
/// narrower [`crate::read::ReadError`]/[`crate::write::WriteError`]
/// directly; this type exists for callers like [`crate::canonicalize`]
/// that cross both halves of the pipeline in one call.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] crate::read::ReadError),

    #[error(transparent)]
    Write(#[from] crate::write::WriteError),

    #[error(transparent)]
    Ring(#[from] crate::ringbuild::RingError),

    #[error(transparent)]
    Graph(#[from] crate::graph::GraphError),
}
