use thiserror::Error;

/// Reader failures (§4.3, §7). Every variant that can be attributed to a
/// byte carries the offset so callers can render a caret diagnostic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("unexpected end of input")]
    EndOfLine,

    #[error("unexpected character at byte {0}")]
    Character(usize),

    #[error("unclosed ring block opened at byte {0}")]
    UnclosedRing(usize),

    #[error("unclosed dash element block opened at byte {0}")]
    UnclosedDashBlock(usize),

    #[error("unknown element symbol {0:?} at byte {1}")]
    UnknownElement(String, usize),

    #[error("invalid locant {0:?} at byte {1}")]
    InvalidLocant(String, usize),

    #[error("ring construction failed: {0}")]
    Ring(#[from] crate::ringbuild::RingError),

    #[error("molecule graph error: {0}")]
    Graph(#[from] crate::graph::GraphError),

    #[error("value overflow at byte {0}")]
    Overflow(usize),
}
