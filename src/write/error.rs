use thiserror::Error;

/// Writer failures (§4.4, §7). Unlike the reader, these aren't tied to a
/// byte offset — they describe a property of the molecule itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WriteError {
    #[error("atom {0} has no WLN letter or dash-block encoding for atomic number {1}")]
    UnencodableAtom(usize, u8),

    #[error("ring component rooted at atom {0} has no atom with a free ring-share to start from")]
    NoRingStart(usize),

    #[error("ring system rooted at atom {0} could not be walked into a single path")]
    IncompleteRingWalk(usize),
}
