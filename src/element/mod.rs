//! The symbol table (component B): resolves WLN atom letters and
//! dash-block element codes to atomic numbers, default valences, and
//! carbon-chain lengths.

mod chain;
mod letter;
mod symbol;
mod valence;

pub use chain::{parse_chain_length, ChainError};
pub use letter::{
    atom_to_letter, is_structural_operator, letter_to_atom, LetterCode, LetterError, LetterSpecial,
};
pub use symbol::{symbol_for, two_letter_to_atom};
pub use valence::permitted_valence;
