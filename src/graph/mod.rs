//! The molecule graph (component A): atoms, bonds, rings, charges, and
//! aromaticity flags, held in a single per-parse arena.

mod atom;
mod bond;
mod error;
mod molecule;
mod ring;

pub use atom::{Atom, AtomId};
pub use bond::{Bond, BondId};
pub use error::GraphError;
pub use molecule::{Molecule, MAX_ATOMS, MAX_BONDS};
pub use ring::{perceive_sssr, Ring};
