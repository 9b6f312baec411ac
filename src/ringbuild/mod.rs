//! Ring builder (component C): reconstructs a ring skeleton from the
//! subring descriptors accumulated while scanning an `L…J`/`T…J` block.
//!
//! PathSolver III's skeleton only spans on-path locants (`1..N`); broken
//! (off-path) vertices are pendant atoms the reader attaches directly to
//! their parent on-path atom once the skeleton comes back, using
//! [`crate::locant::Locant::broken`] for their locant rather than a
//! second pass through this module.

mod error;
mod solver;
mod types;

pub use error::RingError;
pub use solver::{benzene_input, build};
pub use types::{RingBond, RingBuildInput, RingSkeleton, SubringDescriptor};
