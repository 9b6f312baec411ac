use crate::locant::Locant;

/// One ring-closure instruction from a parsed `L…J`/`T…J` block: "close a
/// ring of size `length` starting at `start`, walking the existing path".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubringDescriptor {
    pub start: Locant,
    pub length: u8,
    pub aromatic: bool,
}

impl SubringDescriptor {
    pub fn new(start: Locant, length: u8, aromatic: bool) -> Self {
        Self {
            start,
            length,
            aromatic,
        }
    }
}

/// Everything the reader has accumulated by the time it hits the closing
/// `J` and hands off to the ring builder (§4.2).
#[derive(Debug, Clone, Default)]
pub struct RingBuildInput {
    pub subrings: Vec<SubringDescriptor>,
    /// Total path size `N`: the number of distinct on-path locants.
    pub size: u16,
    /// Locants that remove a ring-share (fusion consumes a connection).
    pub bridges: Vec<Locant>,
    /// Locants allowed a third ring-share (multicyclic junctions).
    pub multicyclic: Vec<Locant>,
    /// `/AB` pseudo-locant pairs forcing the flood-fill path.
    pub pseudo_locants: Vec<(Locant, Locant)>,
}

/// A single bond synthesized by the ring builder, already classified as
/// part of the initial path or a later fusion/bridge/pseudo closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingBond {
    pub from: usize,
    pub to: usize,
    pub aromatic: bool,
}

/// The fully assembled ring skeleton: `size` path positions (index `i`
/// carries locant `i+1`) plus every bond PathSolver III synthesized.
#[derive(Debug, Clone, Default)]
pub struct RingSkeleton {
    pub size: usize,
    pub bonds: Vec<RingBond>,
    /// `true` for every path index that ended up in an aromatic subring.
    pub aromatic_atoms: Vec<bool>,
}

impl RingSkeleton {
    pub fn locant_of(index: usize) -> Locant {
        Locant::main(index as u16 + 1)
    }
}
