use super::atom::{Atom, AtomId};
use super::bond::{Bond, BondId};
use super::error::GraphError;

/// Hard ceiling on atoms and bonds per molecule (§5, Memory).
pub const MAX_ATOMS: usize = 1024;
pub const MAX_BONDS: usize = 1024;

/// An in-memory chemical graph: the arena atoms, bonds, and rings live in
/// (component A). Owned exclusively by one reader/writer invocation (§5).
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<BondId>>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }

    pub fn bonds(&self) -> impl Iterator<Item = &Bond> {
        self.bonds.iter()
    }

    pub fn atom(&self, id: AtomId) -> &Atom {
        &self.atoms[id.0]
    }

    pub fn atom_mut(&mut self, id: AtomId) -> &mut Atom {
        &mut self.atoms[id.0]
    }

    pub fn bond(&self, id: BondId) -> &Bond {
        &self.bonds[id.0]
    }

    pub fn bond_mut(&mut self, id: BondId) -> &mut Bond {
        &mut self.bonds[id.0]
    }

    /// Inserts a new atom of the given element and returns its [`AtomId`].
    pub fn add_atom(&mut self, atomic_number: u8) -> Result<AtomId, GraphError> {
        if self.atoms.len() >= MAX_ATOMS {
            return Err(GraphError::AtomCapacityExceeded(MAX_ATOMS));
        }
        let id = AtomId(self.atoms.len());
        self.atoms.push(Atom::new(id, atomic_number));
        self.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Connects two atoms with a bond of the given order.
    pub fn add_bond(&mut self, a: AtomId, b: AtomId, order: u8) -> Result<BondId, GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        self.check_atom(a)?;
        self.check_atom(b)?;
        if self.bond_between(a, b).is_some() {
            return Err(GraphError::DuplicateBond(a, b));
        }
        if self.bonds.len() >= MAX_BONDS {
            return Err(GraphError::BondCapacityExceeded(MAX_BONDS));
        }
        let id = BondId(self.bonds.len());
        self.bonds.push(Bond::new(id, a, b, order));
        self.adjacency[a.0].push(id);
        self.adjacency[b.0].push(id);
        Ok(id)
    }

    fn check_atom(&self, id: AtomId) -> Result<(), GraphError> {
        if id.0 < self.atoms.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownAtom(id))
        }
    }

    /// Bond ids incident to `atom`, in insertion order.
    pub fn bonds_of(&self, atom: AtomId) -> &[BondId] {
        &self.adjacency[atom.0]
    }

    /// `(neighbor, bond)` pairs incident to `atom`, in insertion order.
    pub fn neighbors(&self, atom: AtomId) -> impl Iterator<Item = (AtomId, BondId)> + '_ {
        self.adjacency[atom.0].iter().map(move |&bid| {
            let bond = self.bond(bid);
            (bond.other(atom).expect("adjacency invariant"), bid)
        })
    }

    pub fn degree(&self, atom: AtomId) -> usize {
        self.adjacency[atom.0].len()
    }

    pub fn bond_between(&self, a: AtomId, b: AtomId) -> Option<BondId> {
        self.adjacency[a.0]
            .iter()
            .copied()
            .find(|&bid| self.bond(bid).other(a) == Some(b))
    }

    /// Sum of bond orders incident to `atom`, counting aromatic bonds at
    /// their current (possibly provisional) order.
    pub fn bond_order_sum(&self, atom: AtomId) -> u32 {
        self.adjacency[atom.0]
            .iter()
            .map(|&bid| self.bond(bid).order as u32)
            .sum()
    }

    /// Connected component containing `start`, as a sorted `Vec<AtomId>`.
    pub fn component_of(&self, start: AtomId) -> Vec<AtomId> {
        let mut seen = vec![false; self.atoms.len()];
        let mut stack = vec![start];
        seen[start.0] = true;
        let mut out = Vec::new();
        while let Some(a) = stack.pop() {
            out.push(a);
            for (n, _) in self.neighbors(a) {
                if !seen[n.0] {
                    seen[n.0] = true;
                    stack.push(n);
                }
            }
        }
        out.sort_by_key(|a| a.0);
        out
    }

    /// All connected components, in order of their lowest-index member.
    pub fn components(&self) -> Vec<Vec<AtomId>> {
        let mut seen = vec![false; self.atoms.len()];
        let mut components = Vec::new();
        for i in 0..self.atoms.len() {
            if !seen[i] {
                let component = self.component_of(AtomId(i));
                for &a in &component {
                    seen[a.0] = true;
                }
                components.push(component);
            }
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_atom_assigns_sequential_ids() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(6).unwrap();
        let b = mol.add_atom(8).unwrap();
        assert_eq!(a, AtomId(0));
        assert_eq!(b, AtomId(1));
        assert_eq!(mol.atom_count(), 2);
    }

    #[test]
    fn add_bond_rejects_self_loop() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(6).unwrap();
        assert_eq!(mol.add_bond(a, a, 1), Err(GraphError::SelfLoop(a)));
    }

    #[test]
    fn add_bond_rejects_duplicate() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(6).unwrap();
        let b = mol.add_atom(6).unwrap();
        mol.add_bond(a, b, 1).unwrap();
        assert_eq!(mol.add_bond(a, b, 1), Err(GraphError::DuplicateBond(a, b)));
    }

    #[test]
    fn neighbors_reports_both_directions() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(6).unwrap();
        let b = mol.add_atom(8).unwrap();
        let bond = mol.add_bond(a, b, 2).unwrap();

        let a_neighbors: Vec<_> = mol.neighbors(a).collect();
        let b_neighbors: Vec<_> = mol.neighbors(b).collect();
        assert_eq!(a_neighbors, vec![(b, bond)]);
        assert_eq!(b_neighbors, vec![(a, bond)]);
    }

    #[test]
    fn components_splits_disconnected_atoms() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(8).unwrap();
        let b = mol.add_atom(7).unwrap();
        mol.add_bond(a, b, 1).unwrap();
        let c = mol.add_atom(6).unwrap();

        let components = mol.components();
        assert_eq!(components, vec![vec![a, b], vec![c]]);
    }

    #[test]
    fn bond_order_sum_counts_incident_orders() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(6).unwrap();
        let b = mol.add_atom(8).unwrap();
        let c = mol.add_atom(8).unwrap();
        mol.add_bond(a, b, 2).unwrap();
        mol.add_bond(a, c, 1).unwrap();

        assert_eq!(mol.bond_order_sum(a), 3);
    }
}
