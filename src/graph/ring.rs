use super::atom::AtomId;
use super::bond::BondId;
use super::molecule::Molecule;
use std::collections::{HashSet, VecDeque};

/// A perceived or constructed cycle, stored as the atoms in cycle order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub atoms: Vec<AtomId>,
}

impl Ring {
    pub fn new(atoms: Vec<AtomId>) -> Self {
        Self { atoms }
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn contains(&self, atom: AtomId) -> bool {
        self.atoms.contains(&atom)
    }
}

/// Smallest set of smallest rings for `mol`, found via a minimum cycle basis:
/// one shortest cycle per independent (non-bridge) bond, reduced to a basis
/// by Gaussian elimination over GF(2) on the bond-incidence vectors.
///
/// Grounded on the cycle-basis construction in the `resonance` crate's ring
/// perception module, adapted to operate directly on [`Molecule`] rather
/// than a standalone perception snapshot.
pub fn perceive_sssr(mol: &Molecule) -> Vec<Ring> {
    let num_components = mol.components().len();
    let cyclomatic_number =
        mol.bond_count() as isize - mol.atom_count() as isize + num_components as isize;

    if cyclomatic_number <= 0 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    let mut seen_signatures: HashSet<Vec<usize>> = HashSet::new();

    for bond in mol.bonds() {
        if let Some((atoms, mut bond_ids)) =
            shortest_path_excluding_bond(mol, bond.a, bond.b, bond.id())
        {
            bond_ids.push(bond.id().0);
            bond_ids.sort_unstable();
            if seen_signatures.insert(bond_ids) {
                candidates.push(atoms);
            }
        }
    }

    select_minimal_cycle_basis(mol, candidates, cyclomatic_number as usize)
}

fn shortest_path_excluding_bond(
    mol: &Molecule,
    start: AtomId,
    end: AtomId,
    forbidden: BondId,
) -> Option<(Vec<AtomId>, Vec<usize>)> {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut parent: Vec<Option<(AtomId, BondId)>> = vec![None; n];
    let mut queue = VecDeque::new();

    visited[start.index()] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == end {
            break;
        }
        for (neighbor, bond) in mol.neighbors(current) {
            if bond == forbidden || visited[neighbor.index()] {
                continue;
            }
            visited[neighbor.index()] = true;
            parent[neighbor.index()] = Some((current, bond));
            queue.push_back(neighbor);
        }
    }

    if !visited[end.index()] {
        return None;
    }

    let mut atoms = Vec::new();
    let mut bond_ids = Vec::new();
    let mut cursor = end;
    while let Some((prev, bond)) = parent[cursor.index()] {
        atoms.push(cursor);
        bond_ids.push(bond.0);
        cursor = prev;
    }
    atoms.push(cursor);
    atoms.reverse();

    Some((atoms, bond_ids))
}

fn select_minimal_cycle_basis(
    mol: &Molecule,
    mut candidates: Vec<Vec<AtomId>>,
    cyclomatic_number: usize,
) -> Vec<Ring> {
    candidates.sort_by_key(|atoms| atoms.len());

    let words = mol.bond_count().div_ceil(64);
    let mut basis: Vec<(Vec<u64>, usize)> = Vec::new();
    let mut selected = Vec::new();

    for atoms in candidates {
        let mut bitvec = vec![0u64; words];
        for window in ring_bond_ids(mol, &atoms) {
            bitvec[window / 64] |= 1u64 << (window % 64);
        }

        for (basis_vec, pivot) in &basis {
            if (bitvec[*pivot / 64] >> (*pivot % 64)) & 1 == 1 {
                for (a, b) in bitvec.iter_mut().zip(basis_vec) {
                    *a ^= *b;
                }
            }
        }

        if let Some(pivot) = leading_one(&bitvec) {
            basis.push((bitvec, pivot));
            basis.sort_by_key(|&(_, p)| p);
            selected.push(Ring::new(atoms));
            if selected.len() == cyclomatic_number {
                break;
            }
        }
    }

    selected
}

fn ring_bond_ids(mol: &Molecule, atoms: &[AtomId]) -> Vec<usize> {
    let n = atoms.len();
    (0..n)
        .map(|i| {
            let a = atoms[i];
            let b = atoms[(i + 1) % n];
            mol.bond_between(a, b)
                .expect("ring candidate atoms must be bonded consecutively")
                .0
        })
        .collect()
}

fn leading_one(bitvec: &[u64]) -> Option<usize> {
    for (word_idx, word) in bitvec.iter().enumerate() {
        if *word != 0 {
            return Some(word_idx * 64 + word.trailing_zeros() as usize);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cycle(mol: &mut Molecule, n: usize) -> Vec<AtomId> {
        let atoms: Vec<_> = (0..n).map(|_| mol.add_atom(6).unwrap()).collect();
        for i in 0..n {
            mol.add_bond(atoms[i], atoms[(i + 1) % n], 1).unwrap();
        }
        atoms
    }

    #[test]
    fn acyclic_graph_has_no_rings() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(6).unwrap();
        let b = mol.add_atom(6).unwrap();
        mol.add_bond(a, b, 1).unwrap();
        assert!(perceive_sssr(&mol).is_empty());
    }

    #[test]
    fn single_hexagon_is_one_ring_of_six() {
        let mut mol = Molecule::new();
        let atoms = cycle(&mut mol, 6);
        let rings = perceive_sssr(&mol);
        assert_eq!(rings.len(), 1);
        let mut found: Vec<_> = rings[0].atoms.clone();
        found.sort_by_key(|a| a.index());
        let mut expected = atoms;
        expected.sort_by_key(|a| a.index());
        assert_eq!(found, expected);
    }

    #[test]
    fn fused_bicyclic_system_has_two_rings() {
        let mut mol = Molecule::new();
        // Two fused triangles sharing one bond: atoms 0-1-2-0 and 0-2-3-0.
        let atoms: Vec<_> = (0..4).map(|_| mol.add_atom(6).unwrap()).collect();
        mol.add_bond(atoms[0], atoms[1], 1).unwrap();
        mol.add_bond(atoms[1], atoms[2], 1).unwrap();
        mol.add_bond(atoms[2], atoms[0], 1).unwrap();
        mol.add_bond(atoms[2], atoms[3], 1).unwrap();
        mol.add_bond(atoms[3], atoms[0], 1).unwrap();

        let rings = perceive_sssr(&mol);
        assert_eq!(rings.len(), 2);
        for ring in &rings {
            assert_eq!(ring.size(), 3);
        }
    }
}
