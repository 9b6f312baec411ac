//! Aromaticity resolver (component F, §4.6): turns the provisional,
//! order-1 aromatic bonds the reader and ring builder leave behind into
//! a concrete alternating single/double (Kekule) pattern.
//!
//! Runs as a post-read pass over the whole molecule, one connected
//! aromatic component at a time, so a Kekulization failure in one ring
//! system never blocks the others.

mod error;
mod matching;

pub use error::KekulizationFailure;

use crate::element::permitted_valence;
use crate::graph::{AtomId, Molecule};
use std::collections::{HashSet, VecDeque};

/// Backtracking search budget per non-bipartite component (§4.6's
/// Blossom step, approximated — see [`matching::general_max_matching`]).
const GENERAL_MATCH_ATTEMPT_BUDGET: usize = 20_000;

/// Resolves every aromatic component in `mol` in place. Components that
/// fail to Kekulize are left with all-single provisional bonds and
/// reported back; the aromatic flags on their atoms and bonds are left
/// set regardless (§4.6 Failure: "aromatic-tagged output is still
/// permitted").
pub fn resolve(mol: &mut Molecule) -> Vec<KekulizationFailure> {
    let mut visited: HashSet<usize> = HashSet::new();
    let mut failures = Vec::new();

    let aromatic_atoms: Vec<AtomId> = mol.atoms().filter(|a| a.aromatic).map(|a| a.id()).collect();

    for &start in &aromatic_atoms {
        if visited.contains(&start.index()) {
            continue;
        }
        let component = collect_aromatic_component(mol, start, &mut visited);
        if let Err(failure) = resolve_component(mol, &component) {
            failures.push(failure);
        }
    }

    failures
}

/// BFS over aromatic-bond edges only, starting from `start`, grounded on
/// the standard connected-component walk used to seed a Kekulizer before
/// assigning orders one ring system at a time.
fn collect_aromatic_component(
    mol: &Molecule,
    start: AtomId,
    visited: &mut HashSet<usize>,
) -> Vec<AtomId> {
    let mut component = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);
    visited.insert(start.index());

    while let Some(atom) = queue.pop_front() {
        component.push(atom);
        for (neighbor, bond) in mol.neighbors(atom) {
            if mol.bond(bond).aromatic && !visited.contains(&neighbor.index()) {
                visited.insert(neighbor.index());
                queue.push_back(neighbor);
            }
        }
    }
    component
}

fn resolve_component(mol: &mut Molecule, component: &[AtomId]) -> Result<(), KekulizationFailure> {
    // Local index <-> AtomId, restricted to atoms that still have spare
    // valence to take part in a double bond (§4.6 step 1).
    let candidates: Vec<AtomId> = component
        .iter()
        .copied()
        .filter(|&atom| remaining_valence(mol, atom) > 0)
        .collect();

    let index_of = |atom: AtomId| candidates.iter().position(|&a| a == atom);

    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); candidates.len()];
    for (i, &atom) in candidates.iter().enumerate() {
        for (neighbor, bond) in mol.neighbors(atom) {
            if !mol.bond(bond).aromatic {
                continue;
            }
            if let Some(j) = index_of(neighbor) {
                if j > i {
                    adj[i].push(j);
                    adj[j].push(i);
                }
            }
        }
    }

    let matching = if matching::is_bipartite(&adj) {
        matching::bipartite_max_matching(&adj)
    } else {
        let (result, complete) = matching::general_max_matching(&adj, GENERAL_MATCH_ATTEMPT_BUDGET);
        if !complete {
            log::warn!("kekulization search exhausted its attempt budget");
        }
        result
    };

    let covers_all = matching.iter().all(|p| p.is_some());

    // Promote matched pairs to order 2, demote every other aromatic bond
    // in the component to order 1 (§4.6 steps 3-5).
    let mut promoted: HashSet<(usize, usize)> = HashSet::new();
    for (i, partner) in matching.iter().enumerate() {
        if let Some(j) = partner {
            let key = if i < *j { (i, *j) } else { (*j, i) };
            promoted.insert(key);
        }
    }

    for atom in component {
        for bond_id in mol.bonds_of(*atom).to_vec() {
            if !mol.bond(bond_id).aromatic {
                continue;
            }
            let bond = *mol.bond(bond_id);
            let (Some(ia), Some(ib)) = (index_of(bond.a), index_of(bond.b)) else {
                mol.bond_mut(bond_id).order = 1;
                continue;
            };
            let key = if ia < ib { (ia, ib) } else { (ib, ia) };
            mol.bond_mut(bond_id).order = if promoted.contains(&key) { 2 } else { 1 };
        }
    }

    if covers_all || candidates.is_empty() {
        Ok(())
    } else {
        Err(KekulizationFailure {
            atoms: component.len(),
        })
    }
}

fn remaining_valence(mol: &Molecule, atom: AtomId) -> i32 {
    let permitted = permitted_valence(mol.atom(atom).atomic_number).unwrap_or(4) as i32;
    permitted - mol.bond_order_sum(atom) as i32 - mol.atom(atom).hydrogens as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn benzene() -> Molecule {
        let mut mol = Molecule::new();
        let atoms: Vec<_> = (0..6).map(|_| mol.add_atom(6).unwrap()).collect();
        for &a in &atoms {
            mol.atom_mut(a).aromatic = true;
            mol.atom_mut(a).hydrogens = 1;
        }
        for i in 0..6 {
            let bond = mol.add_bond(atoms[i], atoms[(i + 1) % 6], 1).unwrap();
            mol.bond_mut(bond).aromatic = true;
        }
        mol
    }

    #[test]
    fn benzene_resolves_to_three_alternating_double_bonds() {
        let mut mol = benzene();
        let failures = resolve(&mut mol);
        assert!(failures.is_empty());
        let doubles = mol.bonds().filter(|b| b.order == 2).count();
        assert_eq!(doubles, 3);
        for atom in mol.atoms() {
            assert_eq!(mol.bond_order_sum(atom.id()) + atom.hydrogens as u32, 4);
        }
    }

    #[test]
    fn non_aromatic_molecule_is_left_untouched() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(6).unwrap();
        let b = mol.add_atom(6).unwrap();
        mol.add_bond(a, b, 1).unwrap();
        assert!(resolve(&mut mol).is_empty());
        assert_eq!(mol.bond(mol.bonds_of(a)[0]).order, 1);
    }
}
