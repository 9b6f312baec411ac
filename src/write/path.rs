use super::error::WriteError;
use crate::graph::{AtomId, Molecule};
use crate::locant::Locant;

/// Upper bound on backtracking steps per Hamiltonian-path attempt, so a
/// pathological ring system fails fast with [`WriteError::IncompleteRingWalk`]
/// instead of hanging (§5: no suspension points, bounded working sets).
const SEARCH_BUDGET: usize = 200_000;

/// Maximum number of atoms the writer will set aside as broken (off-path)
/// locants before giving up on a ring system (§4.4 PathFinderIIIb).
const MAX_BROKEN_ATTEMPTS: usize = 8;

/// One off-path atom and the on-path locant it hangs from (§3, §4.4: the
/// 6-child broken-locant tree).
#[derive(Debug, Clone, Copy)]
pub struct BrokenAtom {
    pub atom: AtomId,
    pub parent: AtomId,
    pub child_index: u8,
}

/// The result of PathFinderIIIa/IIIb (§4.4): a locant order for the main
/// traversal path plus any atoms that had to be set aside as broken
/// locants to complete it.
#[derive(Debug, Clone)]
pub struct RingWalk {
    /// On-path atoms; position `i` (0-based) carries locant `i + 1`.
    pub path: Vec<AtomId>,
    pub broken: Vec<BrokenAtom>,
}

impl RingWalk {
    pub fn locant_of(&self, atom: AtomId) -> Option<Locant> {
        if let Some(pos) = self.path.iter().position(|&a| a == atom) {
            return Some(Locant::main(pos as u16 + 1));
        }
        self.broken.iter().find(|b| b.atom == atom).map(|b| {
            let parent_locant = self.locant_of(b.parent).expect("parent is on-path");
            Locant::broken(parent_locant, b.child_index)
        })
    }
}

/// Finds a traversal of `ring_atoms` that visits every one of them,
/// following only bonds between ring atoms (§4.4): a single walk for a
/// monocyclic system, PathFinderIIIa's greedy walk scored by fusion sum
/// for simple fused polycyclics, or PathFinderIIIb's backtracking walk
/// with broken-locant fallback for bridged/multicyclic systems.
pub fn find_ring_walk(mol: &Molecule, ring_atoms: &[AtomId]) -> Result<RingWalk, WriteError> {
    let n = ring_atoms.len();
    let index_of = |atom: AtomId| ring_atoms.iter().position(|&a| a == atom);

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, &atom) in ring_atoms.iter().enumerate() {
        for (neighbor, _) in mol.neighbors(atom) {
            if let Some(j) = index_of(neighbor) {
                if !adjacency[i].contains(&j) {
                    adjacency[i].push(j);
                }
            }
        }
    }
    let degree: Vec<usize> = adjacency.iter().map(|a| a.len()).collect();
    for neighbors in &mut adjacency {
        neighbors.sort_unstable_by(|&a, &b| degree[b].cmp(&degree[a]).then(b.cmp(&a)));
    }

    if let Some(indices) = best_full_path(&adjacency, n) {
        return Ok(RingWalk {
            path: indices.into_iter().map(|i| ring_atoms[i]).collect(),
            broken: Vec::new(),
        });
    }

    set_aside_and_retry(mol, ring_atoms, &adjacency)
}

/// Tries a Hamiltonian path from every degree-2 "valid starting edge"
/// atom first (§4.4 PathFinderIIIa), falling back to every other atom
/// (§4.4 PathFinderIIIb's unrestricted start), scoring each complete
/// walk by fusion sum and keeping the minimum.
fn best_full_path(adjacency: &[Vec<usize>], n: usize) -> Option<Vec<usize>> {
    if n == 0 {
        return None;
    }
    let degree: Vec<usize> = adjacency.iter().map(|a| a.len()).collect();

    let mut starts: Vec<usize> = (0..n).filter(|&i| degree[i] == 2).collect();
    starts.extend((0..n).filter(|&i| degree[i] != 2));

    let mut best: Option<(u32, Vec<usize>)> = None;
    for &start in starts.iter() {
        let mut budget = SEARCH_BUDGET;
        let mut visited = vec![false; n];
        let mut path = vec![start];
        visited[start] = true;
        if search(adjacency, &mut visited, &mut path, n, &mut budget) {
            let score = fusion_sum(adjacency, &path);
            if best.as_ref().map(|(s, _)| score < *s).unwrap_or(true) {
                best = Some((score, path));
            }
        }
    }
    best.map(|(_, path)| path)
}

fn search(
    adjacency: &[Vec<usize>],
    visited: &mut [bool],
    path: &mut Vec<usize>,
    target_len: usize,
    budget: &mut usize,
) -> bool {
    if path.len() == target_len {
        return true;
    }
    if *budget == 0 {
        return false;
    }
    *budget -= 1;

    let current = *path.last().expect("path always has a start element");
    for &next in &adjacency[current] {
        if visited[next] {
            continue;
        }
        visited[next] = true;
        path.push(next);
        if search(adjacency, visited, path, target_len, budget) {
            return true;
        }
        path.pop();
        visited[next] = false;
    }
    false
}

/// Fusion sum (§4.2 GLOSSARY): sum over ring-closing bonds (edges not
/// between consecutive path positions) of the lower locant each bond
/// touches. Minimizing this is PathFinderIIIa/b's scoring objective.
fn fusion_sum(adjacency: &[Vec<usize>], path: &[usize]) -> u32 {
    let mut position = vec![0usize; adjacency.len()];
    for (pos, &node) in path.iter().enumerate() {
        position[node] = pos;
    }

    let mut sum = 0u32;
    let mut seen = std::collections::HashSet::new();
    for (pos, &node) in path.iter().enumerate() {
        for &neighbor in &adjacency[node] {
            let other_pos = position[neighbor];
            let consecutive = other_pos + 1 == pos || pos + 1 == other_pos;
            if consecutive {
                continue;
            }
            let key = if node < neighbor {
                (node, neighbor)
            } else {
                (neighbor, node)
            };
            if seen.insert(key) {
                sum += pos.min(other_pos) as u32 + 1;
            }
        }
    }
    sum
}

/// PathFinderIIIb's fallback (§4.4): repeatedly set aside the
/// highest-degree remaining atom as a broken locant and retry the walk
/// on what's left, until a full path covers every non-broken atom or
/// the attempt budget is exhausted.
fn set_aside_and_retry(
    mol: &Molecule,
    ring_atoms: &[AtomId],
    full_adjacency: &[Vec<usize>],
) -> Result<RingWalk, WriteError> {
    let n = ring_atoms.len();
    let mut active: Vec<usize> = (0..n).collect();
    let mut broken_indices: Vec<usize> = Vec::new();

    for _ in 0..MAX_BROKEN_ATTEMPTS {
        if active.len() < 2 {
            break;
        }

        let (sub_adjacency, local_to_global) = induced_subgraph(full_adjacency, &active);
        if let Some(local_path) = best_full_path(&sub_adjacency, active.len()) {
            let path: Vec<AtomId> = local_path
                .iter()
                .map(|&local| ring_atoms[local_to_global[local]])
                .collect();
            let position_of_global: std::collections::HashMap<usize, usize> = local_path
                .iter()
                .enumerate()
                .map(|(pos, &local)| (local_to_global[local], pos))
                .collect();

            let mut broken = Vec::new();
            for (child_slot, &global_idx) in broken_indices.iter().enumerate() {
                let atom = ring_atoms[global_idx];
                let parent_global = full_adjacency[global_idx]
                    .iter()
                    .filter(|&&g| position_of_global.contains_key(&g))
                    .min_by_key(|&&g| position_of_global[&g])
                    .copied()
                    .ok_or(WriteError::NoRingStart(atom.index()))?;
                broken.push(BrokenAtom {
                    atom,
                    parent: ring_atoms[parent_global],
                    child_index: (child_slot % 6) as u8,
                });
            }

            return Ok(RingWalk { path, broken });
        }

        let worst = active
            .iter()
            .copied()
            .max_by_key(|&i| full_adjacency[i].len())
            .expect("active is non-empty");
        active.retain(|&i| i != worst);
        broken_indices.push(worst);
    }

    let _ = mol;
    let root_index = ring_atoms.first().map(|a| a.index()).unwrap_or(0);
    Err(WriteError::IncompleteRingWalk(root_index))
}

/// Restricts `adjacency` to `active` indices, returning a dense
/// adjacency list over `0..active.len()` plus the local->global index map.
fn induced_subgraph(
    adjacency: &[Vec<usize>],
    active: &[usize],
) -> (Vec<Vec<usize>>, Vec<usize>) {
    let global_to_local: std::collections::HashMap<usize, usize> = active
        .iter()
        .enumerate()
        .map(|(local, &global)| (global, local))
        .collect();

    let sub: Vec<Vec<usize>> = active
        .iter()
        .map(|&global| {
            adjacency[global]
                .iter()
                .filter_map(|g| global_to_local.get(g).copied())
                .collect()
        })
        .collect();

    (sub, active.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Molecule;
    use pretty_assertions::assert_eq;

    fn hexagon(mol: &mut Molecule) -> Vec<AtomId> {
        let atoms: Vec<_> = (0..6).map(|_| mol.add_atom(6).unwrap()).collect();
        for a in &atoms {
            mol.atom_mut(*a).in_ring = true;
        }
        for i in 0..6 {
            mol.add_bond(atoms[i], atoms[(i + 1) % 6], 1).unwrap();
        }
        atoms
    }

    #[test]
    fn monocyclic_hexagon_walks_every_atom() {
        let mut mol = Molecule::new();
        let atoms = hexagon(&mut mol);
        let walk = find_ring_walk(&mol, &atoms).unwrap();
        assert_eq!(walk.path.len(), 6);
        assert!(walk.broken.is_empty());
    }

    #[test]
    fn fused_bicyclic_naphthalene_like_system_walks_all_ten() {
        let mut mol = Molecule::new();
        let atoms: Vec<_> = (0..10).map(|_| mol.add_atom(6).unwrap()).collect();
        for a in &atoms {
            mol.atom_mut(*a).in_ring = true;
        }
        // Perimeter of 10, fused at a chord between atoms 0 and 5.
        for i in 0..10 {
            mol.add_bond(atoms[i], atoms[(i + 1) % 10], 1).unwrap();
        }
        mol.add_bond(atoms[0], atoms[5], 1).unwrap();

        let walk = find_ring_walk(&mol, &atoms).unwrap();
        assert_eq!(walk.path.len(), 10);
        assert!(walk.broken.is_empty());
    }
}
