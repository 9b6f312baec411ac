use super::error::RingError;
use super::types::{RingBond, RingBuildInput, RingSkeleton, SubringDescriptor};
use crate::locant::Locant;

/// Sentinel stored in `next_locant` for "no further path position" (the
/// tail end of the initial chain, before any subring rewrites it).
const NONE: usize = usize::MAX;

/// Builds a ring skeleton from accumulated subring descriptors, per
/// PathSolver III (§4.2): lay down the initial path, then close each
/// subring by walking forward from its start locant and bonding back.
///
/// Falls back to the flood-fill search whenever `input` carries pseudo
/// locants, or whenever the fast walk dead-ends on a particular subring
/// (mirroring the "fast walk then flood-fill fallback" structure real
/// WLN ring-assembly code uses).
pub fn build(input: &RingBuildInput) -> Result<RingSkeleton, RingError> {
    let n = input.size as usize;
    if n == 0 {
        return Err(RingError::DegenerateSize(input.size));
    }

    let mut bonds = Vec::with_capacity(n);
    let mut next_locant = vec![NONE; n];
    for i in 0..n.saturating_sub(1) {
        bonds.push(RingBond {
            from: i,
            to: i + 1,
            aromatic: false,
        });
        next_locant[i] = i + 1;
    }

    let mut remaining: Vec<i32> = (0..n)
        .map(|i| if i == 0 || i == n - 1 { 2 } else { 1 })
        .collect();
    for locant in &input.bridges {
        remaining[index_of(*locant)] -= 1;
    }
    for locant in &input.multicyclic {
        remaining[index_of(*locant)] += 1;
    }

    let mut aromatic_atoms = vec![false; n];
    let use_flood_fill = !input.pseudo_locants.is_empty();

    for descriptor in &input.subrings {
        let start_idx = advance_to_open_start(descriptor.start, &remaining, &next_locant, n)?;

        let path = if use_flood_fill {
            flood_fill_path(start_idx, descriptor.length, &bonds, n)
                .or_else(|| fast_walk_path(start_idx, descriptor.length, &next_locant))
        } else {
            fast_walk_path(start_idx, descriptor.length, &next_locant)
                .or_else(|| flood_fill_path(start_idx, descriptor.length, &bonds, n))
        };

        let path = path.ok_or(RingError::UnderSpecified {
            start: descriptor.start,
            needed: descriptor.length.saturating_sub(1),
        })?;

        let end_idx = *path.last().expect("path always has a start element");
        bonds.push(RingBond {
            from: start_idx,
            to: end_idx,
            aromatic: descriptor.aromatic,
        });

        if descriptor.aromatic {
            for &i in &path {
                aromatic_atoms[i] = true;
            }
            for window in path.windows(2) {
                if let Some(b) = find_bond_mut(&mut bonds, window[0], window[1]) {
                    b.aromatic = true;
                }
            }
        }

        remaining[start_idx] -= 1;
        next_locant[start_idx] = end_idx;
    }

    Ok(RingSkeleton {
        size: n,
        bonds,
        aromatic_atoms,
    })
}

fn index_of(locant: Locant) -> usize {
    locant.value() as usize - 1
}

fn advance_to_open_start(
    start: Locant,
    remaining: &[i32],
    next_locant: &[usize],
    n: usize,
) -> Result<usize, RingError> {
    let mut idx = index_of(start);
    let mut steps = 0;
    while idx < n && remaining[idx] <= 0 {
        idx = next_locant[idx];
        steps += 1;
        if steps > n {
            return Err(RingError::ImpossibleFusion { start });
        }
    }
    if idx >= n {
        return Err(RingError::ImpossibleFusion { start });
    }
    Ok(idx)
}

/// Walks `length - 1` steps forward from `start` along `next_locant`,
/// returning the full visited path (including `start`) if it completes.
fn fast_walk_path(start: usize, length: u8, next_locant: &[usize]) -> Option<Vec<usize>> {
    let mut path = vec![start];
    let mut cur = start;
    for _ in 0..length.saturating_sub(1) {
        let next = next_locant[cur];
        if next == NONE {
            return None;
        }
        path.push(next);
        cur = next;
    }
    Some(path)
}

/// Backtracking search for a simple path of exactly `length - 1` edges
/// starting at `start` over the bonds built so far. Neighbors are tried
/// in descending locant order, so the first path found is already the
/// lexicographically maximal one (and, among equal prefixes, the one
/// reaching the highest terminal locant) — matching §4.2's flood-fill
/// tie-break without a separate comparison pass.
fn flood_fill_path(start: usize, length: u8, bonds: &[RingBond], n: usize) -> Option<Vec<usize>> {
    let target_len = length.saturating_sub(1) as usize;
    if target_len == 0 {
        return Some(vec![start]);
    }

    let mut adjacency = vec![Vec::new(); n];
    for bond in bonds {
        adjacency[bond.from].push(bond.to);
        adjacency[bond.to].push(bond.from);
    }
    for neighbors in &mut adjacency {
        neighbors.sort_unstable_by(|a, b| b.cmp(a));
        neighbors.dedup();
    }

    let mut visited = vec![false; n];
    let mut path = vec![start];
    visited[start] = true;

    if search(start, target_len, &adjacency, &mut visited, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn search(
    current: usize,
    remaining_steps: usize,
    adjacency: &[Vec<usize>],
    visited: &mut [bool],
    path: &mut Vec<usize>,
) -> bool {
    if remaining_steps == 0 {
        return true;
    }
    for &next in &adjacency[current] {
        if visited[next] {
            continue;
        }
        visited[next] = true;
        path.push(next);
        if search(next, remaining_steps - 1, adjacency, visited, path) {
            return true;
        }
        path.pop();
        visited[next] = false;
    }
    false
}

fn find_bond_mut(bonds: &mut [RingBond], a: usize, b: usize) -> Option<&mut RingBond> {
    bonds
        .iter_mut()
        .find(|bond| (bond.from == a && bond.to == b) || (bond.from == b && bond.to == a))
}

/// The `R` benzene shortcut (§4.2 edge cases): a 6-membered aromatic
/// carbon ring, starting at locant `A`.
pub fn benzene_input() -> RingBuildInput {
    RingBuildInput {
        subrings: vec![SubringDescriptor::new(Locant::main(1), 6, true)],
        size: 6,
        bridges: Vec::new(),
        multicyclic: Vec::new(),
        pseudo_locants: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn descriptor(start: u16, length: u8, aromatic: bool) -> SubringDescriptor {
        SubringDescriptor::new(Locant::main(start), length, aromatic)
    }

    #[test]
    fn benzene_shortcut_builds_a_six_membered_aromatic_ring() {
        let skeleton = build(&benzene_input()).unwrap();
        assert_eq!(skeleton.size, 6);
        assert_eq!(skeleton.bonds.len(), 6);
        assert!(skeleton.aromatic_atoms.iter().all(|&a| a));
    }

    #[test]
    fn single_subring_closes_a_monocyclic_path() {
        let input = RingBuildInput {
            subrings: vec![descriptor(1, 5, false)],
            size: 5,
            bridges: Vec::new(),
            multicyclic: Vec::new(),
            pseudo_locants: Vec::new(),
        };
        let skeleton = build(&input).unwrap();
        assert_eq!(skeleton.size, 5);
        // 4 path bonds + 1 closing bond.
        assert_eq!(skeleton.bonds.len(), 5);
        assert!(skeleton
            .bonds
            .iter()
            .any(|b| (b.from == 0 && b.to == 4) || (b.from == 4 && b.to == 0)));
    }

    #[test]
    fn fused_bicyclic_naphthalene_skeleton() {
        // Naphthalene: 10 on-path atoms, two fused six-membered rings
        // sharing the 4a-8a bond (locants A..J here, fusion at A-F).
        let input = RingBuildInput {
            subrings: vec![descriptor(1, 6, true), descriptor(6, 6, true)],
            size: 10,
            bridges: vec![Locant::main(1), Locant::main(6)],
            multicyclic: vec![Locant::main(1), Locant::main(6)],
            pseudo_locants: Vec::new(),
        };
        let skeleton = build(&input).unwrap();
        assert_eq!(skeleton.size, 10);
        // 9 path bonds + 2 closing bonds.
        assert_eq!(skeleton.bonds.len(), 11);
    }

    #[test]
    fn under_specified_ring_is_reported() {
        let input = RingBuildInput {
            subrings: vec![descriptor(1, 9, false)],
            size: 5,
            bridges: Vec::new(),
            multicyclic: Vec::new(),
            pseudo_locants: Vec::new(),
        };
        assert!(matches!(
            build(&input),
            Err(RingError::UnderSpecified { .. })
        ));
    }
}
