use super::acyclic::write_ring_substituents;
use super::charge::ChargeLedger;
use super::error::WriteError;
use super::options::WriteOptions;
use crate::element::symbol_for;
use crate::graph::{perceive_sssr, AtomId, Molecule, Ring};
use std::collections::HashSet;

/// One subring closure the ring block needs to emit: a size and whether
/// it is aromatic (§4.4's "emit ring-size digits and locant prefixes").
/// Every descriptor here implicitly starts at locant `A`, mirroring
/// [`crate::read::read`]'s ring-block parser (see `DESIGN.md` for why
/// this crate's ring grammar doesn't carry explicit per-subring start
/// locants): each subring reuses the position-0 hub atom as its start,
/// which is exactly where [`plan`] places the fusion/spiro atom.
struct Descriptor {
    size: usize,
    aromatic: bool,
}

/// A fully planned ring block: the on-path atoms (position `i` is locant
/// `i + 1`), the subring descriptors to emit in order, and any atoms set
/// aside as broken (off-path) locants (§4.4 PathFinderIIIb fallback).
struct Plan {
    path: Vec<AtomId>,
    descriptors: Vec<Descriptor>,
    broken: Vec<(AtomId, AtomId)>,
}

/// Writes one ring-bearing connected component's ring system as a WLN
/// ring block (§4.4 "Cyclic sub-writer"), then appends any pendant
/// substituents on the ring's root atom as a suffix.
///
/// `ring_atoms` is the full set of `in_ring` atoms in one connected
/// subgraph; `visited` is shared with the acyclic writer so pendant
/// trees never re-enter the ring.
pub fn write_ring_system(
    mol: &Molecule,
    ring_atoms: &[AtomId],
    visited: &mut HashSet<AtomId>,
    ledger: &mut ChargeLedger,
    options: &WriteOptions,
) -> Result<String, WriteError> {
    let local_rings: Vec<Ring> = perceive_sssr(mol)
        .into_iter()
        .filter(|r| r.atoms.iter().all(|a| ring_atoms.contains(a)))
        .collect();

    let plan = plan_ring_block(mol, ring_atoms, &local_rings)?;

    for &atom in &plan.path {
        visited.insert(atom);
    }
    for &(atom, _) in &plan.broken {
        visited.insert(atom);
    }

    validate_heteroatom_contiguity(mol, &plan.path)?;

    let mut out = String::new();
    let heterocyclic = plan.path.iter().any(|&a| mol.atom(a).atomic_number != 6)
        || plan.broken.iter().any(|&(a, _)| mol.atom(a).atomic_number != 6);
    out.push(if heterocyclic { 'T' } else { 'L' });

    let last = plan.descriptors.len().saturating_sub(1);
    for (i, descriptor) in plan.descriptors.iter().enumerate() {
        out.push_str(&descriptor.size.to_string());
        // Interleaved `T`s also separate digit runs in a fused system, so
        // only the last descriptor's flag is deferred — the `T`/`L`
        // opener already covers it when there's a single subring.
        if i != last && !descriptor.aromatic {
            out.push('T');
        }
    }

    for &atom in &plan.path {
        let a = mol.atom(atom);
        if a.atomic_number == 6 {
            continue;
        }
        out.push_str(&ring_hetero_token(a.atomic_number).ok_or(WriteError::UnencodableAtom(
            atom.index(),
            a.atomic_number,
        ))?);
    }

    // The last subring's saturation flag reads more naturally after the
    // heteroatom tokens (`T6OJ`, not `T6TOJ`); skip it outright for a
    // single, heterocyclic-opened subring since the `T` opener alone
    // already reads back as non-aromatic.
    if let Some(descriptor) = plan.descriptors.last() {
        if !descriptor.aromatic && !(last == 0 && heterocyclic) {
            out.push('T');
        }
    }

    out.push('J');

    let root = *plan.path.first().ok_or(WriteError::NoRingStart(0))?;
    write_ring_substituents(mol, root, visited, &mut out, ledger, options)?;

    for &atom in &plan.path {
        ledger.record(atom, mol.atom(atom).charge);
    }
    for &(atom, _) in &plan.broken {
        ledger.record(atom, mol.atom(atom).charge);
    }

    Ok(out)
}

/// Chooses which in-system atom should carry any pendant (non-ring)
/// substituents: the only ring position the current reader attaches
/// further structure to is the path's root (locant `A`), so at most one
/// ring atom may have external neighbors (§4.4 Non-goals noted in
/// `DESIGN.md`).
fn substituted_atom(mol: &Molecule, ring_atoms: &[AtomId]) -> Result<Option<AtomId>, WriteError> {
    let mut found = None;
    for &atom in ring_atoms {
        let has_external = mol
            .neighbors(atom)
            .any(|(n, _)| !ring_atoms.contains(&n));
        if has_external {
            if found.is_some() {
                return Err(WriteError::IncompleteRingWalk(atom.index()));
            }
            found = Some(atom);
        }
    }
    Ok(found)
}

fn plan_ring_block(
    mol: &Molecule,
    ring_atoms: &[AtomId],
    local_rings: &[Ring],
) -> Result<Plan, WriteError> {
    let substituted = substituted_atom(mol, ring_atoms)?;

    match local_rings.len() {
        0 => Err(WriteError::NoRingStart(
            ring_atoms.first().map(|a| a.index()).unwrap_or(0),
        )),
        1 => plan_monocyclic(mol, &local_rings[0], substituted),
        2 if covers_exactly(&local_rings[0], &local_rings[1], ring_atoms) => {
            plan_two_ring_fusion(mol, &local_rings[0], &local_rings[1], substituted)
        }
        _ => plan_fallback(mol, ring_atoms, local_rings, substituted),
    }
}

fn covers_exactly(a: &Ring, b: &Ring, ring_atoms: &[AtomId]) -> bool {
    let mut union: Vec<AtomId> = a.atoms.iter().chain(b.atoms.iter()).copied().collect();
    union.sort_by_key(|x| x.index());
    union.dedup();
    union.len() == ring_atoms.len() && union.iter().all(|a| ring_atoms.contains(a))
}

/// Rotates `ring`'s cycle so `root` is first, choosing the direction
/// that does not immediately step to `avoid` (used to keep the shared
/// fusion atom at the far end of the sequence rather than right next
/// to the hub).
fn rotate_from(ring: &[AtomId], root: AtomId, avoid: Option<AtomId>) -> Vec<AtomId> {
    let n = ring.len();
    let pos = ring.iter().position(|&a| a == root).expect("root is in ring");

    let forward_next = ring[(pos + 1) % n];
    let go_forward = avoid != Some(forward_next);

    (0..n)
        .map(|i| {
            let idx = if go_forward {
                (pos + i) % n
            } else {
                (pos + n - i) % n
            };
            ring[idx]
        })
        .collect()
}

fn ring_is_aromatic(mol: &Molecule, atoms: &[AtomId]) -> bool {
    atoms.iter().all(|&a| mol.atom(a).aromatic)
}

fn plan_monocyclic(
    mol: &Molecule,
    ring: &Ring,
    substituted: Option<AtomId>,
) -> Result<Plan, WriteError> {
    let root = substituted.unwrap_or(ring.atoms[0]);
    if !ring.contains(root) {
        return Err(WriteError::IncompleteRingWalk(root.index()));
    }
    let path = rotate_from(&ring.atoms, root, None);
    let aromatic = ring_is_aromatic(mol, &path);
    Ok(Plan {
        descriptors: vec![Descriptor {
            size: path.len(),
            aromatic,
        }],
        path,
        broken: Vec::new(),
    })
}

fn plan_two_ring_fusion(
    mol: &Molecule,
    ring1: &Ring,
    ring2: &Ring,
    substituted: Option<AtomId>,
) -> Result<Plan, WriteError> {
    let shared: Vec<AtomId> = ring1
        .atoms
        .iter()
        .copied()
        .filter(|a| ring2.contains(*a))
        .collect();

    if shared.is_empty() || shared.len() > 2 {
        let mut combined: Vec<AtomId> = ring1
            .atoms
            .iter()
            .chain(ring2.atoms.iter())
            .copied()
            .collect();
        combined.sort_by_key(|a| a.index());
        combined.dedup();
        return plan_fallback(mol, &combined, &[ring1.clone(), ring2.clone()], substituted);
    }

    let hub = match substituted {
        Some(atom) if shared.contains(&atom) => atom,
        Some(atom) => return Err(WriteError::IncompleteRingWalk(atom.index())),
        None => *shared.iter().min_by_key(|a| a.index()).expect("non-empty"),
    };

    let far = shared.iter().copied().find(|&a| a != hub);

    let ring1_seq = rotate_from(&ring1.atoms, hub, far);
    let ring1_aromatic = ring_is_aromatic(mol, &ring1_seq);

    let mut path = ring1_seq.clone();
    let mut descriptors = vec![Descriptor {
        size: ring1_seq.len(),
        aromatic: ring1_aromatic,
    }];

    if let Some(far) = far {
        // Ortho-fusion: ring2 continues from `far`, walking away from
        // `hub`, contributing its `size - 2` middle atoms.
        let ring2_from_far = rotate_from(&ring2.atoms, far, Some(hub));
        let ring2_aromatic = ring_is_aromatic(mol, &ring2.atoms);
        let middle = &ring2_from_far[1..ring2_from_far.len() - 1];
        path.extend_from_slice(middle);
        descriptors.push(Descriptor {
            size: ring2.atoms.len(),
            aromatic: ring2_aromatic,
        });
    } else {
        // Spiro: ring2 is a separate cycle touching only at `hub`.
        let ring2_seq = rotate_from(&ring2.atoms, hub, None);
        let ring2_aromatic = ring_is_aromatic(mol, &ring2_seq);
        path.extend_from_slice(&ring2_seq[1..]);
        descriptors.push(Descriptor {
            size: ring2_seq.len(),
            aromatic: ring2_aromatic,
        });
    }

    Ok(Plan {
        path,
        descriptors,
        broken: Vec::new(),
    })
}

/// Best-effort plan for ring systems this writer's simplified grammar
/// cannot express as nested fused descriptors (three or more fused
/// rings, bridges, multicyclic junctions): the largest ring becomes the
/// sole subring descriptor, and every other ring atom is linearized as a
/// broken (off-path) locant hanging off whichever main-ring atom it is
/// directly bonded to (§4.4 PathFinderIIIb; §3 broken-locant notation).
///
/// This is a deliberately narrower implementation than full
/// PathFinderIIIb backtracking — see `DESIGN.md` for the scope decision
/// and the original source's own acknowledgment that fully general
/// multicyclic/caged systems are an open problem.
fn plan_fallback(
    mol: &Molecule,
    ring_atoms: &[AtomId],
    local_rings: &[Ring],
    substituted: Option<AtomId>,
) -> Result<Plan, WriteError> {
    let main = local_rings
        .iter()
        .max_by_key(|r| r.size())
        .ok_or(WriteError::NoRingStart(0))?;

    let root = match substituted {
        Some(atom) if main.contains(atom) => atom,
        Some(atom) if ring_atoms.contains(&atom) => atom,
        Some(atom) => return Err(WriteError::IncompleteRingWalk(atom.index())),
        None => main.atoms[0],
    };

    let path = if main.contains(root) {
        rotate_from(&main.atoms, root, None)
    } else {
        main.atoms.clone()
    };
    let aromatic = ring_is_aromatic(mol, &path);

    let mut broken = Vec::new();
    let mut child_counts: std::collections::HashMap<AtomId, u8> = std::collections::HashMap::new();
    for &atom in ring_atoms {
        if path.contains(&atom) {
            continue;
        }
        let parent = mol
            .neighbors(atom)
            .map(|(n, _)| n)
            .filter(|n| path.contains(n))
            .min_by_key(|n| path.iter().position(|p| p == n).unwrap_or(usize::MAX))
            .ok_or(WriteError::IncompleteRingWalk(atom.index()))?;
        let slot = child_counts.entry(parent).or_insert(0);
        if *slot >= 6 {
            return Err(WriteError::IncompleteRingWalk(atom.index()));
        }
        broken.push((atom, parent));
        *slot += 1;
    }

    if !broken.is_empty() {
        log::warn!(
            "ring system with {} atoms could not be fully expressed as nested subrings; \
             {} atom(s) were linearized as broken locants",
            ring_atoms.len(),
            broken.len()
        );
    }

    Ok(Plan {
        descriptors: vec![Descriptor {
            size: path.len(),
            aromatic,
        }],
        path,
        broken,
    })
}

fn validate_heteroatom_contiguity(mol: &Molecule, path: &[AtomId]) -> Result<(), WriteError> {
    let hetero_positions: Vec<usize> = path
        .iter()
        .enumerate()
        .filter(|(_, a)| mol.atom(**a).atomic_number != 6)
        .map(|(i, _)| i)
        .collect();
    let contiguous_from_start = hetero_positions
        .iter()
        .enumerate()
        .all(|(expected, &actual)| expected == actual);
    if contiguous_from_start {
        Ok(())
    } else {
        let offender = hetero_positions.first().copied().unwrap_or(0);
        Err(WriteError::IncompleteRingWalk(path[offender].index()))
    }
}

/// The single-letter (or dash-block) token the reader would accept for
/// a heteroatom substitution inside a ring block (§4.1, §4.3).
fn ring_hetero_token(atomic_number: u8) -> Option<String> {
    match atomic_number {
        5 => Some("B".to_string()),
        7 => Some("N".to_string()),
        8 => Some("O".to_string()),
        9 => Some("F".to_string()),
        15 => Some("P".to_string()),
        16 => Some("S".to_string()),
        17 => Some("G".to_string()),
        35 => Some("E".to_string()),
        53 => Some("I".to_string()),
        other => symbol_for(other).map(|s| format!("-{s}-")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::charge::ChargeLedger;
    use crate::write::options::WriteOptions;
    use pretty_assertions::assert_eq;

    fn hexagon(mol: &mut Molecule, aromatic: bool) -> Vec<AtomId> {
        let atoms: Vec<_> = (0..6).map(|_| mol.add_atom(6).unwrap()).collect();
        for &a in &atoms {
            mol.atom_mut(a).in_ring = true;
            mol.atom_mut(a).aromatic = aromatic;
            mol.atom_mut(a).hydrogens = 1;
        }
        for i in 0..6 {
            mol.add_bond(atoms[i], atoms[(i + 1) % 6], 1).unwrap();
        }
        atoms
    }

    #[test]
    fn benzene_writes_as_l6j() {
        let mut mol = Molecule::new();
        let atoms = hexagon(&mut mol, true);
        let mut visited = HashSet::new();
        let mut ledger = ChargeLedger::new();
        let s =
            write_ring_system(&mol, &atoms, &mut visited, &mut ledger, &WriteOptions::new())
                .unwrap();
        assert_eq!(s, "L6J");
    }

    #[test]
    fn cyclohexane_writes_as_l6tj() {
        let mut mol = Molecule::new();
        let atoms = hexagon(&mut mol, false);
        for &a in &atoms {
            mol.atom_mut(a).hydrogens = 2;
        }
        let mut visited = HashSet::new();
        let mut ledger = ChargeLedger::new();
        let s =
            write_ring_system(&mol, &atoms, &mut visited, &mut ledger, &WriteOptions::new())
                .unwrap();
        assert_eq!(s, "L6TJ");
    }

    #[test]
    fn tetrahydropyran_writes_with_leading_oxygen() {
        let mut mol = Molecule::new();
        let atoms: Vec<_> = (0..6)
            .map(|i| mol.add_atom(if i == 0 { 8 } else { 6 }).unwrap())
            .collect();
        for &a in &atoms {
            mol.atom_mut(a).in_ring = true;
        }
        mol.atom_mut(atoms[0]).hydrogens = 0;
        for &a in &atoms[1..] {
            mol.atom_mut(a).hydrogens = 2;
        }
        for i in 0..6 {
            mol.add_bond(atoms[i], atoms[(i + 1) % 6], 1).unwrap();
        }

        let mut visited = HashSet::new();
        let mut ledger = ChargeLedger::new();
        let s =
            write_ring_system(&mol, &atoms, &mut visited, &mut ledger, &WriteOptions::new())
                .unwrap();
        assert_eq!(s, "T6OJ");
    }
}
