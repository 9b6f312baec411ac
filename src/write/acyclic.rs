use super::charge::ChargeLedger;
use super::error::WriteError;
use super::options::WriteOptions;
use crate::element::{atom_to_letter, symbol_for};
use crate::graph::{AtomId, Molecule};
use std::collections::HashSet;

/// Writes one non-ring connected component as an acyclic WLN fragment
/// (§4.4 "Acyclic sub-writer"): a DFS with chain contraction, carbonyl
/// (`V`) and dioxo (`W`) collapsing, and `&`-separated sibling branches.
pub fn write_component(
    mol: &Molecule,
    component: &[AtomId],
    ledger: &mut ChargeLedger,
    options: &WriteOptions,
) -> Result<String, WriteError> {
    let root = preferred_root(component);
    write_from(mol, root, ledger, options)
}

/// As [`write_component`], but rooted at a caller-chosen atom — used by
/// [`super::canonicalize`] to try every valid starting point.
pub fn write_from(
    mol: &Molecule,
    root: AtomId,
    ledger: &mut ChargeLedger,
    options: &WriteOptions,
) -> Result<String, WriteError> {
    let mut visited = HashSet::new();
    let mut out = String::new();
    emit(mol, root, &mut visited, &mut out, ledger, options)?;
    Ok(out)
}

fn preferred_root(component: &[AtomId]) -> AtomId {
    *component.iter().min_by_key(|a| a.index()).expect("non-empty component")
}

/// `true` for an atom the chain-contraction pass absorbs into a run of
/// digits rather than writing as a letter: a plain, uncharged, non-ring
/// carbon with no branching (total degree at most 2 — one bond in, at
/// most one bond out). Branch points (degree >= 3) always go through
/// [`atom_to_letter`] as `X`/`Y` instead, even for a lone substituent,
/// so the two notations never collide on the same atom.
fn is_chain_carbon(mol: &Molecule, atom: AtomId) -> bool {
    let a = mol.atom(atom);
    a.atomic_number == 6 && a.charge == 0 && !a.in_ring && mol.degree(atom) <= 2
}

/// `true` when `atom` should *start* a digit-run contraction: it must be
/// an [`is_chain_carbon`] that is either the root of its own component
/// (degree 0, e.g. lone methane written as `1`) or still has somewhere
/// left to extend into. A plain carbon whose only neighbor is already
/// visited is a dead-end leaf (e.g. the terminal methyl in `QY`) reached
/// as someone else's substituent, not the head of a chain — it has to go
/// through [`atom_to_letter`] like any other branch atom, or contraction
/// would swallow it into a degenerate single-digit run instead of
/// spelling it out as `Y`/`X`.
fn starts_contractible_chain(mol: &Molecule, atom: AtomId, visited: &HashSet<AtomId>) -> bool {
    is_chain_carbon(mol, atom)
        && (mol.degree(atom) == 0 || mol.neighbors(atom).any(|(n, _)| !visited.contains(&n)))
}

/// Consumes a maximal run of plain carbons starting at `start`, marking
/// each as visited, and returns `(digit_string, last_atom)`.
fn contract_chain(
    mol: &Molecule,
    start: AtomId,
    visited: &mut HashSet<AtomId>,
) -> (u32, AtomId) {
    let mut count = 1u32;
    let mut current = start;
    visited.insert(current);

    loop {
        let forward: Vec<AtomId> = mol
            .neighbors(current)
            .map(|(n, _)| n)
            .filter(|n| !visited.contains(n))
            .collect();
        if forward.len() != 1 {
            break;
        }
        let next = forward[0];
        if !is_chain_carbon(mol, next) {
            break;
        }
        visited.insert(next);
        current = next;
        count += 1;
    }
    (count, current)
}

/// Returns the atom's two terminal, non-ring, double-bonded oxygen
/// neighbors (for dioxo/`W` detection) or its single one (for carbonyl
/// `V` detection), whichever applies.
fn double_bonded_oxygens(mol: &Molecule, atom: AtomId) -> Vec<AtomId> {
    mol.neighbors(atom)
        .filter(|&(n, bond)| {
            let o = mol.atom(n);
            o.atomic_number == 8 && !o.in_ring && mol.degree(n) == 1 && mol.bond(bond).order == 2
        })
        .map(|(n, _)| n)
        .collect()
}

fn emit(
    mol: &Molecule,
    atom: AtomId,
    visited: &mut HashSet<AtomId>,
    out: &mut String,
    ledger: &mut ChargeLedger,
    options: &WriteOptions,
) -> Result<usize, WriteError> {
    if options.debug {
        log::debug!("writing atom {atom}");
    }

    let oxygens = double_bonded_oxygens(mol, atom);
    let a = mol.atom(atom);

    if a.atomic_number == 6 && !a.in_ring && oxygens.len() == 1 {
        out.push('V');
        visited.insert(atom);
        visited.insert(oxygens[0]);
        // The `V` template implies no implicit hydrogens; any the atom
        // actually carries (e.g. the aldehyde `H` in `VH3`) must still
        // be spelled out.
        out.push_str(&"H".repeat(a.hydrogens as usize));
        ledger.record(atom, a.charge);
        return emit_children(mol, atom, visited, out, ledger, options, 4);
    }

    if oxygens.len() == 2 {
        out.push('W');
        visited.insert(oxygens[0]);
        visited.insert(oxygens[1]);
        // `W` marks the atom rather than replacing it; fall through to
        // write the atom itself afterward.
        return emit_marked_atom(mol, atom, visited, out, ledger, options);
    }

    emit_marked_atom(mol, atom, visited, out, ledger, options)
}

fn emit_marked_atom(
    mol: &Molecule,
    atom: AtomId,
    visited: &mut HashSet<AtomId>,
    out: &mut String,
    ledger: &mut ChargeLedger,
    options: &WriteOptions,
) -> Result<usize, WriteError> {
    if !visited.contains(&atom) && starts_contractible_chain(mol, atom, visited) {
        let (count, last) = contract_chain(mol, atom, visited);
        out.push_str(&count.to_string());
        ledger.record(last, mol.atom(last).charge);
        return emit_children(mol, last, visited, out, ledger, options, 4);
    }

    visited.insert(atom);
    let a = mol.atom(atom);
    let budget = crate::element::permitted_valence(a.atomic_number).unwrap_or(4);

    match atom_to_letter(a.atomic_number, a.charge, a.hydrogens) {
        Some(letter) => out.push(letter),
        None => {
            let symbol = symbol_for(a.atomic_number)
                .ok_or(WriteError::UnencodableAtom(atom.index(), a.atomic_number))?;
            out.push('-');
            out.push_str(symbol);
            out.push('-');
            // Dash-block codes carry no implicit hydrogens of their own.
            out.push_str(&"H".repeat(a.hydrogens as usize));
        }
    }
    ledger.record(atom, a.charge);
    emit_children(mol, atom, visited, out, ledger, options, budget)
}

fn emit_children(
    mol: &Molecule,
    atom: AtomId,
    visited: &mut HashSet<AtomId>,
    out: &mut String,
    ledger: &mut ChargeLedger,
    options: &WriteOptions,
    budget: u8,
) -> Result<usize, WriteError> {
    let mut children: Vec<AtomId> = mol
        .neighbors(atom)
        .map(|(n, _)| n)
        .filter(|n| !visited.contains(n))
        .collect();
    children.sort_by_key(|a| a.index());

    let self_pushes = usize::from(budget > 1);
    if children.is_empty() {
        return Ok(self_pushes);
    }

    let mut last_open = 0usize;
    for (i, &child) in children.iter().enumerate() {
        if i > 0 {
            out.push_str(&"&".repeat(last_open));
        }
        if let Some(bond) = mol.bond_between(atom, child) {
            for _ in 1..mol.bond(bond).order {
                out.push('U');
            }
        }
        last_open = emit(mol, child, visited, out, ledger, options)?;
    }

    Ok(self_pushes + last_open)
}

/// Writes whatever non-ring substituents hang off a ring atom (§4.4
/// "Acyclic sub-writer", invoked from the cyclic sub-writer rather than
/// from a DFS root): `atom` itself is already visited and already
/// emitted as its ring-position letter; this only emits its pendant
/// children, `&`-separated exactly as [`emit_children`] does for a
/// plain acyclic branch point.
pub(crate) fn write_ring_substituents(
    mol: &Molecule,
    atom: AtomId,
    visited: &mut HashSet<AtomId>,
    out: &mut String,
    ledger: &mut ChargeLedger,
    options: &WriteOptions,
) -> Result<usize, WriteError> {
    let budget = crate::element::permitted_valence(mol.atom(atom).atomic_number).unwrap_or(4);
    emit_children(mol, atom, visited, out, ledger, options, budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::WriteOptions;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_propane_contracts_to_a_single_digit() {
        let mut mol = Molecule::new();
        let atoms: Vec<_> = (0..3).map(|_| mol.add_atom(6).unwrap()).collect();
        for &a in &atoms {
            mol.atom_mut(a).hydrogens = 2;
        }
        mol.atom_mut(atoms[0]).hydrogens = 3;
        mol.atom_mut(atoms[2]).hydrogens = 3;
        mol.add_bond(atoms[0], atoms[1], 1).unwrap();
        mol.add_bond(atoms[1], atoms[2], 1).unwrap();

        let mut ledger = ChargeLedger::new();
        let s = write_component(&mol, &atoms, &mut ledger, &WriteOptions::new()).unwrap();
        assert_eq!(s, "3");
    }

    #[test]
    fn hydroxyl_methyl_writes_as_q_and_y() {
        let mut mol = Molecule::new();
        let o = mol.add_atom(8).unwrap();
        let c = mol.add_atom(6).unwrap();
        mol.atom_mut(o).hydrogens = 1;
        mol.atom_mut(c).hydrogens = 3;
        mol.add_bond(o, c, 1).unwrap();

        let mut ledger = ChargeLedger::new();
        let s = write_component(&mol, &[o, c], &mut ledger, &WriteOptions::new()).unwrap();
        assert_eq!(s, "QY");
    }

    #[test]
    fn carbonyl_carbon_collapses_to_v() {
        let mut mol = Molecule::new();
        let c = mol.add_atom(6).unwrap();
        let o = mol.add_atom(8).unwrap();
        mol.add_bond(c, o, 2).unwrap();
        mol.atom_mut(c).hydrogens = 1;

        let mut ledger = ChargeLedger::new();
        let s = write_component(&mol, &[c, o], &mut ledger, &WriteOptions::new()).unwrap();
        assert_eq!(s, "VH");
    }
}
