//! WLN writing (component E): serializes a [`Molecule`](crate::graph::Molecule)
//! back into a WLN string, one connected component at a time.
//!
//! Each component is written by the acyclic DFS sub-writer
//! ([`acyclic`]) if it has no ring atoms, or by the cyclic sub-writer
//! ([`cyclic`]) — which plans a ring walk via [`path`] and emits the
//! `L…J`/`T…J` block — if it does. Deferred charges ([`charge`]) are
//! rendered once, across the whole molecule, after every component has
//! been written.

mod acyclic;
mod charge;
mod cyclic;
mod error;
mod options;
mod path;

pub use error::WriteError;
pub use options::WriteOptions;

use crate::graph::{AtomId, Molecule};
use charge::ChargeLedger;
use std::collections::HashSet;

/// Writes `mol` to a WLN string (§6's public surface).
///
/// Connected (ionic) components are written independently and joined
/// with ` &`, matching how [`crate::read::read`] splits on the same
/// separator (§4.4 "Ionic components").
pub fn write(mol: &Molecule, options: WriteOptions) -> Result<String, WriteError> {
    let mut ledger = ChargeLedger::new();
    let mut pieces = Vec::new();

    for component in mol.components() {
        pieces.push(write_component(mol, &component, &mut ledger, &options)?);
    }

    let mut out = pieces.join(" &");
    out.push_str(&ledger.render());
    Ok(out)
}

fn write_component(
    mol: &Molecule,
    component: &[AtomId],
    ledger: &mut ChargeLedger,
    options: &WriteOptions,
) -> Result<String, WriteError> {
    let ring_atoms: Vec<AtomId> = component
        .iter()
        .copied()
        .filter(|&a| mol.atom(a).in_ring)
        .collect();

    if ring_atoms.is_empty() {
        acyclic::write_component(mol, component, ledger, options)
    } else {
        let mut visited: HashSet<AtomId> = HashSet::new();
        cyclic::write_ring_system(mol, &ring_atoms, &mut visited, ledger, options)
    }
}

/// Writes `input` back out in a normalized form: reads it, then writes
/// it using every acyclic component's lexicographically-greatest,
/// then-shortest, valid root (§4.5 "Canonicalization"). Ring-bearing
/// components have only one valid root (the ring's own fusion/hub
/// atom), so canonicalization only has freedom to explore over
/// acyclic components.
pub fn canonicalize(input: &str) -> Result<String, crate::Error> {
    let mol = crate::read::read(input, crate::read::ReadOptions::new())?;
    let options = WriteOptions::new();

    let mut ledger = ChargeLedger::new();
    let mut pieces = Vec::new();

    for component in mol.components() {
        let ring_atoms: Vec<AtomId> = component
            .iter()
            .copied()
            .filter(|&a| mol.atom(a).in_ring)
            .collect();

        let piece = if ring_atoms.is_empty() {
            best_acyclic_root(&mol, &component, &mut ledger, &options)?
        } else {
            let mut visited: HashSet<AtomId> = HashSet::new();
            cyclic::write_ring_system(&mol, &ring_atoms, &mut visited, &mut ledger, &options)?
        };
        pieces.push(piece);
    }

    let mut out = pieces.join(" &");
    out.push_str(&ledger.render());
    Ok(out)
}

/// Tries every atom in `component` as the DFS root and keeps the
/// lexicographically-greatest result, breaking ties by shorter length
/// (§4.5).
fn best_acyclic_root(
    mol: &Molecule,
    component: &[AtomId],
    ledger: &mut ChargeLedger,
    options: &WriteOptions,
) -> Result<String, WriteError> {
    let mut best: Option<(String, AtomId)> = None;
    // Each candidate needs its own ledger scratch space so a losing root
    // doesn't pollute the real one with charge records.
    for &root in component {
        let mut scratch = ChargeLedger::new();
        let candidate = acyclic::write_from(mol, root, &mut scratch, options)?;
        let better = match &best {
            None => true,
            Some((current, _)) => {
                candidate > *current || (candidate == *current && candidate.len() < current.len())
            }
        };
        if better {
            best = Some((candidate, root));
        }
    }

    let (winner, root) = best.ok_or(WriteError::NoRingStart(
        component.first().map(|a| a.index()).unwrap_or(0),
    ))?;
    // Re-run the winning root once more against the real ledger so its
    // deferred charges are actually recorded.
    let _ = acyclic::write_from(mol, root, ledger, options)?;
    Ok(winner)
}
