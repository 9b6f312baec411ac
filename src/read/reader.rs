use super::error::ReadError;
use super::options::ReadOptions;
use super::scanner::Scanner;
use crate::aromaticity;
use crate::element::{self, letter_to_atom, two_letter_to_atom};
use crate::graph::{AtomId, Molecule};
use crate::locant::Locant;
use crate::ringbuild::{self, RingBuildInput, SubringDescriptor};
use std::collections::HashMap;

/// Per-parse reader state (§4.3, §5: no cross-invocation globals — every
/// field here is thrown away once [`read`] returns).
struct Reader {
    scanner: Scanner,
    mol: Molecule,
    /// Open branch points, most recent last; the reader always attaches
    /// the next atom to `stack.last()`, mirroring the string's implied
    /// pre-order walk.
    stack: Vec<AtomId>,
    /// The valence each open (or recently closed) atom is allowed, so
    /// remaining capacity can be recomputed from the live graph instead
    /// of hand-tracked counters that would drift once double bonds or
    /// dioxo modifiers consume more than one valence unit per bond.
    valence: HashMap<AtomId, u8>,
    creation_order: Vec<AtomId>,
    bond_ticks: u8,
    pending_dioxo: bool,
    options: ReadOptions,
}

/// Reads a WLN string into a fully-specified [`Molecule`] (component D).
///
/// Runs the byte-driven state machine, then the post-read resolution
/// pass (§4.3): expanding carbon chains (done inline as they're
/// scanned), filling ring-atom hydrogens, upgrading hanging single bonds
/// on O/N/P/S, and invoking the aromaticity resolver.
pub fn read(input: &str, options: ReadOptions) -> Result<Molecule, ReadError> {
    let mut reader = Reader {
        scanner: Scanner::new(input),
        mol: Molecule::new(),
        stack: Vec::new(),
        valence: HashMap::new(),
        creation_order: Vec::new(),
        bond_ticks: 0,
        pending_dioxo: false,
        options,
    };
    reader.run()?;
    Ok(reader.mol)
}

impl Reader {
    fn trace(&self, msg: &str) {
        if self.options.debug {
            log::debug!("{msg}");
        }
    }

    fn current(&self) -> Option<AtomId> {
        self.stack.last().copied()
    }

    fn new_atom(&mut self, atomic_number: u8) -> Result<AtomId, ReadError> {
        let id = self.mol.add_atom(atomic_number)?;
        self.creation_order.push(id);
        Ok(id)
    }

    /// Remaining valence capacity for `atom`, recomputed from its
    /// current bonds and hydrogens rather than a stored counter.
    fn capacity(&self, atom: AtomId) -> i32 {
        let budget = *self.valence.get(&atom).unwrap_or(&4) as i32;
        budget - self.mol.bond_order_sum(atom) as i32 - self.mol.atom(atom).hydrogens as i32
    }

    /// Bonds `atom` to whatever is currently open, at the pending
    /// unsaturation order, then pops the attachment point if it has no
    /// capacity left.
    fn attach(&mut self, atom: AtomId) -> Result<(), ReadError> {
        if let Some(top) = self.current() {
            let order = 1 + self.bond_ticks.min(2);
            self.mol.add_bond(top, atom, order)?;
            if self.capacity(top) <= 0 {
                self.stack.pop();
            }
        }
        self.bond_ticks = 0;
        Ok(())
    }

    /// Records `atom`'s valence budget and pushes it as the new cursor
    /// if it still has room for more substituents.
    fn open(&mut self, atom: AtomId, budget: u8) {
        self.valence.insert(atom, budget);
        if self.capacity(atom) > 0 {
            self.stack.push(atom);
        }
    }

    fn run(&mut self) -> Result<(), ReadError> {
        let mut digits = String::new();

        loop {
            if self.scanner.is_done() {
                break;
            }

            // Charge suffix / ionic separator: both begin with a space.
            if self.scanner.peek() == Some(' ') {
                if self.try_consume_charge_suffix()? {
                    break;
                }
                if self.try_consume_ionic_separator()? {
                    continue;
                }
                self.scanner.pop();
                continue;
            }

            let offset = self.scanner.cursor();
            let c = self.scanner.pop().expect("checked is_done above");

            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if !digits.is_empty() {
                self.flush_chain(&digits, offset)?;
                digits.clear();
            }

            match c {
                'L' | 'T' => self.read_ring_block(c == 'T', offset)?,
                'U' => self.bond_ticks = self.bond_ticks.saturating_add(1),
                '&' => self.pop_branch(),
                '-' => self.read_dash_element(offset)?,
                'R' => self.read_benzo_ring()?,
                'V' => self.read_carbonyl()?,
                'W' => self.read_dioxo()?,
                'H' => self.read_explicit_hydrogen(offset)?,
                'A'..='Z' => self.read_letter_atom(c, offset)?,
                _ => return Err(ReadError::Character(offset)),
            }
        }

        if !digits.is_empty() {
            let offset = self.scanner.cursor();
            self.flush_chain(&digits, offset)?;
        }

        self.resolve_hanging_bonds();
        self.fill_open_branch_hydrogens();
        aromaticity::resolve(&mut self.mol);
        self.finalize_ring_hydrogens();

        Ok(())
    }

    fn read_letter_atom(&mut self, c: char, offset: usize) -> Result<(), ReadError> {
        let code = letter_to_atom(c).map_err(|_| ReadError::Character(offset))?;
        if code.special.is_some() {
            // R/V/W are dispatched before reaching here; any other
            // special letter would be a table inconsistency.
            return Err(ReadError::Character(offset));
        }

        let atom = self.new_atom(code.atomic_number)?;
        self.mol.atom_mut(atom).charge = code.charge;
        self.mol.atom_mut(atom).hydrogens = code.implicit_hydrogens;
        self.attach(atom)?;

        if self.pending_dioxo {
            self.pending_dioxo = false;
            self.apply_dioxo(atom)?;
        }

        self.open(atom, code.default_valence);
        Ok(())
    }

    fn read_dash_element(&mut self, open_offset: usize) -> Result<(), ReadError> {
        let mut symbol = String::new();
        loop {
            match self.scanner.pop() {
                Some('-') => break,
                Some(c) => symbol.push(c),
                None => return Err(ReadError::UnclosedDashBlock(open_offset)),
            }
        }
        let atomic_number = two_letter_to_atom(&symbol)
            .ok_or_else(|| ReadError::UnknownElement(symbol.clone(), open_offset))?;
        let default_valence = element::permitted_valence(atomic_number).unwrap_or(4);

        let atom = self.new_atom(atomic_number)?;
        self.attach(atom)?;
        self.open(atom, default_valence);
        Ok(())
    }

    fn read_benzo_ring(&mut self) -> Result<(), ReadError> {
        self.materialize_ring(ringbuild::benzene_input())
    }

    fn read_carbonyl(&mut self) -> Result<(), ReadError> {
        let carbon = self.new_atom(6)?;
        self.attach(carbon)?;
        let oxygen = self.new_atom(8)?;
        self.mol.add_bond(carbon, oxygen, 2)?;
        self.open(carbon, 4);
        Ok(())
    }

    fn read_dioxo(&mut self) -> Result<(), ReadError> {
        if let Some(target) = self.current() {
            self.apply_dioxo(target)
        } else {
            self.pending_dioxo = true;
            Ok(())
        }
    }

    fn apply_dioxo(&mut self, target: AtomId) -> Result<(), ReadError> {
        for _ in 0..2 {
            let oxygen = self.new_atom(8)?;
            self.mol.add_bond(target, oxygen, 2)?;
        }
        if self.capacity(target) <= 0 {
            self.stack.retain(|&a| a != target);
        }
        Ok(())
    }

    fn read_explicit_hydrogen(&mut self, offset: usize) -> Result<(), ReadError> {
        let atom = self.current().ok_or(ReadError::Character(offset))?;
        self.mol.atom_mut(atom).hydrogens += 1;
        if self.capacity(atom) <= 0 {
            self.stack.pop();
        }
        Ok(())
    }

    fn pop_branch(&mut self) {
        self.stack.pop();
    }

    /// Expands a run of decimal digits into an unbranched methylene
    /// chain (§4.1): interior atoms get their two chain bonds and the
    /// rest of their valence filled with hydrogens; only the final atom
    /// stays open as the new branch point.
    fn flush_chain(&mut self, digits: &str, offset: usize) -> Result<(), ReadError> {
        let n = element::parse_chain_length(digits).map_err(|_| ReadError::Overflow(offset))?;

        let mut atoms = Vec::with_capacity(n as usize);
        for i in 0..n {
            let atom = self.new_atom(6)?;
            if i == 0 {
                self.attach(atom)?;
            } else {
                self.mol.add_bond(atoms[(i - 1) as usize], atom, 1)?;
            }
            atoms.push(atom);
        }

        for (i, &atom) in atoms.iter().enumerate() {
            self.valence.insert(atom, 4);
            let is_last = i as u32 == n - 1;
            if is_last {
                if self.capacity(atom) > 0 {
                    self.stack.push(atom);
                }
            } else {
                let fill = self.capacity(atom).max(0) as u8;
                self.mol.atom_mut(atom).hydrogens += fill;
            }
        }
        Ok(())
    }

    fn try_consume_charge_suffix(&mut self) -> Result<bool, ReadError> {
        let rest = self.scanner.rest();
        let Some(body) = rest.strip_prefix(" &") else {
            return Ok(false);
        };
        let Some((pos, neg)) = body.split_once('/') else {
            return Ok(false);
        };
        if pos.is_empty()
            || neg.is_empty()
            || !pos.bytes().all(|b| b.is_ascii_digit())
            || !neg.bytes().all(|b| b.is_ascii_digit())
        {
            return Ok(false);
        }
        let n: usize = pos
            .parse()
            .map_err(|_| ReadError::Overflow(self.scanner.cursor()))?;
        let m: usize = neg
            .parse()
            .map_err(|_| ReadError::Overflow(self.scanner.cursor()))?;
        if n == 0 || m == 0 || n > self.creation_order.len() || m > self.creation_order.len() {
            return Err(ReadError::Character(self.scanner.cursor()));
        }
        let pos_atom = self.creation_order[n - 1];
        let neg_atom = self.creation_order[m - 1];
        self.mol.atom_mut(pos_atom).charge += 1;
        self.mol.atom_mut(neg_atom).charge -= 1;

        while !self.scanner.is_done() {
            self.scanner.pop();
        }
        Ok(true)
    }

    fn try_consume_ionic_separator(&mut self) -> Result<bool, ReadError> {
        if self.scanner.peek() == Some(' ') && self.scanner.peek_at(1) == Some('&') {
            self.scanner.pop();
            self.scanner.pop();
            self.stack.clear();
            return Ok(true);
        }
        Ok(false)
    }

    fn read_ring_block(
        &mut self,
        heterocyclic: bool,
        open_offset: usize,
    ) -> Result<(), ReadError> {
        self.trace(&format!("ring block open heterocyclic={heterocyclic}"));
        let mut subrings: Vec<SubringDescriptor> = Vec::new();
        let mut digits = String::new();
        // A `T`-opened ring is saturated by default (§8 scenario 4); an
        // inline `T`/`&` only needs to flip a subsequent `L`-opened
        // subring in a fused system.
        let mut pending_non_aromatic = heterocyclic;
        let mut heteroatom_subs: Vec<(u16, u8)> = Vec::new();
        let mut pseudo_locants = Vec::new();
        let mut locant_cursor: u16 = 1;

        loop {
            let offset = self.scanner.cursor();
            let Some(c) = self.scanner.pop() else {
                return Err(ReadError::UnclosedRing(open_offset));
            };

            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if !digits.is_empty() {
                let length = element::parse_chain_length(&digits)
                    .map_err(|_| ReadError::Overflow(offset))?;
                subrings.push(SubringDescriptor::new(
                    Locant::main(1),
                    length.min(u8::MAX as u32) as u8,
                    !pending_non_aromatic,
                ));
                pending_non_aromatic = false;
                digits.clear();
            }

            match c {
                'J' => break,
                'T' | '&' => {
                    if let Some(last) = subrings.last_mut() {
                        last.aromatic = false;
                    } else {
                        pending_non_aromatic = true;
                    }
                }
                '-' => {
                    let mut symbol = String::new();
                    loop {
                        match self.scanner.pop() {
                            Some('-') => break,
                            Some(c) => symbol.push(c),
                            None => return Err(ReadError::UnclosedDashBlock(offset)),
                        }
                    }
                    let atomic_number = two_letter_to_atom(&symbol)
                        .ok_or_else(|| ReadError::UnknownElement(symbol.clone(), offset))?;
                    heteroatom_subs.push((locant_cursor, atomic_number));
                    locant_cursor += 1;
                }
                '/' => {
                    let a = self.scanner.pop().ok_or(ReadError::EndOfLine)?;
                    let b = self.scanner.pop().ok_or(ReadError::EndOfLine)?;
                    let la = Locant::decode(&a.to_string())
                        .map_err(|_| ReadError::InvalidLocant(a.to_string(), offset))?;
                    let lb = Locant::decode(&b.to_string())
                        .map_err(|_| ReadError::InvalidLocant(b.to_string(), offset))?;
                    pseudo_locants.push((la, lb));
                }
                ' ' => {}
                other if other.is_ascii_uppercase() => {
                    let code = letter_to_atom(other).map_err(|_| ReadError::Character(offset))?;
                    if code.special.is_some() {
                        return Err(ReadError::Character(offset));
                    }
                    heteroatom_subs.push((locant_cursor, code.atomic_number));
                    locant_cursor += 1;
                }
                _ => return Err(ReadError::Character(offset)),
            }
        }

        if !digits.is_empty() {
            let length = element::parse_chain_length(&digits)
                .map_err(|_| ReadError::Overflow(self.scanner.cursor()))?;
            subrings.push(SubringDescriptor::new(
                Locant::main(1),
                length.min(u8::MAX as u32) as u8,
                !pending_non_aromatic,
            ));
        }

        if subrings.is_empty() {
            return Err(ReadError::UnclosedRing(open_offset));
        }

        let fusions = subrings.len().saturating_sub(1) as u16;
        let total: u16 = subrings.iter().map(|s| s.length as u16).sum();
        let largest = subrings.iter().map(|s| s.length as u16).max().unwrap_or(0);
        let size = total.saturating_sub(2 * fusions).max(largest);

        let input = RingBuildInput {
            subrings,
            size,
            bridges: Vec::new(),
            multicyclic: Vec::new(),
            pseudo_locants,
        };

        self.materialize_ring_with_subs(input, &heteroatom_subs)
    }

    fn materialize_ring(&mut self, input: RingBuildInput) -> Result<(), ReadError> {
        self.materialize_ring_with_subs(input, &[])
    }

    fn materialize_ring_with_subs(
        &mut self,
        input: RingBuildInput,
        heteroatom_subs: &[(u16, u8)],
    ) -> Result<(), ReadError> {
        let skeleton = ringbuild::build(&input)?;

        let mut atoms = Vec::with_capacity(skeleton.size);
        for i in 0..skeleton.size {
            let atomic_number = heteroatom_subs
                .iter()
                .find(|&&(locant, _)| locant as usize == i + 1)
                .map(|&(_, n)| n)
                .unwrap_or(6);
            let atom = self.new_atom(atomic_number)?;
            self.mol.atom_mut(atom).in_ring = true;
            self.mol.atom_mut(atom).aromatic = skeleton.aromatic_atoms[i];
            self.mol.atom_mut(atom).locant = Some(Locant::main(i as u16 + 1));
            atoms.push(atom);
        }

        for bond in &skeleton.bonds {
            self.mol.add_bond(atoms[bond.from], atoms[bond.to], 1)?;
        }

        let first = atoms[0];
        self.attach(first)?;
        let permitted =
            element::permitted_valence(self.mol.atom(first).atomic_number).unwrap_or(4);
        self.open(first, permitted);

        Ok(())
    }

    /// Post-read resolution step 3 (§4.3): a hanging single bond on an
    /// O/N/P/S atom with no other substituents upgrades to a double
    /// bond when valence allows.
    fn resolve_hanging_bonds(&mut self) {
        let candidates: Vec<AtomId> = self
            .mol
            .atoms()
            .filter(|a| matches!(a.atomic_number, 7 | 8 | 15 | 16))
            .map(|a| a.id())
            .collect();

        for atom in candidates {
            if self.mol.atom(atom).in_ring || self.mol.atom(atom).hydrogens > 0 {
                continue;
            }
            if self.mol.degree(atom) != 1 {
                continue;
            }
            let bond_id = self.mol.bonds_of(atom)[0];
            if self.mol.bond(bond_id).order != 1 {
                continue;
            }
            let permitted = element::permitted_valence(self.mol.atom(atom).atomic_number)
                .unwrap_or(self.mol.atom(atom).atomic_number);
            if permitted >= 2 {
                self.mol.bond_mut(bond_id).order = 2;
            }
        }
    }

    /// Post-read resolution step 2 (§4.3), generalized to every open
    /// branch point rather than only `X`/`Y`/`K`: whatever substituent
    /// capacity never got filled implicitly becomes hydrogens,
    /// preserving the valence invariant for every atom left open at end
    /// of string.
    fn fill_open_branch_hydrogens(&mut self) {
        for atom in self.stack.drain(..) {
            let fill = (*self.valence.get(&atom).unwrap_or(&4) as i32
                - self.mol.bond_order_sum(atom) as i32
                - self.mol.atom(atom).hydrogens as i32)
                .max(0) as u8;
            self.mol.atom_mut(atom).hydrogens += fill;
        }
    }

    fn finalize_ring_hydrogens(&mut self) {
        let ring_atoms: Vec<AtomId> = self
            .mol
            .atoms()
            .filter(|a| a.in_ring)
            .map(|a| a.id())
            .collect();
        for atom in ring_atoms {
            let permitted =
                element::permitted_valence(self.mol.atom(atom).atomic_number).unwrap_or(4);
            let used = self.mol.bond_order_sum(atom) as u8;
            self.mol.atom_mut(atom).hydrogens = permitted.saturating_sub(used);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn atomic_numbers(mol: &Molecule) -> Vec<u8> {
        let mut v: Vec<u8> = mol.atoms().map(|a| a.atomic_number).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn qy_is_water_oxygen_bonded_to_a_methyl_carbon() {
        let mol = read("QY", ReadOptions::new()).unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(atomic_numbers(&mol), vec![6, 8]);
        assert_eq!(mol.bond_count(), 1);
        let oxygen = mol.atoms().find(|a| a.atomic_number == 8).unwrap();
        assert_eq!(oxygen.hydrogens, 1);
        let carbon = mol.atoms().find(|a| a.atomic_number == 6).unwrap();
        assert_eq!(carbon.hydrogens, 3);
    }

    #[test]
    fn l6tj_is_cyclohexane() {
        let mol = read("L6TJ", ReadOptions::new()).unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert!(mol.atoms().all(|a| a.atomic_number == 6 && !a.aromatic));
        assert!(mol.atoms().all(|a| a.hydrogens == 2));
        assert_eq!(mol.bond_count(), 6);
    }

    #[test]
    fn l6j_is_benzene() {
        let mol = read("L6J", ReadOptions::new()).unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert!(mol.atoms().all(|a| a.atomic_number == 6 && a.aromatic));
        assert_eq!(mol.bond_count(), 6);
    }

    #[test]
    fn t6oj_is_tetrahydropyran() {
        let mol = read("T6OJ", ReadOptions::new()).unwrap();
        assert_eq!(mol.atom_count(), 6);
        let carbons = mol.atoms().filter(|a| a.atomic_number == 6).count();
        let oxygens = mol.atoms().filter(|a| a.atomic_number == 8).count();
        assert_eq!(carbons, 5);
        assert_eq!(oxygens, 1);
        assert!(!mol.atoms().any(|a| a.aromatic));
    }

    #[test]
    fn vh3_is_an_aldehyde_with_a_propyl_tail() {
        let mol = read("VH3", ReadOptions::new()).unwrap();
        let oxygens = mol.atoms().filter(|a| a.atomic_number == 8).count();
        let carbons = mol.atoms().filter(|a| a.atomic_number == 6).count();
        assert_eq!(oxygens, 1);
        assert_eq!(carbons, 4);
        let has_double_bond_to_oxygen = mol.bonds().any(|b| {
            b.order == 2
                && (mol.atom(b.a).atomic_number == 8 || mol.atom(b.b).atomic_number == 8)
        });
        assert!(has_double_bond_to_oxygen);
    }

    #[test]
    fn naphthalene_skeleton_has_ten_fused_aromatic_carbons() {
        let mol = read("L66J", ReadOptions::new()).unwrap();
        assert_eq!(mol.atom_count(), 10);
        assert!(mol.atoms().all(|a| a.aromatic));
        assert_eq!(mol.bond_count(), 11);
    }

    #[test]
    fn ionic_separator_splits_independent_components() {
        let mol = read("QH &ZH", ReadOptions::new()).unwrap();
        assert_eq!(mol.components().len(), 2);
    }

    #[test]
    fn unclosed_ring_is_reported() {
        assert!(matches!(
            read("L6", ReadOptions::new()),
            Err(ReadError::UnclosedRing(_))
        ));
    }
}
