use thiserror::Error;

/// The single-letter symbol table (component B, §4.1): every WLN letter
/// that denotes an atom (rather than a structural operator) maps to a
/// fixed atomic number, default valence, implicit hydrogen count, charge,
/// and substituent capacity.
///
/// WLN reserves `A` and `D` (unused by any published dialect) and treats
/// `L`, `T`, `J`, and `U` as structural operators (ring start/close,
/// unsaturation) rather than atoms, which the reader dispatches on
/// directly instead of going through this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterCode {
    pub atomic_number: u8,
    pub default_valence: u8,
    pub implicit_hydrogens: u8,
    pub charge: i8,
    /// Substituent slots available before deducting the bond back to
    /// whatever introduced this atom (the reader subtracts one when the
    /// letter occurs mid-chain rather than as a ring/branch root).
    pub branching: u8,
    /// Set for letters that carry shorthand structural meaning beyond a
    /// plain atom: `R` (benzo ring), `V` (carbonyl carbon), `W` (dioxo
    /// modifier on the preceding atom). The reader special-cases these;
    /// the table only records that they are not ordinary atoms.
    pub special: Option<LetterSpecial>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterSpecial {
    /// `R`: an implied benzo (phenyl) ring fused or pendant at this point.
    BenzoRing,
    /// `V`: a carbon bonded to the preceding atom with an additional `=O`.
    Carbonyl,
    /// `W`: marks the preceding atom as doubly-oxygenated (dioxo, e.g.
    /// sulfone/nitro-style `=O` pairs) rather than introducing a new atom.
    DioxoModifier,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LetterError {
    #[error("{0:?} is not a WLN atom letter")]
    NotALetter(char),
    #[error("{0:?} is a structural operator, not a symbol-table entry")]
    StructuralOperator(char),
}

const fn plain(atomic_number: u8, default_valence: u8) -> LetterCode {
    LetterCode {
        atomic_number,
        default_valence,
        implicit_hydrogens: 0,
        charge: 0,
        branching: default_valence,
        special: None,
    }
}

const fn with_hydrogens(mut code: LetterCode, hydrogens: u8) -> LetterCode {
    code.implicit_hydrogens = hydrogens;
    code.branching = code.default_valence - hydrogens;
    code
}

const fn charged(mut code: LetterCode, charge: i8) -> LetterCode {
    code.charge = charge;
    code
}

const fn special(mut code: LetterCode, kind: LetterSpecial) -> LetterCode {
    code.special = Some(kind);
    code
}

/// Looks up the atom a single WLN letter denotes, per §4.1's 20-entry
/// table (`B C E F G H I K M N O P Q R S V W X Y Z`; `A` and `D` are
/// reserved, `L T J U` are structural operators handled by the reader).
pub fn letter_to_atom(ch: char) -> Result<LetterCode, LetterError> {
    match ch {
        'B' => Ok(plain(5, 3)),
        'C' => Ok(plain(6, 4)),
        'E' => Ok(plain(35, 1)),
        'F' => Ok(plain(9, 1)),
        'G' => Ok(plain(17, 1)),
        'H' => Ok(plain(1, 1)),
        'I' => Ok(plain(53, 1)),
        'K' => Ok(charged(plain(7, 4), 1)),
        'M' => Ok(with_hydrogens(plain(7, 3), 1)),
        'N' => Ok(plain(7, 3)),
        'O' => Ok(plain(8, 2)),
        'P' => Ok(plain(15, 3)),
        'Q' => Ok(with_hydrogens(plain(8, 2), 1)),
        'R' => Ok(special(plain(6, 4), LetterSpecial::BenzoRing)),
        'S' => Ok(plain(16, 2)),
        'V' => Ok(special(plain(6, 4), LetterSpecial::Carbonyl)),
        'W' => Ok(special(plain(0, 0), LetterSpecial::DioxoModifier)),
        'X' => Ok(plain(6, 4)),
        'Y' => Ok(with_hydrogens(plain(6, 4), 1)),
        'Z' => Ok(with_hydrogens(plain(7, 3), 2)),
        'A' | 'D' => Err(LetterError::NotALetter(ch)),
        'L' | 'T' | 'J' | 'U' => Err(LetterError::StructuralOperator(ch)),
        other => Err(LetterError::NotALetter(other)),
    }
}

/// `true` for the letters the reader treats as structural operators
/// rather than symbol-table lookups.
pub fn is_structural_operator(ch: char) -> bool {
    matches!(ch, 'L' | 'T' | 'J' | 'U')
}

/// The writer's reverse lookup (§4.4: "B used in reverse for element
/// encoding"): given an atom's element, charge, and final hydrogen
/// count, picks the single letter that would read back to it.
///
/// `C` and `X` both decode to plain tetravalent carbon (§4.1); the
/// writer always prefers `X`, reserving bare carbon chain digits for
/// unbranched runs (see [`super::super::write::acyclic`]).
///
/// `hydrogens` is the atom's *total* hydrogen count, not a letter's
/// `implicit_hydrogens` — the reader tops up whatever a letter doesn't
/// account for via its trailing, unfilled branch slots (see
/// `fill_open_branch_hydrogens`), so a terminal `Y` (branching=3) ends up
/// with 3 hydrogens rather than its table entry's 1, same as a terminal
/// `M` (branching=2) ends up with 2. Both forms are listed here.
pub fn atom_to_letter(atomic_number: u8, charge: i8, hydrogens: u8) -> Option<char> {
    match (atomic_number, charge, hydrogens) {
        (5, 0, 0) => Some('B'),
        (35, 0, 0) => Some('E'),
        (9, 0, 0) => Some('F'),
        (17, 0, 0) => Some('G'),
        (53, 0, 0) => Some('I'),
        (7, 1, 0) => Some('K'),
        (7, 0, 1) | (7, 0, 2) => Some('M'),
        (7, 0, 0) => Some('N'),
        (8, 0, 0) => Some('O'),
        (15, 0, 0) => Some('P'),
        (8, 0, 1) => Some('Q'),
        (16, 0, 0) => Some('S'),
        (6, 0, 0) => Some('X'),
        (6, 0, 1) | (6, 0, 2) | (6, 0, 3) => Some('Y'),
        (7, 0, 3) => Some('Z'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_atom_letters_resolve_expected_elements() {
        assert_eq!(letter_to_atom('F').unwrap().atomic_number, 9);
        assert_eq!(letter_to_atom('G').unwrap().atomic_number, 17);
        assert_eq!(letter_to_atom('E').unwrap().atomic_number, 35);
        assert_eq!(letter_to_atom('I').unwrap().atomic_number, 53);
    }

    #[test]
    fn k_is_quaternary_nitrogen_cation() {
        let k = letter_to_atom('K').unwrap();
        assert_eq!(k.atomic_number, 7);
        assert_eq!(k.charge, 1);
        assert_eq!(k.branching, 4);
    }

    #[test]
    fn m_and_z_carry_implicit_hydrogens() {
        let m = letter_to_atom('M').unwrap();
        assert_eq!(m.implicit_hydrogens, 1);
        assert_eq!(m.branching, 2);

        let z = letter_to_atom('Z').unwrap();
        assert_eq!(z.implicit_hydrogens, 2);
        assert_eq!(z.branching, 1);
    }

    #[test]
    fn r_v_w_are_marked_special() {
        assert_eq!(
            letter_to_atom('R').unwrap().special,
            Some(LetterSpecial::BenzoRing)
        );
        assert_eq!(
            letter_to_atom('V').unwrap().special,
            Some(LetterSpecial::Carbonyl)
        );
        assert_eq!(
            letter_to_atom('W').unwrap().special,
            Some(LetterSpecial::DioxoModifier)
        );
    }

    #[test]
    fn atom_to_letter_reverses_the_common_cases() {
        assert_eq!(atom_to_letter(7, 0, 1), Some('M'));
        assert_eq!(atom_to_letter(8, 0, 1), Some('Q'));
        assert_eq!(atom_to_letter(6, 0, 0), Some('X'));
        assert_eq!(atom_to_letter(16, 1, 0), None);
    }

    #[test]
    fn reserved_and_structural_letters_are_rejected() {
        assert_eq!(letter_to_atom('A'), Err(LetterError::NotALetter('A')));
        assert_eq!(letter_to_atom('D'), Err(LetterError::NotALetter('D')));
        assert_eq!(
            letter_to_atom('L'),
            Err(LetterError::StructuralOperator('L'))
        );
        assert!(is_structural_operator('T'));
        assert!(is_structural_operator('J'));
        assert!(is_structural_operator('U'));
        assert!(!is_structural_operator('C'));
    }
}
