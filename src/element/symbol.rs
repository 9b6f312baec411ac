//! The periodic-table symbol half of the symbol table (component B,
//! §4.1): two-letter (occasionally one-letter) codes used inside `-XX-`
//! dash blocks for elements outside the 20-entry single-letter table.
//!
//! Resolved through `mendeleev::Element` (the same periodic-table crate
//! the teacher pulls in for its own bracket-atom validation) rather than
//! a hand-rolled symbol/atomic-number table: a dash-block symbol is just
//! the periodic table's own spelling, so there's no WLN-specific
//! knowledge to encode here (unlike the single-letter valences in
//! `letter.rs`, which genuinely are WLN's own conventions).

use mendeleev::Element;

/// Resolves a dash-block symbol such as `"PD"` or `"NA"` to its atomic
/// number. Matching is case-insensitive since the reader uppercases
/// dash-block text before lookup, but `mendeleev::Element` parses its
/// canonical title-case spelling (`Na`, `Cl`), so the symbol is
/// normalized first.
pub fn two_letter_to_atom(symbol: &str) -> Option<u8> {
    title_case(symbol).parse::<Element>().ok().map(|e| e.atomic_number())
}

/// Inverse lookup used by the writer: the canonical dash-block spelling
/// for an atomic number, or `None` past whatever `mendeleev` knows about.
pub fn symbol_for(atomic_number: u8) -> Option<&'static str> {
    Element::from_atomic_number(atomic_number).map(|e| e.symbol())
}

/// `Na`/`Cl`-style title case from an all-upper (or any-case) WLN
/// dash-block symbol.
fn title_case(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn looks_up_common_symbols() {
        assert_eq!(two_letter_to_atom("PD"), Some(46));
        assert_eq!(two_letter_to_atom("pd"), Some(46));
        assert_eq!(two_letter_to_atom("NA"), Some(11));
        assert_eq!(two_letter_to_atom("U"), Some(92));
    }

    #[test]
    fn rejects_unknown_symbols() {
        assert_eq!(two_letter_to_atom("XX"), None);
        assert_eq!(two_letter_to_atom(""), None);
    }

    #[test]
    fn symbol_for_is_the_inverse_of_two_letter_to_atom() {
        for n in 1..=103u8 {
            let Some(sym) = symbol_for(n) else { continue };
            assert_eq!(two_letter_to_atom(sym), Some(n));
        }
    }
}
