/// Default (neutral, uncharged) valence for elements that appear in
/// `-XX-` dash blocks without an explicit single-letter shortcut. Used
/// by the reader to size remaining-substituent counts and by the
/// aromaticity resolver to tell which ring atoms can flex between 2 and
/// 3 connections (§4.6).
///
/// Grounded on the same roster as [`super::symbol`]; only the elements
/// WLN dash blocks actually exercise carry an entry here, not the full
/// periodic table.
pub fn permitted_valence(atomic_number: u8) -> Option<u8> {
    let v = match atomic_number {
        1 => 1,                                  // H
        5 => 3,                                   // B
        6 => 4,                                   // C
        7 => 3,                                   // N
        8 => 2,                                   // O
        9 | 17 | 35 | 53 | 85 => 1,               // F, Cl, Br, I, At
        14 => 4,                                  // Si
        15 => 3,                                  // P
        16 => 2,                                  // S
        33 => 3,                                  // As
        34 => 2,                                  // Se
        50 => 4,                                  // Sn
        51 => 3,                                  // Sb
        52 => 2,                                  // Te
        82 => 2,                                  // Pb
        83 => 3,                                  // Bi
        13 | 31 | 49 | 81 => 3,                   // Al, Ga, In, Tl
        _ => return None,
    };
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn common_organic_elements_have_their_usual_valence() {
        assert_eq!(permitted_valence(6), Some(4));
        assert_eq!(permitted_valence(7), Some(3));
        assert_eq!(permitted_valence(8), Some(2));
        assert_eq!(permitted_valence(16), Some(2));
    }

    #[test]
    fn unlisted_elements_return_none() {
        assert_eq!(permitted_valence(26), None); // Fe: variable, no default
    }
}
