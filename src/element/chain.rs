use thiserror::Error;

/// Platform-bounded ceiling on a single carbon-chain run, matching the
/// crate-wide atom capacity: no legitimate WLN string asks for a chain
/// anywhere near this long.
const MAX_CHAIN_LENGTH: u32 = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("carbon chain digits {0:?} are not a valid decimal run")]
    NotDecimal(String),
    #[error("carbon chain length {0} exceeds the {1}-atom limit")]
    TooLong(u32, u32),
    #[error("carbon chain length must be at least 1")]
    Zero,
}

/// Parses a run of decimal digits (`digits_buffer`, §4.3) accumulated
/// while scanning a methylene chain into the chain's carbon count.
///
/// A run of length *n* expands to *n* sp3 carbons joined by *n-1* single
/// bonds (§4.1). Bare `0` is never a valid chain length on its own; the
/// reader only ever calls this once a non-digit closes the run, and the
/// zero rule (dropping the preceding atom inside a pending locant) is
/// handled before the digits reach here.
pub fn parse_chain_length(digits: &str) -> Result<u32, ChainError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChainError::NotDecimal(digits.to_string()));
    }
    let n: u32 = digits
        .parse()
        .map_err(|_| ChainError::TooLong(u32::MAX, MAX_CHAIN_LENGTH))?;
    if n == 0 {
        return Err(ChainError::Zero);
    }
    if n > MAX_CHAIN_LENGTH {
        return Err(ChainError::TooLong(n, MAX_CHAIN_LENGTH));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_single_and_multi_digit_runs() {
        assert_eq!(parse_chain_length("1"), Ok(1));
        assert_eq!(parse_chain_length("12"), Ok(12));
        assert_eq!(parse_chain_length("100"), Ok(100));
    }

    #[test]
    fn rejects_zero_and_non_decimal_input() {
        assert_eq!(parse_chain_length("0"), Err(ChainError::Zero));
        assert!(matches!(
            parse_chain_length("1a"),
            Err(ChainError::NotDecimal(_))
        ));
        assert!(matches!(
            parse_chain_length(""),
            Err(ChainError::NotDecimal(_))
        ));
    }

    #[test]
    fn rejects_chains_past_the_atom_ceiling() {
        assert!(matches!(
            parse_chain_length("9999"),
            Err(ChainError::TooLong(9999, MAX_CHAIN_LENGTH))
        ));
    }
}
