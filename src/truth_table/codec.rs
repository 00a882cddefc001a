//! Conversion between truth-table bits and ±1 output vectors.
//!
//! Rows are in binary counting order with the first variable in the most
//! significant position. Bits map to spins with `0 → +1` and `1 → -1`, for
//! outputs and inputs alike.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{AnalysisError, AnalysisResult};

/// Largest arity the crate will materialise (`2^30` rows).
pub const MAX_VARIABLES: usize = 30;

/// Validate an arity and return the table length `2^n`.
pub fn table_len(num_variables: usize) -> AnalysisResult<usize> {
    if num_variables == 0 {
        return Err(AnalysisError::invalid_input(
            "number of variables must be positive",
        ));
    }
    if num_variables > MAX_VARIABLES {
        return Err(AnalysisError::too_many_variables(
            num_variables,
            MAX_VARIABLES,
        ));
    }
    Ok(1usize << num_variables)
}

/// Arity implied by a bitcode length, `log2(len)`.
pub fn infer_num_variables(len: usize) -> AnalysisResult<usize> {
    if len < 2 || !len.is_power_of_two() {
        return Err(AnalysisError::function_size(
            len.max(2).next_power_of_two(),
            len,
            "bitcode length must be a power of two >= 2",
        ));
    }
    let num_variables = len.trailing_zeros() as usize;
    table_len(num_variables)?;
    Ok(num_variables)
}

#[inline]
pub fn bit_to_spin(bit: u8) -> AnalysisResult<i8> {
    match bit {
        0 => Ok(1),
        1 => Ok(-1),
        other => Err(AnalysisError::invalid_input(format!(
            "truth-table symbol {other} is not 0 or 1"
        ))),
    }
}

#[inline]
pub fn spin_to_bit(spin: i8) -> AnalysisResult<u8> {
    match spin {
        1 => Ok(0),
        -1 => Ok(1),
        other => Err(AnalysisError::invalid_input(format!(
            "output value {other} is not +1 or -1"
        ))),
    }
}

/// Decode an explicit sequence of `2^n` bits.
pub fn decode_bits(bits: &[u8], num_variables: usize) -> AnalysisResult<Vec<i8>> {
    let expected = table_len(num_variables)?;
    if bits.len() != expected {
        return Err(AnalysisError::function_size(
            expected,
            bits.len(),
            "decode_bits",
        ));
    }
    bits.iter().map(|&bit| bit_to_spin(bit)).collect()
}

/// Decode an integer rendered as a zero-padded `2^n`-bit number, most
/// significant bit first (row 0 is the top bit).
pub fn decode_integer(code: &BigUint, num_variables: usize) -> AnalysisResult<Vec<i8>> {
    let width = table_len(num_variables)?;
    let needed = code.bits() as usize;
    if needed > width {
        return Err(AnalysisError::function_size(width, needed, "decode_integer"));
    }
    Ok((0..width)
        .map(|row| {
            if code.bit((width - 1 - row) as u64) {
                -1
            } else {
                1
            }
        })
        .collect())
}

/// Decode a textual bitcode such as `"0110"` or `"[0, 1, 1, 0]"`.
///
/// Whitespace, commas and surrounding brackets are ignored.
pub fn decode_str(text: &str, num_variables: usize) -> AnalysisResult<Vec<i8>> {
    let bits = parse_bitcode(text)?;
    decode_bits(&bits, num_variables)
}

/// Parse a textual bitcode into raw bits without checking its length.
pub fn parse_bitcode(text: &str) -> AnalysisResult<Vec<u8>> {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '[' | ']'))
        .enumerate()
        .map(|(pos, c)| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(AnalysisError::invalid_input(format!(
                "symbol '{other}' at position {pos} is not 0 or 1"
            ))),
        })
        .collect()
}

/// Map a ±1 output vector back to truth-table bits.
pub fn encode(outputs: &[i8]) -> AnalysisResult<Vec<u8>> {
    outputs.iter().map(|&spin| spin_to_bit(spin)).collect()
}

/// Pack truth-table bits into an integer, row 0 as the most significant bit.
pub fn encode_integer(bits: &[u8]) -> BigUint {
    let width = bits.len();
    let mut code = BigUint::zero();
    for (row, &bit) in bits.iter().enumerate() {
        if bit == 1 {
            code.set_bit((width - 1 - row) as u64, true);
        }
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_map_zero_to_plus_one() {
        let outputs = decode_bits(&[0, 1, 1, 0], 2).unwrap();
        assert_eq!(outputs, vec![1, -1, -1, 1]);
    }

    #[test]
    fn wrong_length_is_a_size_error() {
        let err = decode_bits(&[0, 1, 1], 2).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::FunctionSize {
                expected: 4,
                got: 3,
                ..
            }
        ));
    }

    #[test]
    fn zero_variables_is_invalid() {
        let err = decode_bits(&[0], 0).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { .. }));
    }

    #[test]
    fn arity_above_the_limit_is_rejected() {
        assert_eq!(table_len(MAX_VARIABLES).unwrap(), 1 << MAX_VARIABLES);
        let err = table_len(MAX_VARIABLES + 1).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::too_many_variables(MAX_VARIABLES + 1, MAX_VARIABLES)
        );
        assert!(err.is_size_error());
    }

    #[test]
    fn bad_symbol_is_invalid() {
        let err = decode_bits(&[0, 2, 1, 0], 2).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { .. }));
    }

    #[test]
    fn integer_is_padded_msb_first() {
        // 0b0110 over 4 rows
        let outputs = decode_integer(&BigUint::from(6u32), 2).unwrap();
        assert_eq!(outputs, vec![1, -1, -1, 1]);

        // AND: only the last row is 1
        let outputs = decode_integer(&BigUint::from(1u32), 2).unwrap();
        assert_eq!(outputs, vec![1, 1, 1, -1]);
    }

    #[test]
    fn integer_wider_than_table_is_rejected() {
        let err = decode_integer(&BigUint::from(16u32), 2).unwrap_err();
        assert!(err.is_size_error());
    }

    #[test]
    fn textual_bitcode_ignores_separators() {
        assert_eq!(parse_bitcode("[0, 1, 1, 0]").unwrap(), vec![0, 1, 1, 0]);
        assert_eq!(decode_str("0001", 2).unwrap(), vec![1, 1, 1, -1]);
        assert!(parse_bitcode("01x0").is_err());
    }

    #[test]
    fn infer_requires_power_of_two() {
        assert_eq!(infer_num_variables(8).unwrap(), 3);
        assert!(infer_num_variables(6).unwrap_err().is_size_error());
        assert!(infer_num_variables(1).unwrap_err().is_size_error());
        assert!(infer_num_variables(0).unwrap_err().is_size_error());
    }

    #[test]
    fn encode_inverts_decode() {
        let bits = vec![1, 0, 0, 1, 1, 1, 0, 0];
        let outputs = decode_bits(&bits, 3).unwrap();
        assert_eq!(encode(&outputs).unwrap(), bits);
        assert_eq!(
            decode_integer(&encode_integer(&bits), 3).unwrap(),
            outputs
        );
    }
}
