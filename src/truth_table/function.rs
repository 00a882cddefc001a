use num_bigint::BigUint;
use serde::Serialize;

use super::codec::{self, table_len};
use crate::error::{AnalysisError, AnalysisResult};

/// A Boolean function on `n` variables held as its truth table.
///
/// `truth_table[r]` is the output bit for row `r`; `outputs[r]` is the same
/// value as a spin (`0 → +1`, `1 → -1`). Row `r` is the input point whose
/// variable `i` is bit `n-1-i` of `r`, read with the same `0 → +1` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BooleanFunction {
    num_variables: usize,
    truth_table: Vec<u8>,
    outputs: Vec<i8>,
}

impl BooleanFunction {
    /// Build from an explicit sequence of `2^n` bits.
    ///
    /// ```
    /// use boolean_spectral_core::BooleanFunction;
    ///
    /// let xor = BooleanFunction::from_bits(&[0, 1, 1, 0], 2).unwrap();
    /// assert_eq!(xor.outputs(), &[1, -1, -1, 1]);
    /// ```
    pub fn from_bits(bits: &[u8], num_variables: usize) -> AnalysisResult<Self> {
        let outputs = codec::decode_bits(bits, num_variables)?;
        Ok(Self {
            num_variables,
            truth_table: bits.to_vec(),
            outputs,
        })
    }

    /// Build from a bitcode alone, inferring `n = log2(len)`.
    pub fn from_bitcode(bits: &[u8]) -> AnalysisResult<Self> {
        let num_variables = codec::infer_num_variables(bits.len())?;
        Self::from_bits(bits, num_variables)
    }

    /// Build from an integer code, zero-padded to `2^n` bits, MSB first.
    pub fn from_integer(code: &BigUint, num_variables: usize) -> AnalysisResult<Self> {
        let outputs = codec::decode_integer(code, num_variables)?;
        Self::from_outputs(outputs, num_variables)
    }

    /// Build from a textual bitcode such as `"[0, 1, 1, 0]"`.
    pub fn parse(text: &str, num_variables: usize) -> AnalysisResult<Self> {
        let bits = codec::parse_bitcode(text)?;
        Self::from_bits(&bits, num_variables)
    }

    /// Build from a ±1 output vector.
    pub fn from_outputs(outputs: Vec<i8>, num_variables: usize) -> AnalysisResult<Self> {
        let expected = table_len(num_variables)?;
        if outputs.len() != expected {
            return Err(AnalysisError::function_size(
                expected,
                outputs.len(),
                "from_outputs",
            ));
        }
        let truth_table = codec::encode(&outputs)?;
        Ok(Self {
            num_variables,
            truth_table,
            outputs,
        })
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn outputs(&self) -> &[i8] {
        &self.outputs
    }

    pub fn truth_table(&self) -> &[u8] {
        &self.truth_table
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn output_at(&self, row: usize) -> Option<i8> {
        self.outputs.get(row).copied()
    }

    /// The ±1 input point enumerated at `row`.
    pub fn grid_point(&self, row: usize) -> Vec<i8> {
        grid_point(row, self.num_variables)
    }

    /// Output at a ±1 input point.
    pub fn value_at(&self, point: &[i8]) -> AnalysisResult<i8> {
        let row = row_of_point(point, self.num_variables)?;
        Ok(self.outputs[row])
    }

    /// Truth table packed as an integer, row 0 most significant.
    pub fn to_integer(&self) -> BigUint {
        codec::encode_integer(&self.truth_table)
    }

    /// Equal number of `+1` and `-1` outputs.
    pub fn is_balanced(&self) -> bool {
        self.outputs.iter().map(|&v| v as i64).sum::<i64>() == 0
    }
}

/// The ±1 input point at `row` for an `n`-variable table.
pub fn grid_point(row: usize, num_variables: usize) -> Vec<i8> {
    (0..num_variables)
        .map(|var| {
            if (row >> (num_variables - 1 - var)) & 1 == 0 {
                1
            } else {
                -1
            }
        })
        .collect()
}

/// Inverse of [`grid_point`].
pub fn row_of_point(point: &[i8], num_variables: usize) -> AnalysisResult<usize> {
    if point.len() != num_variables {
        return Err(AnalysisError::invalid_input(format!(
            "point has {} coordinates, function has {num_variables} variables",
            point.len()
        )));
    }
    point.iter().try_fold(0usize, |row, &x| {
        let bit = codec::spin_to_bit(x)?;
        Ok((row << 1) | bit as usize)
    })
}
