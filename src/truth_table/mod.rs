//! Truth-table decoding for Boolean functions.
//!
//! Turns integer codes, bit sequences and bit strings into the ±1 output
//! vectors consumed by the Fourier expansion.

pub mod codec;
pub mod function;

pub use codec::{
    decode_bits, decode_integer, decode_str, encode, encode_integer, infer_num_variables,
    parse_bitcode, MAX_VARIABLES,
};
pub use function::{grid_point, row_of_point, BooleanFunction};
