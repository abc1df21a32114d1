pub mod key_reader;
pub mod key_writer;

pub use key_reader::*;
pub use key_writer::*;

use num_bigint::BigUint;
use thiserror::Error;

/// Key material extracted from a hex key dump.
///
/// The encryption path only consumes `n` and `e`; `d` is part of the
/// parsed triple and kept for a future decryption path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKey {
    pub n: BigUint,
    pub e: BigUint,
    pub d: BigUint,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("malformed key dump at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },
    #[error("missing required field `{0}'")]
    MissingField(&'static str),
}
