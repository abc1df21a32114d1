use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MathError {
    #[error("modulus is zero in modular exponentiation")]
    DivisionByZero,
}

/// Minimal big-endian byte length of `n`, no leading zero byte counted.
pub fn count_bytes(n: &BigUint) -> usize {
    ((n.bits() + 7) / 8) as usize
}

/// Right-to-left square-and-multiply: `base ^ exponent mod modulus`.
///
/// Not constant-time; exponent bits leak through the multiply pattern.
pub fn mod_exp(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> Result<BigUint, MathError> {
    if modulus.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let mut result = BigUint::one();
    let mut b = base % modulus;
    let mut e = exponent.clone();
    while !e.is_zero() {
        if e.bit(0) {
            result = (&result * &b) % modulus;
        }
        b = (&b * &b) % modulus;
        e >>= 1;
    }
    Ok(result)
}
