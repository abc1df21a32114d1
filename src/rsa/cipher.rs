use std::io::{self, Read, Write};

use num_bigint::BigUint;
use thiserror::Error;

use crate::rsa::keys::RsaKey;
use crate::rsa::math::{self, count_bytes, MathError};

/// Marker prepended to every block before reversal; the matching
/// decryption scheme uses it to strip the filler.
const PADDING_MARKER: u8 = 0x01;
const FILLER: u8 = 0xff;
const NEWLINE: u8 = 0x0a;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("modulus too small: {0}-byte blocks leave no room for the padding marker")]
    InvalidKey(usize),
    #[error(transparent)]
    Math(#[from] MathError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Encrypt `reader` into fixed-width ciphertext blocks on `writer`
/// under the key's (n, e). Each block is exactly `count_bytes(n)`
/// bytes; empty input produces empty output.
pub fn encrypt_stream(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    key: &RsaKey,
    silent: bool,
) -> Result<(), CipherError> {
    let block_size = count_bytes(&key.n);
    if block_size < 2 {
        return Err(CipherError::InvalidKey(block_size));
    }
    if !silent {
        println!("n= {:x}", key.n);
        println!("e= {:x}", key.e);
    }
    loop {
        let chunk = read_chunk(reader, block_size - 1)?;
        if chunk.is_empty() {
            break;
        }
        let block = build_block(&chunk, block_size);
        writer.write_all(&encrypt_block(&block, key, block_size)?)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read up to `limit` bytes, stopping early at end of input.
fn read_chunk(reader: &mut dyn Read, limit: usize) -> io::Result<Vec<u8>> {
    let mut byte = [0u8; 1];
    let mut chunk = Vec::new();
    loop {
        match reader.read(&mut byte)? {
            0 => break,
            _ => {
                chunk.push(byte[0]);
                if chunk.len() >= limit {
                    break;
                }
            }
        }
    }
    Ok(chunk)
}

/// Apply the block transform: drop every newline byte, right-pad with
/// the filler to `block_size - 1`, prepend the marker, then reverse
/// the whole block. The reversed bytes are the big-endian form of `m`,
/// marker last.
fn build_block(chunk: &[u8], block_size: usize) -> Vec<u8> {
    let mut block: Vec<u8> = chunk.iter().copied().filter(|b| *b != NEWLINE).collect();
    block.resize(block_size - 1, FILLER);
    block.insert(0, PADDING_MARKER);
    block.reverse();
    block
}

/// `c = m^e mod n`, serialized as exactly `block_size` little-endian
/// bytes (high-order bytes implicitly zero).
fn encrypt_block(block: &[u8], key: &RsaKey, block_size: usize) -> Result<Vec<u8>, CipherError> {
    let m = BigUint::from_bytes_be(block);
    let c = math::mod_exp(&m, &key.e, &key.n)?;
    let mut out = c.to_bytes_le();
    out.resize(block_size, 0);
    Ok(out)
}
