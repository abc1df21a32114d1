use std::io::{self, Write};

use num_bigint::BigUint;
use num_traits::Zero;

use crate::rsa::keys::RsaKey;

/// Format `n` as a comma-separated `0xHH` byte list, least significant
/// byte first (ascending array index = ascending significance).
pub fn format_byte_array(n: &BigUint) -> String {
    if n.is_zero() {
        return String::new();
    }
    n.to_bytes_le()
        .iter()
        .map(|b| format!("{:#04x}", b))
        .collect::<Vec<_>>()
        .join(",")
}

/// Emit the key as a C designated-initializer fragment. The consumer
/// additionally requires the most significant modulus byte to be
/// >= 0x80; that is a constraint on key choice, not checked here.
pub fn write_source_literal(writer: &mut dyn Write, key: &RsaKey) -> io::Result<()> {
    writeln!(writer, "// modulus: byte order: LSB to MSB, constraint MSB>=0x80")?;
    writeln!(writer, ".n = {{ {} }},", format_byte_array(&key.n))?;
    writeln!(writer, ".e = {:#x}", key.e)?;
    Ok(())
}
