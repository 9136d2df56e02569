//! 2-bit nucleotide packing.
//!
//! SnapGene packs DNA four bases to a byte, most significant pair first, using
//! the alphabet `G=0, A=1, T=2, C=3`. The symbol count is stored out of band, so
//! the final byte may carry padding bits which are ignored on read and written
//! as zero.

const ALPHABET: [u8; 4] = *b"GATC";

/// Number of bytes needed to pack `symbol_count` symbols.
pub fn packed_len(symbol_count: usize) -> usize {
    (symbol_count * 2).div_ceil(8)
}

/// Unpacks up to `symbol_count` symbols from a 2-bit packed buffer.
///
/// Stops early if `bytes` runs out; callers that need the full count should
/// check `bytes.len() >= packed_len(symbol_count)` first.
///
/// # Examples
///
/// ```rust
/// use sgff::codec::nucleotide::unpack;
///
/// // 0b01_11_00_10 -> A C G T
/// assert_eq!(unpack(&[0b0111_0010], 4), "ACGT");
/// // padding bits past the symbol count are ignored
/// assert_eq!(unpack(&[0b0111_0011], 3), "ACG");
/// ```
pub fn unpack(bytes: &[u8], symbol_count: usize) -> String {
    let mut symbols = String::with_capacity(symbol_count);
    'outer: for byte in bytes {
        for shift in [6u8, 4, 2, 0] {
            if symbols.len() == symbol_count {
                break 'outer;
            }
            symbols.push(ALPHABET[((byte >> shift) & 0b11) as usize] as char);
        }
    }
    symbols
}

/// Packs a nucleotide string into 2-bit fields.
///
/// Symbols outside `GATC` (either case) are packed as `G` (field value 0).
///
/// # Examples
///
/// ```rust
/// use sgff::codec::nucleotide::{pack, unpack};
///
/// let packed = pack("GATTACA");
/// assert_eq!(packed.len(), 2);
/// assert_eq!(unpack(&packed, 7), "GATTACA");
/// ```
pub fn pack(symbols: &str) -> Vec<u8> {
    let mut bytes = vec![0u8; packed_len(symbols.len())];
    for (idx, symbol) in symbols.bytes().enumerate() {
        let shift = 6 - 2 * (idx % 4);
        bytes[idx / 4] |= encode_symbol(symbol) << shift;
    }
    bytes
}

fn encode_symbol(symbol: u8) -> u8 {
    match symbol {
        b'A' | b'a' => 1,
        b'T' | b't' => 2,
        b'C' | b'c' => 3,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_sequence(rng: &mut StdRng, len: usize) -> String {
        (0..len)
            .map(|_| ALPHABET[rng.random_range(0..4)] as char)
            .collect()
    }

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(0), 0);
        assert_eq!(packed_len(1), 1);
        assert_eq!(packed_len(4), 1);
        assert_eq!(packed_len(5), 2);
        assert_eq!(packed_len(8), 2);
        assert_eq!(packed_len(9), 3);
    }

    #[test]
    fn test_alphabet_order() {
        assert_eq!(pack("GATC"), vec![0b0001_1011]);
        assert_eq!(unpack(&[0b0001_1011], 4), "GATC");
    }

    #[test]
    fn test_roundtrip_random_lengths() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in 0..200 {
            let sequence = random_sequence(&mut rng, len);
            let packed = pack(&sequence);
            assert_eq!(packed.len(), packed_len(len));
            assert_eq!(unpack(&packed, len), sequence);
        }
    }

    #[test]
    fn test_padding_bits_ignored() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 1..64 {
            let sequence = random_sequence(&mut rng, len);
            let mut packed = pack(&sequence);
            // set every padding bit in the final byte
            let used = len % 4;
            if used != 0 {
                let last = packed.len() - 1;
                packed[last] |= 0xFF >> (2 * used);
            }
            // extra trailing bytes must not leak into the output either
            packed.push(0xFF);
            assert_eq!(unpack(&packed, len), sequence);
        }
    }

    #[test]
    fn test_padding_written_as_zero() {
        assert_eq!(pack("A"), vec![0b0100_0000]);
        assert_eq!(pack("CCCCC"), vec![0xFF, 0b1100_0000]);
    }

    #[test]
    fn test_unrecognized_symbols() {
        assert_eq!(pack("N-X"), vec![0]);
        assert_eq!(unpack(&pack("acgt"), 4), "ACGT");
    }

    #[test]
    fn test_short_buffer_stops_early() {
        assert_eq!(unpack(&[0b0101_0101], 10), "AAAA");
    }
}
