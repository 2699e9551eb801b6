// Checked binary-coded-decimal conversions.
//
// The `Element` accessors read BCD fields arithmetically and tolerate
// garbage nibbles; these helpers are the strict variant used where a decoder
// wants to detect a corrupt field (a nibble above 9) instead of silently
// producing a wrong number.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BcdError {
    #[error("invalid BCD digit in byte {0:#04x}")]
    InvalidDigit(u8),

    #[error("value {0} does not fit in {1} BCD bytes")]
    ValueTooLarge(u64, usize),
}

pub type Result<T> = std::result::Result<T, BcdError>;

/// Split a BCD byte into its decimal digits, rejecting nibbles above 9.
pub fn unpack_byte(byte: u8) -> Result<(u8, u8)> {
    let tens = byte >> 4;
    let ones = byte & 0x0f;
    if tens > 9 || ones > 9 {
        return Err(BcdError::InvalidDigit(byte));
    }
    Ok((tens, ones))
}

/// Pack two decimal digits into one BCD byte.
pub fn pack_byte(tens: u8, ones: u8) -> Result<u8> {
    if tens > 9 || ones > 9 {
        return Err(BcdError::InvalidDigit((tens << 4) | ones));
    }
    Ok((tens << 4) | ones)
}

/// Decode a BCD byte run, most significant byte first.
pub fn decode_be(bytes: &[u8]) -> Result<u64> {
    let mut value = 0u64;
    for &byte in bytes {
        let (tens, ones) = unpack_byte(byte)?;
        value = value * 100 + (tens * 10 + ones) as u64;
    }
    Ok(value)
}

/// Decode a BCD byte run, least significant byte first.
pub fn decode_le(bytes: &[u8]) -> Result<u64> {
    let mut value = 0u64;
    for &byte in bytes.iter().rev() {
        let (tens, ones) = unpack_byte(byte)?;
        value = value * 100 + (tens * 10 + ones) as u64;
    }
    Ok(value)
}

/// Encode `value` into `num_bytes` BCD bytes, most significant first.
/// Unlike the in-place element setters this rejects values that do not fit.
pub fn encode_be(value: u64, num_bytes: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; num_bytes];
    let mut rest = value;
    for i in (0..num_bytes).rev() {
        let two = (rest % 100) as u8;
        rest /= 100;
        out[i] = ((two / 10) << 4) | (two % 10);
    }
    if rest > 0 {
        return Err(BcdError::ValueTooLarge(value, num_bytes));
    }
    Ok(out)
}

/// Encode `value` into `num_bytes` BCD bytes, least significant first.
pub fn encode_le(value: u64, num_bytes: usize) -> Result<Vec<u8>> {
    let mut out = encode_be(value, num_bytes)?;
    out.reverse();
    Ok(out)
}

/// True when every nibble of the run is a decimal digit.
pub fn is_valid(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| (b >> 4) <= 9 && (b & 0x0f) <= 9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_conversion() {
        assert_eq!(unpack_byte(0x95).unwrap(), (9, 5));
        assert_eq!(unpack_byte(0x00).unwrap(), (0, 0));
        assert!(unpack_byte(0xab).is_err());

        assert_eq!(pack_byte(9, 5).unwrap(), 0x95);
        assert!(pack_byte(12, 0).is_err());
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_be(&[0x43, 0x90, 0x87, 0x00]).unwrap(), 43908700);
        assert_eq!(decode_le(&[0x00, 0x87, 0x90, 0x43]).unwrap(), 43908700);
        assert!(decode_be(&[0x4f]).is_err());
    }

    #[test]
    fn test_encode() {
        assert_eq!(
            encode_be(43908700, 4).unwrap(),
            vec![0x43, 0x90, 0x87, 0x00]
        );
        assert_eq!(
            encode_le(43908700, 4).unwrap(),
            vec![0x00, 0x87, 0x90, 0x43]
        );
        assert!(encode_be(123_456_789, 4).is_err());
    }

    #[test]
    fn test_validity() {
        assert!(is_valid(&[0x14, 0x65, 0x20, 0x00]));
        assert!(!is_valid(&[0xff, 0x00]));
    }
}
