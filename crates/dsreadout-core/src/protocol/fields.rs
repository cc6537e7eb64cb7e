//! Fixed-width response fields
//!
//! Transducer responses are plain ASCII with every value at a fixed
//! character offset. These helpers cut a field out of a response line and
//! decode it as decimal or hexadecimal.

use super::ProtocolError;

/// Cut `width` bytes starting at `offset` out of `line`.
///
/// A `width` of zero takes everything up to the end of the line.
pub fn field(line: &[u8], offset: usize, width: usize) -> Result<&[u8], ProtocolError> {
    let end = if width == 0 { line.len() } else { offset + width };
    line.get(offset..end).ok_or_else(|| {
        ProtocolError::ReadError(format!(
            "field at {}..{} beyond end of {}-byte response",
            offset,
            end,
            line.len()
        ))
    })
}

fn field_str(line: &[u8], offset: usize, width: usize) -> Result<&str, ProtocolError> {
    let raw = field(line, offset, width)?;
    std::str::from_utf8(raw)
        .map(str::trim)
        .map_err(|_| ProtocolError::ReadError(format!("non-ASCII field at offset {}", offset)))
}

/// Decimal floating-point field, e.g. `+0.5000`
pub fn decimal(line: &[u8], offset: usize, width: usize) -> Result<f64, ProtocolError> {
    let s = field_str(line, offset, width)?;
    s.parse::<f64>().map_err(|_| {
        ProtocolError::ReadError(format!("bad decimal field {:?} at offset {}", s, offset))
    })
}

/// Leading integer of `digits`, C `atoi` style: leading whitespace and one
/// sign are accepted, decoding stops at the first non-digit, and no digits
/// at all gives 0.
pub fn leading_decimal(digits: &[u8]) -> i32 {
    let start = digits
        .iter()
        .position(|c| !c.is_ascii_whitespace())
        .unwrap_or(digits.len());
    let mut rest = &digits[start..];
    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };
    let value = rest
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .fold(0i32, |acc, &c| acc.saturating_mul(10).saturating_add(i32::from(c - b'0')));
    if negative {
        -value
    } else {
        value
    }
}

/// Hexadecimal field, upper or lower case digits
pub fn hex(line: &[u8], offset: usize, width: usize) -> Result<u32, ProtocolError> {
    let s = field_str(line, offset, width)?;
    u32::from_str_radix(s, 16).map_err(|_| {
        ProtocolError::ReadError(format!("bad hex field {:?} at offset {}", s, offset))
    })
}

/// Hex decoding that never fails: any byte that is not a hex digit counts
/// as digit 0. Only used for the time period echoed back by a clear.
pub fn lenient_hex(digits: &[u8]) -> u8 {
    digits.iter().fold(0u8, |acc, &c| {
        let digit = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => 10 + c - b'a',
            b'A'..=b'F' => 10 + c - b'A',
            _ => 0,
        };
        (acc << 4) | digit
    })
}

/// Running-sum checksum: byte values added up, masked to 8 bits
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_bounds() {
        let line = b"!05CRD5110-300-25";
        assert_eq!(field(line, 3, 0).unwrap(), b"CRD5110-300-25");
        assert_eq!(field(line, 1, 2).unwrap(), b"05");
        assert!(field(line, 15, 7).is_err());
        assert_eq!(field(line, line.len(), 0).unwrap(), b"");
    }

    #[test]
    fn test_decimal_fields() {
        let line = b">+0.5000-0.1250 50.00";
        assert_eq!(decimal(line, 1, 7).unwrap(), 0.5);
        assert_eq!(decimal(line, 8, 7).unwrap(), -0.125);
        assert_eq!(decimal(line, 15, 6).unwrap(), 50.0);
        assert!(matches!(
            decimal(b">abcdefg", 1, 7),
            Err(ProtocolError::ReadError(_))
        ));
    }

    #[test]
    fn test_hex_fields() {
        let line = b"#0112345670089AB2";
        assert_eq!(hex(line, 3, 7).unwrap(), 0x1234567);
        assert_eq!(hex(line, 10, 7).unwrap(), 0x0089AB2);
        assert_eq!(hex(b"ff", 0, 2).unwrap(), 0xFF);
        assert!(hex(b"zz", 0, 2).is_err());
    }

    #[test]
    fn test_leading_decimal_stops_at_first_non_digit() {
        assert_eq!(leading_decimal(b"01"), 1);
        assert_eq!(leading_decimal(b"12"), 12);
        assert_eq!(leading_decimal(b"1B"), 1);
        assert_eq!(leading_decimal(b" 7"), 7);
        assert_eq!(leading_decimal(b"+3"), 3);
        assert_eq!(leading_decimal(b"-4"), -4);
        assert_eq!(leading_decimal(b"--"), 0);
        assert_eq!(leading_decimal(b"B1"), 0);
        assert_eq!(leading_decimal(b""), 0);
    }

    #[test]
    fn test_lenient_hex_maps_junk_to_zero() {
        assert_eq!(lenient_hex(b"1B"), 0x1B);
        assert_eq!(lenient_hex(b"1b"), 0x1B);
        assert_eq!(lenient_hex(b" 7"), 0x07);
        assert_eq!(lenient_hex(b"A-"), 0xA0);
        assert_eq!(lenient_hex(b"--"), 0);
        assert_eq!(lenient_hex(b""), 0);
    }

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(b""), 0);
        assert_eq!(checksum(&[0xFF, 0x02]), 0x01);
        assert_eq!(checksum(b"#01"), (b'#' as u32 + b'0' as u32 + b'1' as u32) as u8);
    }
}
