//! Conversions between the decimal, hex & padded-address representations of
//! the numbers accepted on the command line.
//!
//! Numbers are unbounded unsigned integers ([`BigUint`]) until they are handed
//! to the external signing / hashing library, at which point they are
//! converted to field elements with [`to_felt`].

use num_bigint::BigUint;
use starknet::core::types::FieldElement;

use crate::{
    constants::{ADDRESS_HEX_DIGITS, HEX_PREFIX, MAX_SHORT_STRING_LEN},
    errors::FormatError,
};

/// Parses a decimal or `0x`-prefixed hex string into an unsigned integer
pub fn normalize_number(value: &str) -> Result<BigUint, FormatError> {
    let parsed = match value.strip_prefix(HEX_PREFIX) {
        Some(digits) => parse_digits(digits, 16),
        None => parse_digits(value, 10),
    };

    parsed.ok_or_else(|| FormatError::InvalidNumber(value.to_string()))
}

/// Returns the `0x`-prefixed, 64-hex-digit representation of an address
pub fn hex_address(value: &BigUint) -> Result<String, FormatError> {
    pad_hex_digits(&value.to_str_radix(16))
}

/// Pads a hex or decimal string to a 64-hex-digit address.
///
/// Hex input keeps its significant digits as written. Leading zeros do not count
/// towards the 64-digit limit.
pub fn hex_address_from_str(value: &str) -> Result<String, FormatError> {
    match value.strip_prefix(HEX_PREFIX) {
        Some(digits) => {
            // Validate before padding, the digits themselves are kept verbatim
            normalize_number(value)?;
            pad_hex_digits(digits)
        }
        None => hex_address(&normalize_number(value)?),
    }
}

/// Whether the token should be passed as a short string rather than a number,
/// i.e. it is neither a decimal nor a `0x`-hex integer
pub fn is_string_literal(token: &str) -> bool {
    normalize_number(token).is_err()
}

/// Encodes an ASCII short string as the big-endian integer of its bytes
pub fn str_to_felt(text: &str) -> Result<BigUint, FormatError> {
    if !text.is_ascii() {
        return Err(FormatError::NonAsciiShortString(text.to_string()));
    }
    if text.len() > MAX_SHORT_STRING_LEN {
        return Err(FormatError::ShortStringTooLong(text.to_string()));
    }

    Ok(BigUint::from_bytes_be(text.as_bytes()))
}

/// Parses a command line argument, encoding it as a short string if it is not numeric
pub fn parse_argument(token: &str) -> Result<BigUint, FormatError> {
    if is_string_literal(token) {
        str_to_felt(token)
    } else {
        normalize_number(token)
    }
}

/// Converts an integer into a field element of the external library
pub fn to_felt(value: &BigUint) -> Result<FieldElement, FormatError> {
    FieldElement::from_byte_slice_be(&value.to_bytes_be())
        .map_err(|_| FormatError::NotAFelt(value.to_string()))
}

/// Converts a field element of the external library into an integer
pub fn from_felt(felt: FieldElement) -> BigUint {
    BigUint::from_bytes_be(&felt.to_bytes_be())
}

fn parse_digits(digits: &str, radix: u32) -> Option<BigUint> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    BigUint::parse_bytes(digits.as_bytes(), radix)
}

fn pad_hex_digits(digits: &str) -> Result<String, FormatError> {
    let significant = digits.trim_start_matches('0');
    if significant.len() > ADDRESS_HEX_DIGITS {
        return Err(FormatError::AddressTooLong(format!("{HEX_PREFIX}{digits}")));
    }

    Ok(format!(
        "{HEX_PREFIX}{significant:0>width$}",
        width = ADDRESS_HEX_DIGITS
    ))
}

#[cfg(test)]
mod tests {
    use num_bigint::{BigUint, RandBigInt};
    use rand::{thread_rng, Rng};

    use crate::errors::FormatError;

    use super::{
        from_felt, hex_address, hex_address_from_str, is_string_literal, normalize_number,
        parse_argument, str_to_felt, to_felt,
    };

    const NUM_RANDOM_SAMPLES: usize = 100;

    #[test]
    fn test_normalize_number() {
        assert_eq!(normalize_number("123").unwrap(), BigUint::from(123u32));
        assert_eq!(normalize_number("0x1a").unwrap(), BigUint::from(26u32));
        assert_eq!(normalize_number("0xABC").unwrap(), BigUint::from(0xabcu32));
        assert_eq!(normalize_number("0").unwrap(), BigUint::from(0u32));

        for bad in ["", "0x", "balance", "12a", "0xg1", "-5", "1.5"] {
            assert_eq!(
                normalize_number(bad),
                Err(FormatError::InvalidNumber(bad.to_string())),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_hex_address_roundtrip() {
        let mut rng = thread_rng();
        for _ in 0..NUM_RANDOM_SAMPLES {
            let n = rng.gen_biguint(256);
            let address = hex_address(&n).unwrap();
            assert_eq!(address.len(), 66);
            assert!(address.starts_with("0x"));
            assert_eq!(normalize_number(&address).unwrap(), n);
        }

        // The bounds of the range
        let max = (BigUint::from(1u32) << 256) - 1u32;
        assert_eq!(hex_address(&max).unwrap(), format!("0x{}", "f".repeat(64)));
        assert_eq!(
            hex_address(&BigUint::from(0u32)).unwrap(),
            format!("0x{}", "0".repeat(64))
        );
    }

    #[test]
    fn test_hex_address_keeps_significant_digits() {
        let address = hex_address_from_str("0xABC").unwrap();
        assert_eq!(address.len(), 66);
        assert!(address.ends_with("ABC"));

        let mut rng = thread_rng();
        for _ in 0..NUM_RANDOM_SAMPLES {
            let num_digits = rng.gen_range(1..=64);
            let digits: String = (0..num_digits)
                .map(|_| {
                    std::char::from_digit(rng.gen_range(1..16), 16)
                        .unwrap()
                        .to_ascii_uppercase()
                })
                .collect();

            let address = hex_address_from_str(&format!("0x{digits}")).unwrap();
            assert_eq!(address.len(), 66);
            assert!(address.ends_with(&digits));
        }
    }

    #[test]
    fn test_hex_address_from_decimal() {
        assert_eq!(
            hex_address_from_str("2748").unwrap(),
            format!("0x{}abc", "0".repeat(61))
        );
    }

    #[test]
    fn test_hex_address_too_long() {
        let too_long = format!("0x1{}", "0".repeat(64));
        assert_eq!(
            hex_address_from_str(&too_long),
            Err(FormatError::AddressTooLong(too_long.clone()))
        );
        assert!(hex_address(&normalize_number(&too_long).unwrap()).is_err());

        // Exactly 64 digits is left untouched
        let exact = format!("0x{}", "a".repeat(64));
        assert_eq!(hex_address_from_str(&exact).unwrap(), exact);

        // Leading zeros are not significant
        let zero_padded = format!("0x00{}", "a".repeat(64));
        assert_eq!(hex_address_from_str(&zero_padded).unwrap(), exact);
        assert_eq!(
            hex_address_from_str(&format!("0x{}", "0".repeat(70))).unwrap(),
            format!("0x{}", "0".repeat(64))
        );
    }

    #[test]
    fn test_is_string_literal() {
        assert!(!is_string_literal("0x1a"));
        assert!(!is_string_literal("123"));
        assert!(is_string_literal("balance"));
        assert!(is_string_literal("0xzz"));
        assert!(is_string_literal(""));
    }

    #[test]
    fn test_short_strings() {
        // "abc" = 0x616263
        assert_eq!(str_to_felt("abc").unwrap(), BigUint::from(0x616263u32));
        assert_eq!(parse_argument("abc").unwrap(), BigUint::from(0x616263u32));
        assert_eq!(parse_argument("0x10").unwrap(), BigUint::from(16u32));
        assert_eq!(parse_argument("10").unwrap(), BigUint::from(10u32));

        assert!(matches!(
            str_to_felt(&"a".repeat(32)),
            Err(FormatError::ShortStringTooLong(_))
        ));
        assert!(matches!(
            str_to_felt("héllo"),
            Err(FormatError::NonAsciiShortString(_))
        ));
    }

    #[test]
    fn test_felt_conversion() {
        let mut rng = thread_rng();
        for _ in 0..NUM_RANDOM_SAMPLES {
            let n = rng.gen_biguint(251);
            assert_eq!(from_felt(to_felt(&n).unwrap()), n);
        }

        // 2^256 - 1 is above the field prime
        let max = (BigUint::from(1u32) << 256) - 1u32;
        assert!(matches!(to_felt(&max), Err(FormatError::NotAFelt(_))));
    }
}
