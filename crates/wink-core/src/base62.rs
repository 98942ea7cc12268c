//! Positional base-62 numerals over `u64`.
//!
//! Digits are `0-9`, `A-Z`, `a-z` in that order. Every value has exactly one
//! canonical spelling: no padding and no leading `'0'` except for zero itself.

use crate::error::{CoreError, Result};
use smol_str::SmolStr;

/// The 62 digits, indexed by value.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = 62;

/// Length of `u64::MAX` in base 62.
pub const MAX_LEN: usize = 11;

/// Encodes a value as its shortest base-62 numeral.
pub fn encode(mut value: u64) -> SmolStr {
    if value == 0 {
        return SmolStr::new_inline("0");
    }

    let mut digits = [0u8; MAX_LEN];
    let mut start = MAX_LEN;
    while value > 0 {
        start -= 1;
        digits[start] = ALPHABET[(value % BASE) as usize];
        value /= BASE;
    }

    digits[start..].iter().map(|&b| b as char).collect()
}

/// Decodes a canonical base-62 numeral.
///
/// Rejects empty input, symbols outside [`ALPHABET`], leading zeros and
/// values that do not fit in a `u64`.
pub fn decode(input: &str) -> Result<u64> {
    if input.is_empty() {
        return Err(CoreError::MalformedCode("code is empty".to_string()));
    }

    if input.len() > MAX_LEN {
        return Err(CoreError::MalformedCode(format!(
            "code is longer than {MAX_LEN} symbols: '{input}'"
        )));
    }

    if input.len() > 1 && input.starts_with('0') {
        return Err(CoreError::MalformedCode(format!(
            "code has a leading zero: '{input}'"
        )));
    }

    input.bytes().try_fold(0u64, |acc, byte| {
        let digit = digit_value(byte).ok_or_else(|| {
            CoreError::MalformedCode(format!(
                "symbol '{}' is outside the alphabet: '{input}'",
                byte.escape_ascii()
            ))
        })?;

        acc.checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| CoreError::MalformedCode(format!("code overflows u64: '{input}'")))
    })
}

fn digit_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'0'..=b'9' => byte - b'0',
        b'A'..=b'Z' => byte - b'A' + 10,
        b'a'..=b'z' => byte - b'a' + 36,
        _ => return None,
    };
    Some(u64::from(value))
}
