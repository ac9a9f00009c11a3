// ABOUTME: Base62 codes derived from recipe ids for shareable short links
// ABOUTME: Encoding is deterministic so a recipe keeps its code for life
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::constants::recipes::MAX_SHORT_LINK_LENGTH;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const BASE: u64 = 62;

/// Encode a recipe id as a base62 code
#[must_use]
pub fn encode(id: i64) -> String {
    let mut value = id.unsigned_abs();
    if value == 0 {
        return "0".to_owned();
    }

    let mut digits = Vec::new();
    while value > 0 {
        // value % 62 is always a valid index
        let index = usize::try_from(value % BASE).unwrap_or_default();
        digits.push(char::from(ALPHABET[index]));
        value /= BASE;
    }
    digits.iter().rev().collect()
}

/// Decode a base62 code back into an id
///
/// Returns `None` for empty or overlong codes, foreign characters, and values
/// that do not fit an `i64`.
#[must_use]
pub fn decode(code: &str) -> Option<i64> {
    if code.is_empty() || code.len() > MAX_SHORT_LINK_LENGTH {
        return None;
    }

    code.bytes().try_fold(0_i64, |acc, byte| {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'A'..=b'Z' => byte - b'A' + 10,
            b'a'..=b'z' => byte - b'a' + 36,
            _ => return None,
        };
        acc.checked_mul(62)?.checked_add(i64::from(digit))
    })
}
