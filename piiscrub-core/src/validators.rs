// File: piiscrub-core/src/validators.rs
//! Programmatic checks for pattern kinds whose regex alone over-matches.
//!
//! A kind opts in through its `validator` field. A candidate failing its
//! check is dropped by the evaluator like any other non-detection.
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::config::ValidatorKind;

/// Dispatches to the check for `kind`.
pub fn validate(kind: ValidatorKind, value: &str) -> bool {
    match kind {
        ValidatorKind::Luhn => is_valid_luhn_number(value),
        ValidatorKind::UsSsn => is_valid_us_ssn(value),
        ValidatorKind::UkNino => is_valid_uk_nino(value),
    }
}

/// Mod-10 checksum over the digits of `value`; separators are ignored.
///
/// Inputs with fewer than two digits or any other character are rejected.
pub fn is_valid_luhn_number(value: &str) -> bool {
    let mut sum = 0u32;
    let mut count = 0usize;

    for c in value.chars().rev() {
        if c == ' ' || c == '-' {
            continue;
        }
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        let weighted = if count % 2 == 1 {
            let doubled = digit * 2;
            if doubled > 9 { doubled - 9 } else { doubled }
        } else {
            digit
        };
        sum += weighted;
        count += 1;
    }

    count >= 2 && sum % 10 == 0
}

/// Structural SSN rules: area not 000, 666 or 9xx; group and serial non-zero.
///
/// Expects the dashed `AAA-GG-SSSS` form.
pub fn is_valid_us_ssn(value: &str) -> bool {
    let mut parts = value.split('-');
    let (Some(area), Some(group), Some(serial), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    if area.len() != 3 || group.len() != 2 || serial.len() != 4 {
        return false;
    }
    if ![area, group, serial]
        .iter()
        .all(|p| p.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }

    area != "000" && area != "666" && !area.starts_with('9') && group != "00" && serial != "0000"
}

static INVALID_NINO_PREFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["BG", "GB", "KN", "NK", "NT", "TN", "ZZ"].into_iter().collect()
});

/// HMRC rules: two prefix letters (no D, F, I, Q, U, V; second not O; no
/// administrative pairs), six digits, suffix A–D. Spaces and case are ignored.
pub fn is_valid_uk_nino(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let bytes = compact.as_bytes();

    if bytes.len() != 9 {
        return false;
    }

    let (first, second) = (bytes[0], bytes[1]);
    if !first.is_ascii_uppercase() || !second.is_ascii_uppercase() {
        return false;
    }
    if b"DFIQUV".contains(&first) || b"DFIQUVO".contains(&second) {
        return false;
    }
    if INVALID_NINO_PREFIXES.contains(&compact[..2]) {
        return false;
    }

    bytes[2..8].iter().all(u8::is_ascii_digit) && matches!(bytes[8], b'A'..=b'D')
}
