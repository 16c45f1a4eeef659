//! Control-character computation for fiscal codes.
//!
//! The sixteenth character of a fiscal code is a letter derived from the
//! preceding fifteen. Both functions here are zero-allocation: they walk the
//! byte slice of the input directly.
//!
//! # Algorithm
//!
//! Positions are numbered 1–15 from left to right. Each character first maps
//! to an offset: digits `0`–`9` to 0–9, letters `A`–`Z` to 0–25.
//!
//! - At an **even** position the offset itself is added to the sum.
//! - At an **odd** position the offset indexes [`ODD_POSITION_VALUES`] and the
//!   table entry is added instead.
//!
//! The control letter is `'A' + (sum mod 26)`.

/// Number of characters the control letter is computed over.
pub const PREFIX_LEN: usize = 15;

/// Full length of a fiscal code, control letter included.
pub const CODE_LEN: usize = 16;

/// Substitution values for characters at odd (1-indexed) positions.
///
/// Indexed by the character offset: `A`/`0` → 1, `B`/`1` → 0, `C`/`2` → 5, …
pub static ODD_POSITION_VALUES: [u8; 26] = [
    1, 0, 5, 7, 9, 13, 15, 17, 19, 21, 2, 4, 18, 20, 11, 3, 6, 8, 12, 14, 16, 10, 22, 25, 24, 23,
];

/// Computes the control letter for a 15-character fiscal code prefix.
///
/// Returns `None` unless `prefix` is exactly 15 bytes drawn from `[0-9A-Z]`.
/// Lower-case input is rejected rather than folded; callers upper-case first.
///
/// # Examples
///
/// ```
/// use fiscode_core::check_digits::check_letter;
///
/// assert_eq!(check_letter("RSSMRA80A01H501"), Some('U'));
/// assert_eq!(check_letter("RSSMRA80A01H50"), None);
/// ```
pub fn check_letter(prefix: &str) -> Option<char> {
    let bytes = prefix.as_bytes();
    if bytes.len() != PREFIX_LEN {
        return None;
    }

    let mut sum: u32 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let offset = match byte {
            b'0'..=b'9' => byte - b'0',
            b'A'..=b'Z' => byte - b'A',
            _ => return None,
        };
        // `i` is 0-based, so an even `i` is an odd position.
        let value = if i % 2 == 0 {
            ODD_POSITION_VALUES[usize::from(offset)]
        } else {
            offset
        };
        sum += u32::from(value);
    }

    let remainder = u8::try_from(sum % 26).ok()?;
    Some(char::from(b'A' + remainder))
}

/// Returns `true` when the last character of a 16-character code equals the
/// control letter of its first 15.
///
/// Shape checks beyond length and alphabet are left to
/// [`crate::newtypes::FiscalCode`].
///
/// ```
/// use fiscode_core::check_digits::verify;
///
/// assert!(verify("RSSMRA80A01H501U"));
/// assert!(!verify("RSSMRA80A01H501V"));
/// ```
pub fn verify(code: &str) -> bool {
    if code.len() != CODE_LEN {
        return false;
    }
    let (Some(prefix), Some(last)) = (code.get(..PREFIX_LEN), code.get(PREFIX_LEN..)) else {
        return false;
    };
    match check_letter(prefix) {
        Some(expected) => last.chars().eq(std::iter::once(expected)),
        None => false,
    }
}
