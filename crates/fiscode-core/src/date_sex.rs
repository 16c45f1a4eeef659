//! Encoding of birth year, month, day and sex.
//!
//! - Year: last two digits, zero-padded (`1986` → `86`, `2005` → `05`).
//! - Month: one letter from [`MONTH_LETTERS`].
//! - Day and sex: the day for males, the day plus [`FEMALE_DAY_OFFSET`] for
//!   females, zero-padded to two digits.
use crate::person::Sex;

/// Month letters, January through December. Not alphabetically contiguous.
pub static MONTH_LETTERS: [char; 12] = ['A', 'B', 'C', 'D', 'E', 'H', 'L', 'M', 'P', 'R', 'S', 'T'];

/// Added to the birth day when the person is female.
pub const FEMALE_DAY_OFFSET: u8 = 40;

/// Returns the two-digit year block.
pub fn year_block(year: u16) -> String {
    format!("{:02}", year % 100)
}

/// Returns the letter for `month` (1 = January), or `None` outside 1–12.
pub fn month_letter(month: u8) -> Option<char> {
    let idx = usize::from(month).checked_sub(1)?;
    MONTH_LETTERS.get(idx).copied()
}

/// Inverse of [`month_letter`].
pub fn month_from_letter(letter: char) -> Option<u8> {
    let idx = MONTH_LETTERS.iter().position(|&l| l == letter)?;
    u8::try_from(idx + 1).ok()
}

/// Returns the two-digit day/sex block.
pub fn day_sex_block(day: u8, sex: Sex) -> String {
    let value = match sex {
        Sex::Male => day,
        Sex::Female => day.saturating_add(FEMALE_DAY_OFFSET),
    };
    format!("{value:02}")
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` of `year`, or `None` for a month outside 1–12.
pub fn days_in_month(year: u16, month: u8) -> Option<u8> {
    match month {
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        _ => None,
    }
}
