//! Three-letter surname and given-name blocks.
//!
//! Both blocks are read from the same ordered sequence: every consonant of the
//! input in order, then every vowel in order, then two `X` fillers. The input
//! is upper-cased and stripped of diacritics first; anything that is not an
//! ASCII letter afterwards (spaces, apostrophes, digits, `Ø`) is dropped.
//!
//! The given-name block differs in one rule: when the name has four or more
//! consonants it takes the 1st, 3rd and 4th consonant instead of the first
//! three, so `GIANFRANCO` yields `GFR` rather than `GNF`.
use crate::normalize::strip_diacritics;

const FILLER: char = 'X';

/// Consonants and vowels of a field, each in their original order.
#[derive(Debug, Default, PartialEq, Eq)]
struct Reduced {
    consonants: Vec<char>,
    vowels: Vec<char>,
}

impl Reduced {
    fn from_text(text: &str) -> Self {
        let mut reduced = Self::default();
        for c in strip_diacritics(&text.to_uppercase()).chars() {
            if !c.is_ascii_uppercase() {
                continue;
            }
            if is_vowel(c) {
                reduced.vowels.push(c);
            } else {
                reduced.consonants.push(c);
            }
        }
        reduced
    }

    /// Consonants, then vowels, then the two fillers.
    fn sequence(&self) -> impl Iterator<Item = char> + '_ {
        self.consonants
            .iter()
            .chain(self.vowels.iter())
            .copied()
            .chain([FILLER, FILLER])
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'A' | 'E' | 'I' | 'O' | 'U')
}

/// Returns the three-letter block for a surname.
///
/// ```
/// use fiscode_core::letters::surname_block;
///
/// assert_eq!(surname_block("Rossi"), "RSS");
/// assert_eq!(surname_block("Fò"), "FOX");
/// ```
pub fn surname_block(surname: &str) -> String {
    let reduced = Reduced::from_text(surname);
    pad(reduced.sequence().take(3).collect())
}

/// Returns the three-letter block for a given name.
///
/// ```
/// use fiscode_core::letters::name_block;
///
/// assert_eq!(name_block("Mario"), "MRA");
/// assert_eq!(name_block("Gianfranco"), "GFR");
/// ```
pub fn name_block(name: &str) -> String {
    let reduced = Reduced::from_text(name);
    if let [first, _, third, fourth, ..] = reduced.consonants.as_slice() {
        return [*first, *third, *fourth].iter().collect();
    }
    pad(reduced.sequence().take(3).collect())
}

/// Fills a block to three characters. The sequence always carries two
/// fillers, so this only triggers for inputs with no letters at all.
fn pad(mut block: String) -> String {
    while block.len() < 3 {
        block.push(FILLER);
    }
    block
}
