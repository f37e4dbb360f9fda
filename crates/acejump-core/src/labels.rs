//! Label allocation — turning scan order into typable labels.
//!
//! Labels are drawn from a configured [`Alphabet`]. In single-char mode the
//! label for global index `i` is simply `alphabet[i]`. In double-char mode the
//! universe is every ordered pair of alphabet characters, reordered so the
//! easiest labels come first:
//!
//! 1. repeated pairs (`aa`, `bb`, …) in alphabet order
//! 2. pairs of two lowercase letters not already in (1), in pair order
//! 3. everything else, in pair order
//!
//! For the alphabet `"aB"` that gives `aa BB aB Ba`: mixed-case and symbol
//! pairs are pushed to the back.
//!
//! Indices are global across one batch: the first buffer gets labels
//! `0..n`, the second `n..m`, and so on. That keeps labels unique
//! across every buffer labeled at the same time.

use crate::error::{ConfigError, LabelError};

// ---------------------------------------------------------------------------
// Alphabet
// ---------------------------------------------------------------------------

/// An ordered set of unique label characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if `labels` is empty or repeats a character.
    pub fn new(labels: &str) -> Result<Self, ConfigError> {
        let mut chars: Vec<char> = Vec::with_capacity(labels.len());
        for ch in labels.chars() {
            if chars.contains(&ch) {
                return Err(ConfigError::DuplicateLabel(ch));
            }
            chars.push(ch);
        }
        if chars.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        Ok(Self { chars })
    }

    /// Number of characters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Never true for a constructed alphabet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The characters in priority order.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// The full, ordered label universe for one alphabet and mode.
#[derive(Debug, Clone)]
pub struct Labels {
    universe: Vec<String>,
    double: bool,
}

impl Labels {
    /// Build the universe for `alphabet` in single- or double-char mode.
    #[must_use]
    pub fn new(alphabet: &Alphabet, double: bool) -> Self {
        let universe = if double {
            double_char_labels(alphabet)
        } else {
            alphabet.chars().iter().map(char::to_string).collect()
        };
        Self { universe, double }
    }

    /// How many labels one batch can hold.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.universe.len()
    }

    /// Characters per label.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        if self.double { 2 } else { 1 }
    }

    /// The label at global index `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.universe.get(index).map(String::as_str)
    }

    /// Reverse lookup: the global index `label` is allocated at.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.universe.iter().position(|l| l == label)
    }

    /// Allocate labels for `count` new candidates when `existing` labels are
    /// already out in this batch.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::CapacityExceeded`] if the batch would overflow.
    pub fn allocate(&self, existing: usize, count: usize) -> Result<&[String], LabelError> {
        let requested = existing + count;
        if requested > self.capacity() {
            return Err(LabelError::CapacityExceeded {
                requested,
                capacity: self.capacity(),
            });
        }
        Ok(&self.universe[existing..requested])
    }
}

/// Every ordered pair, reordered repeated → lowercase → rest.
fn double_char_labels(alphabet: &Alphabet) -> Vec<String> {
    let chars = alphabet.chars();
    let pairs: Vec<(char, char)> = chars
        .iter()
        .flat_map(|&a| chars.iter().map(move |&b| (a, b)))
        .collect();

    let repeated = pairs.iter().filter(|(a, b)| a == b);
    let lower = pairs
        .iter()
        .filter(|(a, b)| a != b && a.is_lowercase() && b.is_lowercase());
    let other = pairs
        .iter()
        .filter(|(a, b)| a != b && !(a.is_lowercase() && b.is_lowercase()));

    repeated
        .chain(lower)
        .chain(other)
        .map(|&(a, b)| [a, b].iter().collect())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
