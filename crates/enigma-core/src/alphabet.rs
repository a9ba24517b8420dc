// Alphabet: ordered set of encodable symbols with symbol <-> index mapping.

use std::fmt;

use hashbrown::HashMap;

use crate::EnigmaError;

/// Symbols with a syntactic meaning in configuration and setup lines.
/// None of them may be part of an alphabet.
pub const RESERVED_SYMBOLS: &[char] = &[' ', '*', '(', ')'];

/// Symbols of the default alphabet (upper-case Latin letters).
pub const DEFAULT_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Returns true if `c` can never be an alphabet member.
///
/// Besides [`RESERVED_SYMBOLS`], any whitespace is rejected because the
/// configuration format is whitespace-separated.
pub fn is_reserved(c: char) -> bool {
    RESERVED_SYMBOLS.contains(&c) || c.is_whitespace()
}

/// An ordered sequence of distinct symbols.
///
/// Symbol number `k` has index `k`. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Create an alphabet from the symbols of `chars`, in order.
    ///
    /// Fails with [`EnigmaError::Config`] if `chars` is empty, contains a
    /// reserved symbol, or repeats a symbol.
    pub fn new(chars: &str) -> Result<Self, EnigmaError> {
        if chars.is_empty() {
            return Err(EnigmaError::Config(
                "alphabet must contain at least one symbol".to_string(),
            ));
        }

        let mut symbols = Vec::with_capacity(chars.len());
        let mut index = HashMap::with_capacity(chars.len());
        for c in chars.chars() {
            if is_reserved(c) {
                return Err(EnigmaError::Config(format!(
                    "reserved symbol {c:?} cannot be part of an alphabet"
                )));
            }
            if index.insert(c, symbols.len()).is_some() {
                return Err(EnigmaError::Config(format!(
                    "duplicate symbol {c:?} in alphabet {chars:?}"
                )));
            }
            symbols.push(c);
        }

        Ok(Self { symbols, index })
    }

    /// Number of symbols.
    #[inline]
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if `c` is a member of this alphabet.
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.index.contains_key(&c)
    }

    /// Symbol number `index`.
    pub fn to_char(&self, index: usize) -> Result<char, EnigmaError> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::Index {
                index,
                size: self.size(),
            })
    }

    /// Index of symbol `c`. Inverse of [`Alphabet::to_char`].
    pub fn to_index(&self, c: char) -> Result<usize, EnigmaError> {
        self.index.get(&c).copied().ok_or(EnigmaError::Lookup(c))
    }

    /// Iterate over the symbols in index order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl Default for Alphabet {
    /// The upper-case Latin alphabet `A..Z`.
    fn default() -> Self {
        let symbols: Vec<char> = DEFAULT_SYMBOLS.chars().collect();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { symbols, index }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.symbols {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
