// Permutation: a bijection on [0, size) built from cycle notation.
//
// "(c0 c1 ... cm) (d0 ...)" maps c0 -> c1 -> ... -> cm -> c0. Symbols not
// named in any cycle map to themselves. Whitespace is ignored.

use std::fmt;
use std::sync::Arc;

use crate::EnigmaError;
use crate::alphabet::Alphabet;

/// A permutation of the indices of an [`Alphabet`].
///
/// Both directions are stored as dense lookup tables, so `permute` and
/// `invert` are a single indexed load after normalization.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    /// The cycles as written, whitespace removed.
    cycles: Vec<Vec<char>>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parse `cycles` (cycle notation over `alphabet`).
    ///
    /// Fails with [`EnigmaError::Permutation`] on unbalanced, nested or empty
    /// parentheses, symbols outside any cycle, symbols outside the alphabet,
    /// or a symbol that appears more than once.
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self, EnigmaError> {
        let compact: String = cycles.chars().filter(|c| !c.is_whitespace()).collect();
        let parsed = parse_cycles(&compact, &alphabet)?;

        let size = alphabet.size();
        let mut images: Vec<Option<usize>> = vec![None; size];
        for cycle in &parsed {
            for (i, &c) in cycle.iter().enumerate() {
                let next = cycle[(i + 1) % cycle.len()];
                let from = alphabet.to_index(c)?;
                if images[from].is_some() {
                    return Err(EnigmaError::Permutation(format!(
                        "symbol {c:?} is assigned more than one image in {cycles:?}"
                    )));
                }
                images[from] = Some(alphabet.to_index(next)?);
            }
        }

        let forward: Vec<usize> = images
            .into_iter()
            .enumerate()
            .map(|(i, image)| image.unwrap_or(i))
            .collect();
        let mut inverse = vec![0; size];
        for (from, &to) in forward.iter().enumerate() {
            inverse[to] = from;
        }

        Ok(Self {
            alphabet,
            cycles: parsed,
            forward,
            inverse,
        })
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let forward: Vec<usize> = (0..alphabet.size()).collect();
        Self {
            inverse: forward.clone(),
            forward,
            cycles: Vec::new(),
            alphabet,
        }
    }

    /// Size of the alphabet this permutation acts on.
    #[inline]
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The cycles this permutation was parsed from.
    pub fn cycles(&self) -> &[Vec<char>] {
        &self.cycles
    }

    /// `p` modulo the size, floored (negative values wrap to the top).
    #[inline]
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Image of `p mod size`.
    #[inline]
    pub fn permute(&self, p: i64) -> usize {
        self.forward[self.wrap(p)]
    }

    /// Preimage of `c mod size`.
    #[inline]
    pub fn invert(&self, c: i64) -> usize {
        self.inverse[self.wrap(c)]
    }

    /// Image of symbol `p`.
    pub fn permute_char(&self, p: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.to_index(p)?;
        self.alphabet.to_char(self.forward[index])
    }

    /// Preimage of symbol `c`.
    pub fn invert_char(&self, c: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.to_index(c)?;
        self.alphabet.to_char(self.inverse[index])
    }

    /// True iff every symbol used in the cycle definitions belongs to the
    /// alphabet.
    ///
    /// Note: this does not check for fixed points. A permutation that leaves
    /// symbols unmapped still reports `true`.
    pub fn derangement(&self) -> bool {
        self.cycles
            .iter()
            .flatten()
            .all(|&c| self.alphabet.contains(c))
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cycle) in self.cycles.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "(")?;
            for c in cycle {
                write!(f, "{c}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Split whitespace-free cycle notation into its cycles.
///
/// The parenthesis depth may only ever be 0 or 1 and must end at 0.
fn parse_cycles(compact: &str, alphabet: &Alphabet) -> Result<Vec<Vec<char>>, EnigmaError> {
    let mut cycles = Vec::new();
    let mut current: Option<Vec<char>> = None;

    for c in compact.chars() {
        match c {
            '(' => {
                if current.is_some() {
                    return Err(EnigmaError::Permutation(format!(
                        "nested '(' in {compact:?}"
                    )));
                }
                current = Some(Vec::new());
            }
            ')' => match current.take() {
                None => {
                    return Err(EnigmaError::Permutation(format!(
                        "unmatched ')' in {compact:?}"
                    )));
                }
                Some(cycle) if cycle.is_empty() => {
                    return Err(EnigmaError::Permutation(format!(
                        "empty cycle in {compact:?}"
                    )));
                }
                Some(cycle) => cycles.push(cycle),
            },
            _ => {
                let Some(cycle) = current.as_mut() else {
                    return Err(EnigmaError::Permutation(format!(
                        "symbol {c:?} outside of a cycle in {compact:?}"
                    )));
                };
                if !alphabet.contains(c) {
                    return Err(EnigmaError::Permutation(format!(
                        "symbol {c:?} is not in the alphabet"
                    )));
                }
                cycle.push(c);
            }
        }
    }

    if current.is_some() {
        return Err(EnigmaError::Permutation(format!(
            "unclosed '(' in {compact:?}"
        )));
    }
    Ok(cycles)
}
