//! Core types for the rotor cipher machine.
//!
//! This crate holds the leaf data structures every other crate in the
//! workspace builds on: the symbol [`Alphabet`] and the cycle-notation
//! [`Permutation`] that rotors, reflectors and the plugboard are made of.
//!
//! # Architecture
//!
//! - [`alphabet`] -- ordered symbol set with symbol/index lookup
//! - [`permutation`] -- cycle-notation parsing, forward and inverse mapping
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use enigma_core::{Alphabet, Permutation};
//!
//! let alphabet = Arc::new(Alphabet::default());
//! let perm = Permutation::new("(AELT) (BKNW)", alphabet).unwrap();
//!
//! assert_eq!(perm.permute_char('A').unwrap(), 'E');
//! assert_eq!(perm.invert_char('A').unwrap(), 'T');
//! assert_eq!(perm.permute_char('C').unwrap(), 'C');
//! ```

pub mod alphabet;
pub mod permutation;

pub use alphabet::Alphabet;
pub use permutation::Permutation;

/// Error type shared by every crate of the machine.
///
/// Each variant is fatal to the operation that produced it; nothing in the
/// library recovers from an error or retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnigmaError {
    /// Malformed alphabet, slot/pawl counts, rotor descriptor or setting.
    #[error("configuration error: {0}")]
    Config(String),
    /// Malformed cycle notation or a symbol mapped twice.
    #[error("invalid permutation: {0}")]
    Permutation(String),
    /// Rotor selection violates the machine's placement rules.
    #[error("invalid rotor selection: {0}")]
    RotorSelection(String),
    /// A symbol that is not part of the alphabet.
    #[error("symbol {0:?} is not in the alphabet")]
    Lookup(char),
    /// An index outside `[0, size)`.
    #[error("index {index} is out of range for an alphabet of {size} symbols")]
    Index { index: usize, size: usize },
    /// Backward conversion requested on a reflector.
    #[error("reflector {0} only converts in the forward direction")]
    Direction(String),
}
