// Rotor variants: moving rotors, fixed rotors and reflectors.
//
// All three share one record (name, permutation, offset); the variant only
// decides whether the rotor steps, where its notches are, and whether it can
// be traversed backwards.

use hashbrown::HashSet;

use enigma_core::{EnigmaError, Permutation};

/// Variant-specific part of a [`Rotor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Steps once per symbol when driven; carries notch positions (indices).
    Moving { notches: HashSet<usize> },
    /// Never steps; always at offset 0.
    Fixed,
    /// Never steps, folds the signal path back; forward direction only.
    Reflector,
}

/// A named rotor with a rotational offset.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    kind: RotorKind,
    offset: usize,
}

impl Rotor {
    /// A rotating rotor whose notches are at the symbols of `notches`.
    ///
    /// Fails with [`EnigmaError::Config`] if a notch symbol is not in the
    /// permutation's alphabet.
    pub fn moving(
        name: impl Into<String>,
        permutation: Permutation,
        notches: &str,
    ) -> Result<Self, EnigmaError> {
        let name = name.into();
        let alphabet = permutation.alphabet();
        let notches = notches
            .chars()
            .map(|c| {
                alphabet.to_index(c).map_err(|_| {
                    EnigmaError::Config(format!(
                        "notch {c:?} of rotor {name} is not in the alphabet"
                    ))
                })
            })
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(Self {
            name,
            permutation,
            kind: RotorKind::Moving { notches },
            offset: 0,
        })
    }

    /// A non-rotating, non-reflecting rotor.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self {
            name: name.into(),
            permutation,
            kind: RotorKind::Fixed,
            offset: 0,
        }
    }

    /// A reflector.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Self {
        Self {
            name: name.into(),
            permutation,
            kind: RotorKind::Reflector,
            offset: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Size of the rotor's alphabet.
    #[inline]
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Current offset, in `[0, size)`.
    #[inline]
    pub fn setting(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    #[inline]
    pub fn reflects(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Notch symbols, in alphabet order. Empty for non-moving rotors.
    pub fn notches(&self) -> String {
        match &self.kind {
            RotorKind::Moving { notches } => self
                .permutation
                .alphabet()
                .symbols()
                .enumerate()
                .filter(|(i, _)| notches.contains(i))
                .map(|(_, c)| c)
                .collect(),
            RotorKind::Fixed | RotorKind::Reflector => String::new(),
        }
    }

    /// Check that `offset` is a valid setting for this rotor without
    /// changing anything.
    pub fn check_setting(&self, offset: usize) -> Result<(), EnigmaError> {
        if offset >= self.size() {
            return Err(EnigmaError::Index {
                index: offset,
                size: self.size(),
            });
        }
        match self.kind {
            RotorKind::Moving { .. } => Ok(()),
            RotorKind::Fixed | RotorKind::Reflector if offset == 0 => Ok(()),
            RotorKind::Fixed => Err(EnigmaError::Config(format!(
                "fixed rotor {} has a single position",
                self.name
            ))),
            RotorKind::Reflector => Err(EnigmaError::Config(format!(
                "reflector {} has a single position",
                self.name
            ))),
        }
    }

    /// Set the offset. Fixed rotors and reflectors only accept 0.
    pub fn set(&mut self, offset: usize) -> Result<(), EnigmaError> {
        self.check_setting(offset)?;
        self.offset = offset;
        Ok(())
    }

    /// Set the offset to the index of symbol `c`.
    pub fn set_char(&mut self, c: char) -> Result<(), EnigmaError> {
        let offset = self.permutation.alphabet().to_index(c)?;
        self.set(offset)
    }

    /// Step one position. No-op for non-moving rotors.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.offset = self.permutation.wrap(self.offset as i64 + 1);
        }
    }

    /// True iff this rotor sits at one of its notches, allowing the rotor to
    /// its left to advance.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.offset),
            RotorKind::Fixed | RotorKind::Reflector => false,
        }
    }

    /// Map contact `p` (entering from the right) to the contact it leaves on
    /// the left, taking the current offset into account.
    pub fn convert_forward(&self, p: usize) -> usize {
        if self.reflects() {
            return self.permutation.permute(p as i64);
        }
        let shift = self.offset as i64;
        let out = self.permutation.permute(p as i64 + shift);
        self.permutation.wrap(out as i64 - shift)
    }

    /// Map contact `e` (entering from the left) to the contact it leaves on
    /// the right. Reflectors fail with [`EnigmaError::Direction`].
    pub fn convert_backward(&self, e: usize) -> Result<usize, EnigmaError> {
        if self.reflects() {
            return Err(EnigmaError::Direction(self.name.clone()));
        }
        let shift = self.offset as i64;
        let out = self.permutation.invert(e as i64 + shift);
        Ok(self.permutation.wrap(out as i64 - shift))
    }
}
