// Machine: rotor slots, plugboard, stepping and the signal path.
//
// Slot 0 holds the reflector (leftmost), slot N-1 the rotor next to the
// plugboard. With P pawls, slots 1..N-P hold fixed rotors and slots N-P..N
// hold moving rotors.
//
// One conversion:
//   plugboard -> step -> slots N-1..0 forward -> slots 1..N-1 backward -> plugboard

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};

use enigma_core::{Alphabet, EnigmaError, Permutation};

use crate::config::SetupLine;
use crate::rotor::Rotor;

/// A complete rotor cipher machine.
///
/// The machine owns its rotor catalog; selecting rotors for the slots only
/// records catalog indices, so a rotor referenced by several setups is the
/// same instance every time.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    catalog: Vec<Rotor>,
    by_name: HashMap<String, usize>,
    /// Catalog index of the rotor in each slot. Empty until rotors are inserted.
    slots: Vec<usize>,
    plugboard: Permutation,
}

impl Machine {
    /// A machine over `alphabet` with `num_rotors > 1` slots and
    /// `0 <= pawls < num_rotors` pawls, choosing from `all_rotors`.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        all_rotors: Vec<Rotor>,
    ) -> Result<Self, EnigmaError> {
        if num_rotors <= 1 {
            return Err(EnigmaError::Config(format!(
                "invalid number of rotor slots: {num_rotors} (must be > 1)"
            )));
        }
        if pawls >= num_rotors {
            return Err(EnigmaError::Config(format!(
                "invalid pawl count: {pawls} (must be < {num_rotors})"
            )));
        }

        let mut by_name = HashMap::with_capacity(all_rotors.len());
        for (i, rotor) in all_rotors.iter().enumerate() {
            if rotor.permutation().alphabet() != alphabet.as_ref() {
                return Err(EnigmaError::Config(format!(
                    "rotor {} uses a different alphabet than the machine",
                    rotor.name()
                )));
            }
            if by_name.insert(rotor.name().to_string(), i).is_some() {
                return Err(EnigmaError::Config(format!(
                    "rotor {} is defined more than once",
                    rotor.name()
                )));
            }
        }

        Ok(Self {
            plugboard: Permutation::identity(Arc::clone(&alphabet)),
            alphabet,
            num_rotors,
            pawls,
            catalog: all_rotors,
            by_name,
            slots: Vec::new(),
        })
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Number of pawls, and thus of rotating slots.
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// All rotors this machine can choose from.
    pub fn catalog(&self) -> &[Rotor] {
        &self.catalog
    }

    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// True once rotors have been inserted.
    pub fn is_configured(&self) -> bool {
        !self.slots.is_empty()
    }

    /// The rotor in `slot`, if rotors are inserted and `slot` is in range.
    pub fn rotor(&self, slot: usize) -> Option<&Rotor> {
        self.slots.get(slot).map(|&i| &self.catalog[i])
    }

    /// Names of the inserted rotors, slot 0 first.
    pub fn rotor_names(&self) -> Vec<&str> {
        self.slots.iter().map(|&i| self.catalog[i].name()).collect()
    }

    /// Current settings of slots 1..N as a symbol string, in the format
    /// accepted by [`Machine::set_rotors`].
    pub fn settings(&self) -> Result<String, EnigmaError> {
        self.slots
            .iter()
            .skip(1)
            .map(|&i| self.alphabet.to_char(self.catalog[i].setting()))
            .collect()
    }

    /// Put the rotors named `names` into the slots, `names[0]` being the
    /// reflector. Every selected rotor starts at offset 0.
    ///
    /// Nothing changes if the selection is rejected.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), EnigmaError> {
        let slots = self.select(names)?;
        for &i in &slots {
            self.catalog[i].set(0)?;
        }
        self.slots = slots;
        Ok(())
    }

    /// Set the non-reflector rotors from `setting`, one symbol per slot,
    /// left to right.
    ///
    /// Nothing changes if any symbol is rejected.
    pub fn set_rotors(&mut self, setting: &str) -> Result<(), EnigmaError> {
        if !self.is_configured() {
            return Err(EnigmaError::Config(
                "rotors must be inserted before they can be set".to_string(),
            ));
        }
        let offsets = self.check_setting(&self.slots, setting)?;
        self.commit_offsets(&offsets)
    }

    pub fn set_plugboard(&mut self, plugboard: Permutation) {
        self.plugboard = plugboard;
    }

    /// Parse and apply a setup line.
    pub fn setup(&mut self, line: &str) -> Result<(), EnigmaError> {
        let setup = SetupLine::parse(line, self.num_rotors)?;
        self.apply_setup(&setup)
    }

    /// Insert rotors, set them, and install the plugboard as one step.
    ///
    /// Rotor selection, setting and plugboard are all validated before
    /// anything changes; applying the same setup twice yields the same state.
    pub fn apply_setup(&mut self, setup: &SetupLine) -> Result<(), EnigmaError> {
        let slots = self.select(&setup.rotors)?;
        let offsets = self.check_setting(&slots, &setup.setting)?;
        let plugboard = match &setup.plugboard {
            Some(cycles) => Permutation::new(cycles, Arc::clone(&self.alphabet))?,
            None => Permutation::identity(Arc::clone(&self.alphabet)),
        };

        self.catalog[slots[0]].set(0)?;
        self.slots = slots;
        self.commit_offsets(&offsets)?;
        self.plugboard = plugboard;
        Ok(())
    }

    /// Convert one contact index, advancing the rotors first.
    pub fn convert(&mut self, contact: usize) -> Result<usize, EnigmaError> {
        if !self.is_configured() {
            return Err(EnigmaError::Config(
                "no rotors inserted; a setup must come before any message".to_string(),
            ));
        }

        let mut pos = self.plugboard.permute(contact as i64);
        self.step();

        for &i in self.slots.iter().rev() {
            let rotor = &self.catalog[i];
            pos = rotor.convert_forward(rotor.permutation().wrap(pos as i64));
        }
        for &i in &self.slots[1..] {
            let rotor = &self.catalog[i];
            pos = rotor.convert_backward(rotor.permutation().wrap(pos as i64))?;
        }

        Ok(self.plugboard.permute(pos as i64))
    }

    /// Convert every symbol of `msg`, in order. Whitespace is skipped.
    ///
    /// All symbols are looked up before the first one is converted, so an
    /// unknown symbol leaves the rotors untouched.
    pub fn convert_message(&mut self, msg: &str) -> Result<String, EnigmaError> {
        let contacts = msg
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| self.alphabet.to_index(c))
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = String::with_capacity(contacts.len());
        for contact in contacts {
            let out = self.convert(contact)?;
            result.push(self.alphabet.to_char(out)?);
        }
        Ok(result)
    }

    /// Decide which slots advance on the next step, from the current notch
    /// state only.
    ///
    /// Scanning right to left with a pawl budget of P: the rightmost slot
    /// always advances; any other rotating slot advances when its right
    /// neighbor is at a notch, and then drives that neighbor as well.
    pub fn advancing_slots(&self) -> Vec<bool> {
        let n = self.slots.len();
        let mut advancing = vec![false; n];
        let mut pawls = self.pawls;

        for slot in (0..n).rev() {
            if pawls == 0 {
                break;
            }
            if !self.catalog[self.slots[slot]].rotates() {
                continue;
            }
            if slot == n - 1 {
                advancing[slot] = true;
            } else if self.catalog[self.slots[slot + 1]].at_notch() {
                advancing[slot] = true;
                advancing[slot + 1] = true;
            }
            pawls -= 1;
        }
        advancing
    }

    /// Advance the rotor stack by one position.
    fn step(&mut self) {
        let advancing = self.advancing_slots();
        for (&i, _) in self.slots.iter().zip(advancing).filter(|(_, adv)| *adv) {
            self.catalog[i].advance();
        }
    }

    /// Choose catalog rotors for the slots, enforcing the placement rules.
    fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>, EnigmaError> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::RotorSelection(format!(
                "expected {} rotors, got {}",
                self.num_rotors,
                names.len()
            )));
        }

        let first_moving = self.num_rotors - self.pawls;
        let mut seen = HashSet::with_capacity(names.len());
        let mut slots = Vec::with_capacity(names.len());

        for (slot, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let &index = self
                .by_name
                .get(name)
                .ok_or_else(|| EnigmaError::RotorSelection(format!("unknown rotor {name}")))?;
            if !seen.insert(index) {
                return Err(EnigmaError::RotorSelection(format!(
                    "rotor {name} is selected more than once"
                )));
            }

            let rotor = &self.catalog[index];
            let misplaced = if slot == 0 {
                (!rotor.reflects()).then(|| format!("slot 0 must hold a reflector, not {name}"))
            } else if rotor.reflects() {
                Some(format!("reflector {name} can only occupy slot 0"))
            } else if slot < first_moving && rotor.rotates() {
                Some(format!(
                    "moving rotor {name} cannot occupy fixed slot {slot}"
                ))
            } else if slot >= first_moving && !rotor.rotates() {
                Some(format!(
                    "fixed rotor {name} cannot occupy moving slot {slot}"
                ))
            } else {
                None
            };
            if let Some(reason) = misplaced {
                return Err(EnigmaError::RotorSelection(reason));
            }

            slots.push(index);
        }
        Ok(slots)
    }

    /// Translate `setting` into offsets for `slots[1..]`, checking each one
    /// against its rotor.
    fn check_setting(&self, slots: &[usize], setting: &str) -> Result<Vec<usize>, EnigmaError> {
        let expected = self.num_rotors - 1;
        let found = setting.chars().count();
        if found != expected {
            return Err(EnigmaError::Config(format!(
                "rotor setting {setting:?} has {found} symbols, expected {expected}"
            )));
        }

        let mut offsets = Vec::with_capacity(expected);
        for (&i, c) in slots[1..].iter().zip(setting.chars()) {
            let offset = self.alphabet.to_index(c)?;
            self.catalog[i].check_setting(offset)?;
            offsets.push(offset);
        }
        Ok(offsets)
    }

    fn commit_offsets(&mut self, offsets: &[usize]) -> Result<(), EnigmaError> {
        for (&i, &offset) in self.slots[1..].iter().zip(offsets) {
            self.catalog[i].set(offset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet() -> Arc<Alphabet> {
        Arc::new(Alphabet::new("ABCD").unwrap())
    }

    fn perm(cycles: &str, alphabet: &Arc<Alphabet>) -> Permutation {
        Permutation::new(cycles, Arc::clone(alphabet)).unwrap()
    }

    /// Four-symbol machine: 4 slots, 2 pawls.
    fn small_machine() -> Machine {
        let a = alphabet();
        let rotors = vec![
            Rotor::reflector("R", perm("(AB) (CD)", &a)),
            Rotor::reflector("R2", perm("(AC) (BD)", &a)),
            Rotor::fixed("F", perm("(ABC)", &a)),
            Rotor::fixed("F2", perm("(BD)", &a)),
            Rotor::moving("X", perm("(ABCD)", &a), "B").unwrap(),
            Rotor::moving("Y", perm("(AC)", &a), "D").unwrap(),
            Rotor::moving("Z", perm("(DCBA)", &a), "A").unwrap(),
        ];
        Machine::new(a, 4, 2, rotors).unwrap()
    }

    #[test]
    fn reject_bad_slot_and_pawl_counts() {
        assert!(matches!(
            Machine::new(alphabet(), 1, 0, Vec::new()),
            Err(EnigmaError::Config(_))
        ));
        assert!(matches!(
            Machine::new(alphabet(), 3, 3, Vec::new()),
            Err(EnigmaError::Config(_))
        ));
    }

    #[test]
    fn reject_duplicate_catalog_names() {
        let a = alphabet();
        let rotors = vec![
            Rotor::fixed("F", perm("(AB)", &a)),
            Rotor::fixed("F", perm("(CD)", &a)),
        ];
        assert!(matches!(
            Machine::new(a, 3, 1, rotors),
            Err(EnigmaError::Config(_))
        ));
    }

    #[test]
    fn reject_rotor_over_other_alphabet() {
        let other = Arc::new(Alphabet::new("WXYZ").unwrap());
        let rotors = vec![Rotor::fixed("F", perm("(WX)", &other))];
        assert!(matches!(
            Machine::new(alphabet(), 3, 1, rotors),
            Err(EnigmaError::Config(_))
        ));
    }

    #[test]
    fn insert_valid_selection() {
        let mut m = small_machine();
        m.insert_rotors(&["R", "F", "X", "Y"]).unwrap();
        assert_eq!(m.rotor_names(), ["R", "F", "X", "Y"]);
        assert_eq!(m.settings().unwrap(), "AAA");
        assert!(m.is_configured());
    }

    #[test]
    fn insert_rejects_placement_errors() {
        let cases: &[&[&str]] = &[
            &["R", "F", "X"], // wrong count
            &["R", "F", "X", "Q"], // unknown name
            &["R", "F", "X", "X"], // duplicate
            &["F", "R", "X", "Y"], // reflector not in slot 0
            &["R", "R2", "X", "Y"], // second reflector
            &["R", "X", "Y", "Z"], // moving rotor in fixed slot
            &["R", "F", "F2", "Y"], // fixed rotor in moving slot
        ];
        for &names in cases {
            let mut m = small_machine();
            assert!(
                matches!(m.insert_rotors(names), Err(EnigmaError::RotorSelection(_))),
                "{names:?} should be rejected"
            );
            assert!(!m.is_configured());
        }
    }

    #[test]
    fn set_rotors_checks_length_and_symbols() {
        let mut m = small_machine();
        assert!(matches!(m.set_rotors("AAA"), Err(EnigmaError::Config(_))));

        m.insert_rotors(&["R", "F", "X", "Y"]).unwrap();
        assert!(matches!(m.set_rotors("AA"), Err(EnigmaError::Config(_))));
        assert!(matches!(m.set_rotors("AAAA"), Err(EnigmaError::Config(_))));
        assert_eq!(m.set_rotors("AAE"), Err(EnigmaError::Lookup('E')));
        // Fixed rotor in slot 1 only has position A.
        assert!(matches!(m.set_rotors("BAA"), Err(EnigmaError::Config(_))));
        assert_eq!(m.settings().unwrap(), "AAA");

        m.set_rotors("ACD").unwrap();
        assert_eq!(m.settings().unwrap(), "ACD");
    }

    #[test]
    fn rightmost_rotor_always_steps() {
        let mut m = small_machine();
        m.setup("* R F X Y AAA").unwrap();
        assert_eq!(m.advancing_slots(), [false, false, false, true]);
        m.convert(0).unwrap();
        assert_eq!(m.settings().unwrap(), "AAB");
    }

    #[test]
    fn notch_drives_left_neighbor() {
        let mut m = small_machine();
        // Y's notch is D.
        m.setup("* R F X Y AAD").unwrap();
        assert_eq!(m.advancing_slots(), [false, false, true, true]);
        m.convert(0).unwrap();
        assert_eq!(m.settings().unwrap(), "ABA");
    }

    #[test]
    fn zero_pawls_never_step() {
        let a = alphabet();
        let rotors = vec![
            Rotor::reflector("R", perm("(AB) (CD)", &a)),
            Rotor::fixed("F", perm("(ABC)", &a)),
        ];
        let mut m = Machine::new(a, 2, 0, rotors).unwrap();
        m.setup("* R F A").unwrap();
        for _ in 0..8 {
            m.convert(1).unwrap();
        }
        assert_eq!(m.settings().unwrap(), "A");
    }

    #[test]
    fn convert_before_setup_fails() {
        let mut m = small_machine();
        assert!(matches!(m.convert(0), Err(EnigmaError::Config(_))));
        assert!(matches!(
            m.convert_message("AB"),
            Err(EnigmaError::Config(_))
        ));
    }

    #[test]
    fn unknown_symbol_leaves_rotors_untouched() {
        let mut m = small_machine();
        m.setup("* R F X Y AAA").unwrap();
        assert_eq!(m.convert_message("ABQ"), Err(EnigmaError::Lookup('Q')));
        assert_eq!(m.settings().unwrap(), "AAA");
    }

    #[test]
    fn conversion_is_an_involution() {
        let mut m = small_machine();
        m.setup("* R F X Y ABC (AD)").unwrap();
        let cipher = m.convert_message("ABCD DCBA AAAA").unwrap();
        m.setup("* R F X Y ABC (AD)").unwrap();
        assert_eq!(m.convert_message(&cipher).unwrap(), "ABCDDCBAAAAA");
    }

    #[test]
    fn failed_setup_keeps_previous_state() {
        let mut m = small_machine();
        m.setup("* R F X Y ABC (AD)").unwrap();
        m.convert_message("AB").unwrap();
        let settings = m.settings().unwrap();

        assert!(m.setup("* R F X Q ABC").is_err());
        assert!(m.setup("* R F X Y ABCD").is_err());
        assert!(m.setup("* R F X Y ABC (AD").is_err());

        assert_eq!(m.rotor_names(), ["R", "F", "X", "Y"]);
        assert_eq!(m.settings().unwrap(), settings);
        assert_eq!(m.plugboard().to_string(), "(AD)");
    }

    #[test]
    fn plugboard_defaults_to_identity() {
        let mut m = small_machine();
        m.setup("* R F X Y AAA (BC)").unwrap();
        m.setup("* R F X Y AAA").unwrap();
        assert!(m.plugboard().cycles().is_empty());
    }
}
