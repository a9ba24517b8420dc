//! Rotor cipher machine engine.
//!
//! Models an electromechanical rotor cipher: every symbol passes through a
//! plugboard, a stack of rotors from right to left, a reflector, the rotors
//! again from left to right, and the plugboard again. The rotor stack steps
//! before every symbol, reproducing the double-step of the middle rotor.
//!
//! # Architecture
//!
//! - [`rotor`] -- moving rotors, fixed rotors and reflectors
//! - [`machine`] -- slot placement, stepping and the signal path
//! - [`config`] -- configuration text and setup-line parsing
//!
//! # Examples
//!
//! ```
//! use enigma_machine::MachineConfig;
//!
//! let config = "\
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//! I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! II ME     (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
//! III MV    (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//! Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!           (RX) (SZ) (TV)
//! ";
//!
//! let mut machine = MachineConfig::parse(config).unwrap().build().unwrap();
//! machine.setup("* B Beta I II III AAAA").unwrap();
//! assert_eq!(machine.convert_message("HELLO WORLD").unwrap(), "ILBDAAMTAZ");
//! ```

pub mod config;
pub mod machine;
pub mod rotor;

pub use config::{MachineConfig, SetupLine};
pub use machine::Machine;
pub use rotor::{Rotor, RotorKind};

pub use enigma_core::{Alphabet, EnigmaError, Permutation};
