// Machine configuration and setup-line parsing.
//
// Configuration text:
//
//   ABCDEFGHIJKLMNOPQRSTUVWXYZ        alphabet
//   5 3                               slot count, pawl count
//   I MQ  (AELTPHQXRU) (BKNW) ...     rotor descriptors: name, type tag, cycles
//   B R   (AE) (BN) (CK) ...
//         (RX) (SZ) (TV)              a line starting with '(' continues the
//                                     previous descriptor
//
// Type tags: `M<notches>` (moving), `N` (fixed), `R` (reflector).
//
// Setup line:
//
//   * B Beta I II III AAAA (AB) (CD)
//
// N rotor names (reflector first), a setting of N-1 symbols, and optional
// plugboard cycles.

use std::sync::Arc;

use enigma_core::{Alphabet, EnigmaError, Permutation};

use crate::machine::Machine;
use crate::rotor::Rotor;

/// Parsed machine configuration: everything needed to build a [`Machine`].
#[derive(Debug, Clone)]
pub struct MachineConfig {
    pub alphabet: Arc<Alphabet>,
    pub num_rotors: usize,
    pub pawls: usize,
    /// Every rotor defined by the configuration, in definition order.
    pub rotors: Vec<Rotor>,
}

impl MachineConfig {
    /// Parse configuration text.
    ///
    /// The first three whitespace-separated tokens are the alphabet, the slot
    /// count and the pawl count; anything else on the line holding the pawl
    /// count is ignored. Every following non-blank line is a rotor descriptor.
    pub fn parse(text: &str) -> Result<Self, EnigmaError> {
        let mut lines = text.lines();

        let mut header: Vec<&str> = Vec::with_capacity(3);
        while header.len() < 3 {
            let line = lines.next().ok_or_else(|| {
                EnigmaError::Config(
                    "configuration truncated: expected alphabet, slot count and pawl count"
                        .to_string(),
                )
            })?;
            header.extend(line.split_whitespace().take(3 - header.len()));
        }

        let alphabet = Arc::new(Alphabet::new(header[0])?);
        let num_rotors = parse_count(header[1], "slot count")?;
        let pawls = parse_count(header[2], "pawl count")?;

        let rotors = join_descriptors(lines)?
            .iter()
            .map(|descriptor| parse_rotor(descriptor, &alphabet))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            alphabet,
            num_rotors,
            pawls,
            rotors,
        })
    }

    /// Assemble a machine from this configuration.
    pub fn build(self) -> Result<Machine, EnigmaError> {
        Machine::new(self.alphabet, self.num_rotors, self.pawls, self.rotors)
    }
}

fn parse_count(token: &str, what: &str) -> Result<usize, EnigmaError> {
    token
        .parse()
        .map_err(|_| EnigmaError::Config(format!("invalid {what}: {token:?}")))
}

/// Group descriptor lines, appending continuation lines (starting with `(`)
/// to the descriptor before them.
fn join_descriptors<'a>(lines: impl Iterator<Item = &'a str>) -> Result<Vec<String>, EnigmaError> {
    let mut descriptors: Vec<String> = Vec::new();
    for line in lines.map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with('(') {
            let previous = descriptors.last_mut().ok_or_else(|| {
                EnigmaError::Config(format!(
                    "cycle continuation {line:?} does not follow a rotor descriptor"
                ))
            })?;
            previous.push(' ');
            previous.push_str(line);
        } else {
            descriptors.push(line.to_string());
        }
    }
    Ok(descriptors)
}

/// Split off the first whitespace-delimited token of `s`.
///
/// Returns `None` if `s` holds only whitespace.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

/// Parse one rotor descriptor, `name type-tag cycles`, into a rotor.
pub fn parse_rotor(descriptor: &str, alphabet: &Arc<Alphabet>) -> Result<Rotor, EnigmaError> {
    let (name, rest) = split_token(descriptor)
        .ok_or_else(|| EnigmaError::Config("empty rotor descriptor".to_string()))?;
    let (tag, cycles) = split_token(rest)
        .ok_or_else(|| EnigmaError::Config(format!("rotor {name} has no type tag")))?;

    let permutation = Permutation::new(cycles, Arc::clone(alphabet))?;
    let mut tag_chars = tag.chars();
    match (tag_chars.next(), tag_chars.as_str()) {
        (Some('M'), notches) => Rotor::moving(name, permutation, notches),
        (Some('N'), "") => Ok(Rotor::fixed(name, permutation)),
        (Some('R'), "") => Ok(Rotor::reflector(name, permutation)),
        _ => Err(EnigmaError::Config(format!(
            "rotor {name} has invalid type tag {tag:?} (expected M<notches>, N or R)"
        ))),
    }
}

/// A parsed setup line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupLine {
    /// Rotor names, reflector first.
    pub rotors: Vec<String>,
    /// Initial settings of the non-reflector rotors, left to right.
    pub setting: String,
    /// Plugboard cycles; `None` means the identity.
    pub plugboard: Option<String>,
}

impl SetupLine {
    /// Parse `* name{num_rotors} setting [plugboard-cycles]`.
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self, EnigmaError> {
        let mut rest = line
            .trim_start()
            .strip_prefix('*')
            .ok_or_else(|| {
                EnigmaError::Config(format!("setup line {line:?} must start with '*'"))
            })?;

        let mut rotors = Vec::with_capacity(num_rotors);
        while rotors.len() < num_rotors {
            let (name, tail) = split_token(rest).ok_or_else(|| {
                EnigmaError::Config(format!(
                    "setup line names {} of {num_rotors} rotors",
                    rotors.len()
                ))
            })?;
            rotors.push(name.to_string());
            rest = tail;
        }

        let (setting, tail) = split_token(rest)
            .ok_or_else(|| EnigmaError::Config("setup line has no rotor setting".to_string()))?;
        let plugboard = Some(tail.trim())
            .filter(|cycles| !cycles.is_empty())
            .map(str::to_string);

        Ok(Self {
            rotors,
            setting: setting.to_string(),
            plugboard,
        })
    }
}
