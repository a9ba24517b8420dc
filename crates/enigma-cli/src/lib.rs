// enigma-cli: configuration loading, message framing and output grouping.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, bail};
use tracing::{debug, trace};

use enigma_machine::{Machine, MachineConfig};

/// Symbols per output group.
pub const GROUP_SIZE: usize = 5;

/// Read the configuration file at `path` and assemble a machine from it.
pub fn load_machine(path: &Path) -> anyhow::Result<Machine> {
    let text =
        fs::read_to_string(path).with_context(|| format!("could not open {}", path.display()))?;
    let config = MachineConfig::parse(&text)
        .with_context(|| format!("bad configuration in {}", path.display()))?;

    debug!(
        alphabet_size = config.alphabet.size(),
        slots = config.num_rotors,
        pawls = config.pawls,
        rotors = config.rotors.len(),
        "loaded configuration"
    );

    Ok(config.build()?)
}

/// Run every line of `input` through `machine`, writing results to `output`.
///
/// The first line must be a setup line, starting with `*`. After that, any
/// line containing `*` is a setup line from the `*` onward. Any other line
/// has its whitespace removed, is converted, and is written in groups of
/// [`GROUP_SIZE`].
pub fn process<R: BufRead, W: Write>(
    machine: &mut Machine,
    input: R,
    output: &mut W,
) -> anyhow::Result<()> {
    for (n, line) in input.lines().enumerate() {
        let line = line.context("failed to read input")?;
        let lineno = n + 1;

        let setup_at = if lineno == 1 {
            let start = line.len() - line.trim_start().len();
            line[start..].starts_with('*').then_some(start)
        } else {
            line.find('*')
        };

        if let Some(star) = setup_at {
            machine
                .setup(&line[star..])
                .with_context(|| format!("line {lineno}: invalid setup"))?;
            debug!(lineno, rotors = ?machine.rotor_names(), "applied setup");
        } else if !machine.is_configured() {
            bail!("line {lineno}: input must begin with a setup line");
        } else {
            let converted = machine
                .convert_message(&line)
                .with_context(|| format!("line {lineno}: cannot convert message"))?;
            trace!(
                lineno,
                symbols = converted.chars().count(),
                "converted line"
            );
            writeln!(output, "{}", group_symbols(&converted)).context("failed to write output")?;
        }
    }
    output.flush().context("failed to write output")?;
    Ok(())
}

/// Split `msg` into groups of [`GROUP_SIZE`] symbols separated by single
/// spaces. The last group may be shorter.
pub fn group_symbols(msg: &str) -> String {
    let mut grouped = String::with_capacity(msg.len() + msg.len() / GROUP_SIZE);
    for (i, c) in msg.chars().enumerate() {
        if i > 0 && i % GROUP_SIZE == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    std::process::exit(1);
}
