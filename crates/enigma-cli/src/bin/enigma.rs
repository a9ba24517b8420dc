// enigma: encrypt and decrypt messages with a configured rotor machine.
//
// Reads the machine configuration from CONFIG, then processes INPUT (or
// stdin) line by line: lines starting with '*' set the machine up, every
// other line is converted and printed in groups of five symbols to OUTPUT
// (or stdout).
//
// Usage:
//   enigma CONFIG [INPUT] [OUTPUT]
//
// Set RUST_LOG=debug to trace configuration loading and setups on stderr.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Rotor cipher machine simulator.
#[derive(Parser, Debug)]
#[command(name = "enigma", version, about)]
struct Cli {
    /// Machine configuration file.
    config: PathBuf,
    /// Message file (default: standard input).
    input: Option<PathBuf>,
    /// Output file (default: standard output).
    output: Option<PathBuf>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut machine = enigma_cli::load_machine(&cli.config)?;

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    enigma_cli::process(&mut machine, input, &mut output)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        enigma_cli::fatal(&format!("{e:#}"));
    }
}
