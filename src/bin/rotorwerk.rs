//! Command-line front end: configure a machine from a catalog file and run
//! message batches through it.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rotorwerk::{config, driver};

/// Rotor-cipher machine emulator.
#[derive(Parser, Debug)]
#[command(name = "rotorwerk")]
#[command(author, version, about = "Rotor-cipher machine emulator", long_about = None)]
struct Cli {
    /// Machine configuration file (alphabet, slot/pawl counts, rotor catalog)
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Input file of settings and message lines; standard input if omitted
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file for processed messages; standard output if omitted
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_text = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("could not open {}", cli.config.display()))?;
    let catalog = config::load(&config_text)
        .with_context(|| format!("bad configuration in {}", cli.config.display()))?;

    let mut output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match &cli.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("could not open {}", path.display()))?;
            driver::run(&catalog, BufReader::new(file), &mut output)?;
        }
        None => {
            driver::run(&catalog, io::stdin().lock(), &mut output)?;
        }
    }
    output.flush()?;
    Ok(())
}
