//! Driver: batch session controller.
//!
//! Consumes an input stream of settings lines and message lines, feeds the
//! messages through a [`Machine`] and writes the results grouped in blocks
//! of five symbols:
//!
//! ```text
//! * B BETA III IV I AXLE (YF) (ZH)
//! FROM HIS SHOULDER HIAWATHA
//! ```
//!
//! A settings line opens with `*` and carries one rotor name per slot
//! (reflector first), the initial offset symbols, and optional plugboard
//! cycles; it may appear again mid-stream to re-configure the machine.
//! Message lines are stripped of whitespace and ASCII-upcased before
//! encoding; blank lines pass through untouched.

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Error;
use crate::machine::Machine;
use crate::permutation::Permutation;

/// Symbols per output group.
const GROUP: usize = 5;

/// Processes a whole input stream against `catalog`, writing one output line
/// per input line.
///
/// # Errors
/// [`Error::BadSettingLine`] for a message before any settings line or a
/// settings line with the wrong shape; any configure or encode error from
/// the machine; [`Error::Io`] for stream failures. The first error aborts
/// the batch.
pub fn run<R: BufRead, W: Write>(
    catalog: &Arc<Catalog>,
    input: R,
    output: &mut W,
) -> Result<(), Error> {
    let mut machine = Machine::new(catalog.clone());
    let mut configured = false;
    let mut messages = 0usize;

    for line in input.lines() {
        let line = line?;
        if line.trim_start().starts_with('*') {
            let (names, setting, plugboard) = parse_settings(catalog, &line)?;
            let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
            machine.configure(&name_refs, &setting, plugboard)?;
            configured = true;
        } else if line.trim().is_empty() {
            writeln!(output)?;
        } else {
            if !configured {
                return Err(Error::BadSettingLine {
                    reason: "message before any settings line".to_string(),
                });
            }
            let msg: String = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_ascii_uppercase())
                .collect();
            let encoded = machine.encode_message(&msg)?;
            writeln!(output, "{}", group_symbols(&encoded))?;
            messages += 1;
        }
    }

    debug!(messages, "batch complete");
    Ok(())
}

/// Splits a settings line into rotor names, setting string and plugboard.
fn parse_settings(
    catalog: &Arc<Catalog>,
    line: &str,
) -> Result<(Vec<String>, String, Permutation), Error> {
    let body = line.trim_start().strip_prefix('*').expect("settings line");
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let num_slots = catalog.num_slots();
    if tokens.len() < num_slots + 1 {
        return Err(Error::BadSettingLine {
            reason: format!(
                "expected {} rotor names and a setting, got {} tokens",
                num_slots,
                tokens.len()
            ),
        });
    }

    let names: Vec<String> = tokens[..num_slots].iter().map(|s| s.to_string()).collect();
    let setting = tokens[num_slots].to_string();
    let plug_cycles = tokens[num_slots + 1..].join(" ");
    let plugboard = Permutation::new(&plug_cycles, catalog.alphabet().clone())?;
    Ok((names, setting, plugboard))
}

/// Groups `symbols` into blocks of five separated by single spaces; the last
/// block may be shorter.
fn group_symbols(symbols: &str) -> String {
    let chars: Vec<char> = symbols.chars().collect();
    chars
        .chunks(GROUP)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    const SMALL: &str = "\
ABCD
3 1
 R1 R (AB) (CD)
 F  N (AC)
 M1 MA (ABCD)
";

    fn run_on(input: &str) -> Result<String, Error> {
        let catalog = config::load(SMALL).unwrap();
        let mut out = Vec::new();
        run(&catalog, input.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_driver_matches_machine() {
        let catalog = config::load(SMALL).unwrap();
        let mut machine = Machine::new(catalog.clone());
        machine
            .configure(
                &["R1", "F", "M1"],
                "AB",
                Permutation::identity(catalog.alphabet().clone()),
            )
            .unwrap();
        let expected = machine.encode_message("ABCD").unwrap();

        let out = run_on("* R1 F M1 AB\nABCD\n").unwrap();
        assert_eq!(out, format!("{expected}\n"));
    }

    #[test]
    fn test_messages_are_upcased_and_stripped() {
        let upper = run_on("* R1 F M1 AB\nABCD\n").unwrap();
        let messy = run_on("* R1 F M1 AB\n a bc d\n").unwrap();
        assert_eq!(upper, messy);
    }

    #[test]
    fn test_output_grouped_in_fives() {
        let out = run_on("* R1 F M1 AB\nABCDABCDABCDA\n").unwrap();
        let line = out.trim_end();
        let groups: Vec<&str> = line.split(' ').collect();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].len(), 5);
        assert_eq!(groups[1].len(), 5);
        assert_eq!(groups[2].len(), 3);
    }

    #[test]
    fn test_blank_lines_pass_through() {
        let out = run_on("* R1 F M1 AB\nAB\n\nAB\n").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_empty());
    }

    #[test]
    fn test_reconfiguration_resets_state() {
        // The same settings line twice must encode the same message the
        // same way both times.
        let out = run_on("* R1 F M1 AB\nABCD\n* R1 F M1 AB\nABCD\n").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], lines[1]);
    }

    #[test]
    fn test_decode_round_trip() {
        let catalog = config::load(SMALL).unwrap();
        let mut machine = Machine::new(catalog.clone());
        machine
            .configure(
                &["R1", "F", "M1"],
                "BC",
                Permutation::identity(catalog.alphabet().clone()),
            )
            .unwrap();
        let cipher = machine.encode_message("DCBA").unwrap();

        let input = format!("* R1 F M1 BC\n{cipher}\n");
        let out = run_on(&input).unwrap();
        assert_eq!(out.trim_end().replace(' ', ""), "DCBA");
    }

    #[test]
    fn test_message_before_settings_rejected() {
        assert!(matches!(
            run_on("ABCD\n"),
            Err(Error::BadSettingLine { .. })
        ));
    }

    #[test]
    fn test_short_settings_line_rejected() {
        assert!(matches!(
            run_on("* R1 F M1\nAB\n"),
            Err(Error::BadSettingLine { .. })
        ));
    }

    #[test]
    fn test_unknown_rotor_in_settings_rejected() {
        assert!(matches!(
            run_on("* R1 F M9 AB\nAB\n"),
            Err(Error::UnknownRotorName { .. })
        ));
    }

    #[test]
    fn test_settings_with_plugboard() {
        let catalog = config::load(SMALL).unwrap();
        let mut machine = Machine::new(catalog.clone());
        machine
            .configure(
                &["R1", "F", "M1"],
                "AB",
                Permutation::new("(AD)", catalog.alphabet().clone()).unwrap(),
            )
            .unwrap();
        let expected = machine.encode_message("ABCD").unwrap();

        let out = run_on("* R1 F M1 AB (AD)\nABCD\n").unwrap();
        assert_eq!(out.trim_end(), expected);
    }

    #[test]
    fn test_symbol_outside_alphabet_aborts_batch() {
        assert!(matches!(
            run_on("* R1 F M1 AB\nABCZ\n"),
            Err(Error::SymbolNotInAlphabet { symbol: 'Z' })
        ));
    }
}
