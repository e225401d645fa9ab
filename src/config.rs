//! Configuration loader: text catalog format.
//!
//! The format describes one machine model:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ        alphabet symbols
//! 5 3                               slot count, pawl count
//!  I MQ  (AELTPHQXRU) (BKNW) ...    one rotor per line: NAME TAG CYCLES
//!  Beta N (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B R   (AE) (BN) (CK) ...
//!        (WZ)                       a line opening with '(' continues
//! ```
//!
//! The tag is `R` (reflector), `N` (fixed) or `M` followed by the notch
//! symbols (moving, e.g. `MZM`). Everything is parsed in a single pass over
//! the lines; each failure names the offending line or value.

use std::sync::Arc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::catalog::Catalog;
use crate::error::Error;
use crate::permutation::Permutation;
use crate::rotor::{RotorKind, RotorSpec};

/// Parses configuration text into a shared catalog.
///
/// # Errors
/// [`Error::TruncatedConfig`] if the alphabet line, count line or rotor
/// descriptions are missing or unreadable; [`Error::BadRotorDescription`] for
/// an unusable rotor line; [`Error::MalformedPermutation`],
/// [`Error::MalformedAlphabet`], [`Error::SymbolNotInAlphabet`] and
/// [`Error::RotorPlacement`] as raised by the components being built.
pub fn load(text: &str) -> Result<Arc<Catalog>, Error> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let alphabet_line = lines.next().ok_or_else(|| Error::TruncatedConfig {
        reason: "missing alphabet line".to_string(),
    })?;
    let alphabet = Arc::new(Alphabet::new(alphabet_line.trim())?);

    let counts_line = lines.next().ok_or_else(|| Error::TruncatedConfig {
        reason: "missing slot/pawl count line".to_string(),
    })?;
    let (num_slots, num_pawls) = parse_counts(counts_line)?;

    // First pass over the remaining lines: gather (name, tag, cycles) with
    // '('-continuations folded into the entry they extend.
    let mut raw: Vec<(String, String, String)> = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.starts_with('(') {
            let last = raw.last_mut().ok_or_else(|| Error::TruncatedConfig {
                reason: "cycle continuation before any rotor description".to_string(),
            })?;
            last.2.push(' ');
            last.2.push_str(trimmed);
            continue;
        }
        let mut tokens = trimmed.split_whitespace();
        let name = tokens.next().expect("non-empty line").to_string();
        let tag = tokens
            .next()
            .ok_or_else(|| Error::BadRotorDescription {
                name: name.clone(),
                reason: "missing type tag".to_string(),
            })?
            .to_string();
        let cycles = tokens.collect::<Vec<_>>().join(" ");
        raw.push((name, tag, cycles));
    }
    if raw.is_empty() {
        return Err(Error::TruncatedConfig {
            reason: "no rotor descriptions".to_string(),
        });
    }

    let mut specs = Vec::with_capacity(raw.len());
    for (name, tag, cycles) in raw {
        let wiring = Permutation::new(&cycles, alphabet.clone())?;
        let kind = parse_kind(&name, &tag, &alphabet)?;
        specs.push(RotorSpec::new(&name, wiring, kind)?);
    }

    let catalog = Catalog::new(alphabet, num_slots, num_pawls, specs)?;
    debug!(
        symbols = catalog.alphabet().size(),
        slots = catalog.num_slots(),
        pawls = catalog.num_pawls(),
        rotors = catalog.entries().len(),
        "catalog loaded"
    );
    Ok(Arc::new(catalog))
}

/// Parses the `slots pawls` line.
fn parse_counts(line: &str) -> Result<(usize, usize), Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [slots, pawls] = tokens[..] else {
        return Err(Error::TruncatedConfig {
            reason: format!("expected 'SLOTS PAWLS', got '{}'", line.trim()),
        });
    };
    let parse = |tok: &str| {
        tok.parse::<usize>().map_err(|_| Error::TruncatedConfig {
            reason: format!("'{tok}' is not a count"),
        })
    };
    Ok((parse(slots)?, parse(pawls)?))
}

/// Interprets a rotor type tag.
fn parse_kind(name: &str, tag: &str, alphabet: &Arc<Alphabet>) -> Result<RotorKind, Error> {
    let mut chars = tag.chars();
    let lead = chars.next().expect("tag token is non-empty");
    let rest: String = chars.collect();
    match lead {
        'M' => {
            let notches = rest
                .chars()
                .map(|c| alphabet.to_index(c))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RotorKind::Moving { notches })
        }
        'N' | 'R' if !rest.is_empty() => Err(Error::BadRotorDescription {
            name: name.to_string(),
            reason: format!("unexpected characters after '{lead}' tag: '{rest}'"),
        }),
        'N' => Ok(RotorKind::Fixed),
        'R' => Ok(RotorKind::Reflector),
        other => Err(Error::BadRotorDescription {
            name: name.to_string(),
            reason: format!("unknown rotor type tag '{other}'"),
        }),
    }
}
