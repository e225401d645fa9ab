//! Catalog: the shared, read-only bank of rotor wirings for one machine model.
//!
//! A catalog pairs an alphabet and the machine geometry (slot and pawl
//! counts) with every rotor available to it. It is assembled once by the
//! configuration loader, validated at construction, and never mutated
//! afterwards, so any number of machines may share one catalog, including
//! from different threads. Per-session state (which wiring occupies which
//! slot, current offsets) lives in the machine, never here.

use std::collections::HashMap;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::Error;
use crate::rotor::RotorSpec;

/// Immutable rotor-wiring bank plus machine geometry.
#[derive(Debug)]
pub struct Catalog {
    alphabet: Arc<Alphabet>,
    num_slots: usize,
    num_pawls: usize,
    entries: Vec<Arc<RotorSpec>>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Assembles a catalog.
    ///
    /// # Parameters
    /// - `alphabet`: the common alphabet of all wirings.
    /// - `num_slots`: rotor slots per machine; must exceed 2.
    /// - `num_pawls`: count of rightmost steppable slots; must be below
    ///   `num_slots`.
    /// - `specs`: every available rotor.
    ///
    /// # Errors
    /// Returns [`Error::RotorPlacement`] for an impossible geometry and
    /// [`Error::BadRotorDescription`] for duplicate names (compared
    /// case-insensitively) or a wiring over a different alphabet.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_slots: usize,
        num_pawls: usize,
        specs: Vec<RotorSpec>,
    ) -> Result<Self, Error> {
        if num_slots <= 2 {
            return Err(Error::RotorPlacement {
                reason: format!("machine needs more than 2 rotor slots, got {num_slots}"),
            });
        }
        if num_pawls >= num_slots {
            return Err(Error::RotorPlacement {
                reason: format!(
                    "pawl count {num_pawls} must be below slot count {num_slots}"
                ),
            });
        }

        let mut entries = Vec::with_capacity(specs.len());
        let mut by_name = HashMap::with_capacity(specs.len());
        for spec in specs {
            if *spec.wiring().alphabet().as_ref() != *alphabet.as_ref() {
                return Err(Error::BadRotorDescription {
                    name: spec.name().to_string(),
                    reason: "wiring is over a different alphabet".to_string(),
                });
            }
            let key = spec.name().to_uppercase();
            if by_name.contains_key(&key) {
                return Err(Error::BadRotorDescription {
                    name: spec.name().to_string(),
                    reason: "duplicate rotor name".to_string(),
                });
            }
            by_name.insert(key, entries.len());
            entries.push(Arc::new(spec));
        }

        Ok(Catalog {
            alphabet,
            num_slots,
            num_pawls,
            entries,
            by_name,
        })
    }

    /// Returns the common alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the number of rotor slots per machine.
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Returns the number of pawls (rightmost steppable slots).
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns every catalog entry, in load order.
    pub fn entries(&self) -> &[Arc<RotorSpec>] {
        &self.entries
    }

    /// Looks a rotor up by name, case-insensitively.
    ///
    /// # Errors
    /// Returns [`Error::UnknownRotorName`] if no entry matches. Callers must
    /// treat this as a hard error; an unresolved slot is never skipped.
    pub fn lookup(&self, name: &str) -> Result<&Arc<RotorSpec>, Error> {
        self.by_name
            .get(&name.to_uppercase())
            .map(|&i| &self.entries[i])
            .ok_or_else(|| Error::UnknownRotorName {
                name: name.to_string(),
            })
    }
}
