//! Machine: the rotor stack orchestrator.
//!
//! Owns the per-keystroke stepping algorithm and the forward/backward signal
//! path. A machine is bound to one shared [`Catalog`]; a call to
//! [`configure`](Machine::configure) creates a fresh session (which wiring
//! occupies which slot, each rotor's offset, the plugboard), and every
//! encoded symbol mutates the session offsets as a side effect.
//!
//! # Stepping
//!
//! All advance decisions for one keystroke are computed from the pre-step
//! offsets and then applied together:
//!
//! - the rightmost rotor always advances;
//! - every other steppable rotor advances iff its right neighbor sits on one
//!   of its own notches, or the rotor itself sits on one of its own notches.
//!
//! The second clause is the double-stepping anomaly of the historical
//! device: a rotor stopped exactly on its notch steps again on the next
//! keystroke, together with its left neighbor. Verified against published
//! machine vectors in the integration suites.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Error;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// A complete rotor-cipher machine bound to a shared wiring catalog.
pub struct Machine {
    catalog: Arc<Catalog>,
    session: Option<Session>,
}

/// Per-session mutable state: installed rotors and plugboard.
#[derive(Clone)]
struct Session {
    rotors: Vec<Rotor>,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine with no configured session.
    ///
    /// [`configure`](Machine::configure) must succeed once before any
    /// encoding call.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Machine {
            catalog,
            session: None,
        }
    }

    /// Returns the catalog this machine draws rotors from.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Returns the number of rotor slots.
    pub fn num_slots(&self) -> usize {
        self.catalog.num_slots()
    }

    /// Returns the number of pawls (rightmost steppable slots).
    pub fn num_pawls(&self) -> usize {
        self.catalog.num_pawls()
    }

    /// Returns the current offset of every slot, leftmost first.
    ///
    /// # Errors
    /// Returns [`Error::NotConfigured`] before the first successful
    /// configure call.
    pub fn offsets(&self) -> Result<Vec<usize>, Error> {
        let session = self.session.as_ref().ok_or(Error::NotConfigured)?;
        Ok(session.rotors.iter().map(|r| r.offset()).collect())
    }

    /// Binds wirings to slots and starts a fresh session.
    ///
    /// The previous session, if any, is replaced only after every check has
    /// passed: a failed configure leaves existing state untouched.
    ///
    /// # Parameters
    /// - `names`: one catalog name per slot, reflector first.
    /// - `setting`: initial offset symbols for slots `1..`, left rotor's
    ///   symbol first; the reflector always starts at 0.
    /// - `plugboard`: permutation applied at machine input and output.
    ///
    /// # Errors
    /// [`Error::UnknownRotorName`] for a name outside the catalog (a hard
    /// error, never skipped), [`Error::RotorPlacement`] for a wrong kind in
    /// any slot or a rotor used twice, [`Error::SettingLengthMismatch`] or
    /// [`Error::SymbolNotInAlphabet`] for a bad setting string, and
    /// [`Error::BadSettingLine`] for a plugboard over a foreign alphabet.
    pub fn configure(
        &mut self,
        names: &[&str],
        setting: &str,
        plugboard: Permutation,
    ) -> Result<(), Error> {
        let num_slots = self.catalog.num_slots();
        let num_pawls = self.catalog.num_pawls();
        if names.len() != num_slots {
            return Err(Error::RotorPlacement {
                reason: format!("expected {num_slots} rotor names, got {}", names.len()),
            });
        }
        if *plugboard.alphabet().as_ref() != *self.catalog.alphabet().as_ref() {
            return Err(Error::BadSettingLine {
                reason: "plugboard is over a different alphabet".to_string(),
            });
        }

        let mut rotors = Vec::with_capacity(num_slots);
        for (slot, name) in names.iter().enumerate() {
            let spec = self.catalog.lookup(name)?;
            if rotors
                .iter()
                .any(|r: &Rotor| r.name().eq_ignore_ascii_case(spec.name()))
            {
                return Err(Error::RotorPlacement {
                    reason: format!("rotor '{}' used in more than one slot", spec.name()),
                });
            }
            let first_steppable = num_slots - num_pawls;
            match slot {
                0 if !spec.reflecting() => {
                    return Err(Error::RotorPlacement {
                        reason: format!("slot 0 must hold a reflector, got '{}'", spec.name()),
                    });
                }
                s if s > 0 && spec.reflecting() => {
                    return Err(Error::RotorPlacement {
                        reason: format!("reflector '{}' outside slot 0", spec.name()),
                    });
                }
                s if s > 0 && s < first_steppable && spec.rotates() => {
                    return Err(Error::RotorPlacement {
                        reason: format!(
                            "moving rotor '{}' in non-stepping slot {s}",
                            spec.name()
                        ),
                    });
                }
                s if s >= first_steppable && !spec.rotates() => {
                    return Err(Error::RotorPlacement {
                        reason: format!(
                            "slot {s} must hold a moving rotor, got '{}'",
                            spec.name()
                        ),
                    });
                }
                _ => {}
            }
            rotors.push(Rotor::new(spec.clone()));
        }

        let setting_len = setting.chars().count();
        if setting_len != num_slots - 1 {
            return Err(Error::SettingLengthMismatch {
                setting: setting.to_string(),
                expected: num_slots - 1,
                actual: setting_len,
            });
        }
        for (rotor, symbol) in rotors[1..].iter_mut().zip(setting.chars()) {
            let offset = self.catalog.alphabet().to_index(symbol)?;
            rotor.set_offset(offset)?;
        }

        debug!(rotors = ?names, setting, "configured session");
        self.session = Some(Session { rotors, plugboard });
        Ok(())
    }

    /// Encodes one symbol index, advancing the rotors first.
    ///
    /// # Errors
    /// [`Error::NotConfigured`] without a session, [`Error::IndexOutOfRange`]
    /// for an index outside `[0, N)`. A failed call does not move any rotor.
    pub fn encode_one(&mut self, index: usize) -> Result<usize, Error> {
        let size = self.catalog.alphabet().size();
        let num_pawls = self.catalog.num_pawls();
        let session = self.session.as_mut().ok_or(Error::NotConfigured)?;
        if index >= size {
            return Err(Error::IndexOutOfRange { index, size });
        }
        session.advance_rotors(num_pawls);
        Ok(session.convert(index))
    }

    /// Encodes a symbol sequence, carrying rotor state across symbols.
    ///
    /// The whole message is checked against the alphabet before the first
    /// rotor moves, so a failing call leaves the session exactly as it was.
    /// Whitespace handling and output grouping are the caller's concern;
    /// every character of `msg` must be an alphabet symbol.
    ///
    /// # Errors
    /// [`Error::NotConfigured`] without a session,
    /// [`Error::SymbolNotInAlphabet`] for any character outside the alphabet.
    pub fn encode_message(&mut self, msg: &str) -> Result<String, Error> {
        if self.session.is_none() {
            return Err(Error::NotConfigured);
        }
        let alphabet = self.catalog.alphabet().clone();
        let indices = msg
            .chars()
            .map(|c| alphabet.to_index(c))
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = String::with_capacity(indices.len());
        for index in indices {
            let encoded = self.encode_one(index)?;
            out.push(alphabet.to_symbol(encoded)?);
        }
        Ok(out)
    }
}

impl Session {
    /// Advances the steppable suffix for one keystroke.
    ///
    /// Decisions are taken from pre-step offsets only: the loop reads slots
    /// `i` and `i+1` before slot `i` moves, and the rightmost rotor moves
    /// last, so no advance in this keystroke influences another decision.
    fn advance_rotors(&mut self, num_pawls: usize) {
        if num_pawls == 0 {
            return;
        }
        let last = self.rotors.len() - 1;
        let first = self.rotors.len() - num_pawls;
        for i in first..last {
            if self.rotors[i + 1].is_at_own_notch() || self.rotors[i].is_at_own_notch() {
                self.rotors[i].advance();
            }
        }
        self.rotors[last].advance();
    }

    /// Runs one index through plugboard, rotor stack, reflector and back.
    fn convert(&self, index: usize) -> usize {
        let mut c = self.plugboard.permute(index);
        for rotor in self.rotors.iter().rev() {
            c = rotor.convert_forward(c);
        }
        for rotor in &self.rotors[1..] {
            c = rotor.convert_backward(c);
        }
        self.plugboard.permute(c)
    }
}
