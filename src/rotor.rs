//! Rotor: a fixed wiring permutation combined with a rotating offset.
//!
//! The three historical rotor kinds differ only in stepping capability, so
//! they are one tagged type instead of a class hierarchy: `Moving` carries
//! notch positions, `Fixed` never steps, `Reflector` never steps and its
//! wiring must be a derangement. Wiring and kind live in a [`RotorSpec`]
//! catalog entry that is immutable and shared by reference; the per-session
//! [`Rotor`] pairs a spec with its own mutable offset, so re-configuring one
//! machine can never leak rotational state into another.
//!
//! Rotors never decide their own stepping. The two notch predicates are
//! read-only inputs to the machine's per-keystroke stepping decision.

use std::sync::Arc;

use crate::error::Error;
use crate::permutation::Permutation;

/// Stepping capability of a rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Steppable rotor; `notches` are the offsets at which its ratchet can
    /// drive the neighbor to its left.
    Moving { notches: Vec<usize> },
    /// Rotor that holds a fixed rotational position for a whole session.
    Fixed,
    /// Non-stepping rotor that turns the signal back through the stack;
    /// its wiring has no fixed points.
    Reflector,
}

/// Immutable catalog entry: a named wiring with its stepping capability.
///
/// Specs are loaded once by the configuration loader and shared read-only
/// between any number of machines.
#[derive(Debug, Clone)]
pub struct RotorSpec {
    name: String,
    wiring: Permutation,
    kind: RotorKind,
}

impl RotorSpec {
    /// Builds a catalog entry, validating the wiring against the kind.
    ///
    /// # Errors
    /// Returns [`Error::BadRotorDescription`] if a reflector wiring has a
    /// fixed point, and [`Error::IndexOutOfRange`] if a notch position is
    /// outside the alphabet.
    pub fn new(name: &str, wiring: Permutation, kind: RotorKind) -> Result<Self, Error> {
        match &kind {
            RotorKind::Reflector => {
                if !wiring.derangement() {
                    return Err(Error::BadRotorDescription {
                        name: name.to_string(),
                        reason: "reflector wiring is not a derangement".to_string(),
                    });
                }
            }
            RotorKind::Moving { notches } => {
                for &notch in notches {
                    if notch >= wiring.size() {
                        return Err(Error::IndexOutOfRange {
                            index: notch,
                            size: wiring.size(),
                        });
                    }
                }
            }
            RotorKind::Fixed => {}
        }
        Ok(RotorSpec {
            name: name.to_string(),
            wiring,
            kind,
        })
    }

    /// Returns the rotor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wiring permutation at offset 0.
    pub fn wiring(&self) -> &Permutation {
        &self.wiring
    }

    /// Returns the stepping capability.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns true iff this rotor has a ratchet and can step.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns true iff this rotor reflects.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }
}

/// A rotor installed in a machine slot: shared spec plus session-owned offset.
#[derive(Debug, Clone)]
pub struct Rotor {
    spec: Arc<RotorSpec>,
    offset: usize,
}

impl Rotor {
    /// Installs `spec` at offset 0.
    pub fn new(spec: Arc<RotorSpec>) -> Self {
        Rotor { spec, offset: 0 }
    }

    /// Returns the catalog entry this rotor was installed from.
    pub fn spec(&self) -> &Arc<RotorSpec> {
        &self.spec
    }

    /// Returns the rotor name.
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Returns the current rotational offset, in `[0, N)`.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Sets the rotational offset.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `offset` is not in `[0, N)`.
    pub fn set_offset(&mut self, offset: usize) -> Result<(), Error> {
        let n = self.spec.wiring().size();
        if offset >= n {
            return Err(Error::IndexOutOfRange {
                index: offset,
                size: n,
            });
        }
        self.offset = offset;
        Ok(())
    }

    /// Advances the offset by one position, wrapping at the alphabet size.
    pub(crate) fn advance(&mut self) {
        self.offset = (self.offset + 1) % self.spec.wiring().size();
    }

    /// Converts `p` through the wiring, entering from the right.
    ///
    /// The rotational offset shifts the contact both on entry and on exit:
    /// `wrap(permute(wrap(p + offset)) - offset)`.
    pub fn convert_forward(&self, p: usize) -> usize {
        let w = self.spec.wiring();
        let contact = w.wrap(p as i32 + self.offset as i32);
        w.wrap(w.permute(contact) as i32 - self.offset as i32)
    }

    /// Converts `e` through the inverse wiring, entering from the left.
    pub fn convert_backward(&self, e: usize) -> usize {
        let w = self.spec.wiring();
        let contact = w.wrap(e as i32 + self.offset as i32);
        w.wrap(w.invert(contact) as i32 - self.offset as i32)
    }

    /// Returns true iff the offset sits exactly on one of this rotor's
    /// notches. Always false for fixed rotors and reflectors.
    pub fn is_at_own_notch(&self) -> bool {
        match self.spec.kind() {
            RotorKind::Moving { notches } => notches.contains(&self.offset),
            _ => false,
        }
    }

    /// Returns true iff the offset is one position past a notch, the
    /// position from which the previous advance carried the rotor over the
    /// notch. Always false for fixed rotors and reflectors.
    pub fn is_about_to_release_neighbor(&self) -> bool {
        match self.spec.kind() {
            RotorKind::Moving { notches } => {
                let n = self.spec.wiring().size();
                notches.iter().any(|&notch| self.offset == (notch + 1) % n)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;

    fn latin() -> Arc<Alphabet> {
        Arc::new(Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ").unwrap())
    }

    fn moving(name: &str, cycles: &str, notches: &[usize]) -> Arc<RotorSpec> {
        let wiring = Permutation::new(cycles, latin()).unwrap();
        Arc::new(
            RotorSpec::new(
                name,
                wiring,
                RotorKind::Moving {
                    notches: notches.to_vec(),
                },
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_convert_at_offset_zero_is_wiring() {
        let spec = moving("I", "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", &[16]);
        let rotor = Rotor::new(spec);
        assert_eq!(rotor.convert_forward(0), 4); // A -> E
        assert_eq!(rotor.convert_backward(4), 0);
    }

    #[test]
    fn test_convert_with_offset() {
        // Four-symbol alphabet, wiring (ABCD), offset 1:
        // forward(p) = wrap(permute(p + 1) - 1) = wrap(p + 2 - 1) = p + 1 mod 4.
        let alphabet = Arc::new(Alphabet::new("ABCD").unwrap());
        let wiring = Permutation::new("(ABCD)", alphabet).unwrap();
        let spec = Arc::new(RotorSpec::new("T", wiring, RotorKind::Fixed).unwrap());
        let mut rotor = Rotor::new(spec);
        rotor.set_offset(1).unwrap();
        for p in 0..4 {
            assert_eq!(rotor.convert_forward(p), (p + 1) % 4);
            assert_eq!(rotor.convert_backward((p + 1) % 4), p);
        }
    }

    #[test]
    fn test_forward_backward_inverse_at_any_offset() {
        let spec = moving("II", "(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)", &[4]);
        let mut rotor = Rotor::new(spec);
        for offset in 0..26 {
            rotor.set_offset(offset).unwrap();
            for p in 0..26 {
                assert_eq!(rotor.convert_backward(rotor.convert_forward(p)), p);
            }
        }
    }

    #[test]
    fn test_set_offset_out_of_range() {
        let spec = moving("I", "(AB)", &[0]);
        let mut rotor = Rotor::new(spec);
        assert!(matches!(
            rotor.set_offset(26),
            Err(Error::IndexOutOfRange { index: 26, size: 26 })
        ));
        // A failed set leaves the offset untouched.
        assert_eq!(rotor.offset(), 0);
    }

    #[test]
    fn test_notch_predicates() {
        let spec = moving("I", "(AB)", &[16]); // notch at Q
        let mut rotor = Rotor::new(spec);
        rotor.set_offset(16).unwrap();
        assert!(rotor.is_at_own_notch());
        assert!(!rotor.is_about_to_release_neighbor());
        rotor.set_offset(17).unwrap();
        assert!(!rotor.is_at_own_notch());
        assert!(rotor.is_about_to_release_neighbor());
        rotor.set_offset(15).unwrap();
        assert!(!rotor.is_at_own_notch());
        assert!(!rotor.is_about_to_release_neighbor());
    }

    #[test]
    fn test_notch_release_wraps_around() {
        // Notch on the last symbol: the release position wraps to 0.
        let spec = moving("VIII", "(AB)", &[25]);
        let mut rotor = Rotor::new(spec);
        rotor.set_offset(0).unwrap();
        assert!(rotor.is_about_to_release_neighbor());
    }

    #[test]
    fn test_multiple_notches() {
        let spec = moving("VI", "(AB)", &[25, 12]); // Z and M
        let mut rotor = Rotor::new(spec);
        for at in [25, 12] {
            rotor.set_offset(at).unwrap();
            assert!(rotor.is_at_own_notch());
        }
        for past in [0, 13] {
            rotor.set_offset(past).unwrap();
            assert!(rotor.is_about_to_release_neighbor());
        }
    }

    #[test]
    fn test_fixed_and_reflector_never_at_notch() {
        let fixed = Arc::new(
            RotorSpec::new(
                "Beta",
                Permutation::new("(ALBEVFCYODJWUGNMQTZSKPR) (HIX)", latin()).unwrap(),
                RotorKind::Fixed,
            )
            .unwrap(),
        );
        let rotor = Rotor::new(fixed);
        assert!(!rotor.is_at_own_notch());
        assert!(!rotor.is_about_to_release_neighbor());
        assert!(!rotor.spec().rotates());
    }

    #[test]
    fn test_reflector_requires_derangement() {
        // (AB) leaves 24 fixed points.
        let wiring = Permutation::new("(AB)", latin()).unwrap();
        assert!(matches!(
            RotorSpec::new("B", wiring, RotorKind::Reflector),
            Err(Error::BadRotorDescription { .. })
        ));
    }

    #[test]
    fn test_valid_reflector() {
        let wiring = Permutation::new(
            "(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)",
            latin(),
        )
        .unwrap();
        let spec = RotorSpec::new("B", wiring, RotorKind::Reflector).unwrap();
        assert!(spec.reflecting());
        assert!(!spec.rotates());
    }

    #[test]
    fn test_notch_out_of_range_rejected() {
        let wiring = Permutation::new("(AB)", latin()).unwrap();
        assert!(matches!(
            RotorSpec::new("I", wiring, RotorKind::Moving { notches: vec![26] }),
            Err(Error::IndexOutOfRange { .. })
        ));
    }
}
