//! Permutation: a permutation of alphabet indices defined by disjoint cycles.
//!
//! The textual form is cycle notation, `(c0c1...cm)(d0...dk)...`: within a
//! cycle each symbol maps to its successor and the last wraps to the first.
//! Symbols not mentioned in any cycle map to themselves; whitespace between
//! cycles is ignored; the empty string denotes the identity. This notation is
//! part of the compatibility surface with the historical device, so parsing
//! is bit-exact and validated up front.
//!
//! Parsing is a single pass: one traversal both validates the notation and
//! fills the forward/inverse index tables, so `permute`/`invert` are plain
//! array lookups afterwards.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::Error;

/// A permutation of the indices `[0, N)` of an [`Alphabet`].
///
/// Immutable after construction; shared between rotors and machines.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
    cycles: Vec<Vec<usize>>,
}

impl Permutation {
    /// Parses `cycles` over `alphabet` and builds the permutation.
    ///
    /// # Parameters
    /// - `cycles`: cycle notation, e.g. `"(AELTPHQXRU) (BKNW) (S)"`. The
    ///   empty string (or only whitespace) is the identity permutation.
    /// - `alphabet`: the alphabet whose indices are permuted.
    ///
    /// # Errors
    /// Returns [`Error::MalformedPermutation`] if a symbol is outside the
    /// alphabet, appears in more than one cycle (or twice in one), if
    /// parentheses are unbalanced or nested, if a symbol appears outside any
    /// cycle, or if a cycle is empty.
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self, Error> {
        let malformed = |reason: String| Error::MalformedPermutation {
            cycles: cycles.to_string(),
            reason,
        };

        let n = alphabet.size();
        let mut forward: Vec<usize> = (0..n).collect();
        let mut inverse: Vec<usize> = (0..n).collect();
        let mut parsed: Vec<Vec<usize>> = Vec::new();
        let mut seen = vec![false; n];
        let mut current: Option<Vec<usize>> = None;

        for c in cycles.chars() {
            match c {
                c if c.is_whitespace() => {
                    if current.is_some() {
                        return Err(malformed("whitespace inside a cycle".to_string()));
                    }
                }
                '(' => {
                    if current.is_some() {
                        return Err(malformed("nested '('".to_string()));
                    }
                    current = Some(Vec::new());
                }
                ')' => {
                    let cycle = current
                        .take()
                        .ok_or_else(|| malformed("')' without matching '('".to_string()))?;
                    if cycle.is_empty() {
                        return Err(malformed("empty cycle '()'".to_string()));
                    }
                    // Close the cycle: each index maps to its successor,
                    // the last wraps to the first.
                    for (k, &idx) in cycle.iter().enumerate() {
                        let succ = cycle[(k + 1) % cycle.len()];
                        forward[idx] = succ;
                        inverse[succ] = idx;
                    }
                    parsed.push(cycle);
                }
                c => {
                    let cycle = current
                        .as_mut()
                        .ok_or_else(|| malformed(format!("symbol '{c}' outside any cycle")))?;
                    let idx = alphabet
                        .to_index(c)
                        .map_err(|_| malformed(format!("symbol '{c}' is not in the alphabet")))?;
                    if seen[idx] {
                        return Err(malformed(format!(
                            "symbol '{c}' appears in more than one place"
                        )));
                    }
                    seen[idx] = true;
                    cycle.push(idx);
                }
            }
        }
        if current.is_some() {
            return Err(malformed("unclosed '('".to_string()));
        }

        Ok(Permutation {
            alphabet,
            forward,
            inverse,
            cycles: parsed,
        })
    }

    /// Returns the identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        // The empty cycle string cannot fail to parse.
        Self::new("", alphabet).expect("identity permutation")
    }

    /// Returns the size of the alphabet this permutation acts on.
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// Returns the alphabet this permutation acts on.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the canonical representative of `p` modulo the alphabet size,
    /// always in `[0, N)`, including for negative `p`.
    pub fn wrap(&self, p: i32) -> usize {
        let n = self.size() as i32;
        let r = p % n;
        (if r < 0 { r + n } else { r }) as usize
    }

    /// Applies the permutation to `p` (taken modulo the alphabet size).
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Applies the inverse permutation to `c` (taken modulo the alphabet size).
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Returns true iff no symbol maps to itself.
    ///
    /// A cycle of length 1 and a symbol absent from all cycles both count as
    /// fixed points, so the wiring of a reflector must mention every symbol
    /// in cycles of length at least 2.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &to)| i != to)
    }

    /// Returns the parsed cycles as index sequences, in notation order.
    pub fn cycles(&self) -> &[Vec<usize>] {
        &self.cycles
    }
}
