//! rotorwerk: faithful emulator of a historical rotor-cipher machine.
//!
//! Given an ordered stack of interchangeable rotors, a reflector and a
//! plugboard, the machine encodes and decodes a symbol stream one symbol at
//! a time, advancing rotor positions between symbols according to the
//! mechanical stepping rule of the historical device — including its
//! double-stepping anomaly.
//!
//! This crate is bit-for-bit compatible with the historical machine: the
//! stepping algorithm and the cycle notation for wirings are pinned against
//! published machine vectors in the test suites.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbol ↔ index bijection)
//!     ↕ underlies
//! Permutation  (disjoint-cycle permutation of indices, forward/inverse)
//!     ↕ wiring of
//! RotorSpec    (immutable catalog entry: wiring + kind + notches)
//!     ↕ installed as
//! Rotor        (shared spec + per-session rotational offset)
//!     ↕ stacked by
//! Machine      (stepping rule + plugboard + forward/backward signal path)
//! ```
//!
//! Wirings live in a [`Catalog`] that is loaded once (see [`config`]) and
//! shared read-only between machines; each [`Machine`] session owns nothing
//! but its offsets, so re-configuring never leaks state between sessions.
//!
//! # Examples
//!
//! Configure a machine and encode a message:
//!
//! ```
//! use rotorwerk::{config, Machine, Permutation};
//!
//! let catalog = config::load(
//!     "ABCD\n3 1\nR1 R (AB) (CD)\nF N (AC)\nM1 MA (ABCD)\n",
//! ).unwrap();
//!
//! let mut machine = Machine::new(catalog.clone());
//! let plugboard = Permutation::identity(catalog.alphabet().clone());
//! machine.configure(&["R1", "F", "M1"], "AB", plugboard).unwrap();
//!
//! let cipher = machine.encode_message("ABCD").unwrap();
//! assert_ne!(cipher, "ABCD");
//! ```
//!
//! Re-running from the same setting decodes the result (the machine is its
//! own inverse):
//!
//! ```
//! use rotorwerk::{config, Machine, Permutation};
//!
//! let catalog = config::load(
//!     "ABCD\n3 1\nR1 R (AB) (CD)\nF N (AC)\nM1 MA (ABCD)\n",
//! ).unwrap();
//! let mut machine = Machine::new(catalog.clone());
//! let plugboard = Permutation::identity(catalog.alphabet().clone());
//!
//! machine.configure(&["R1", "F", "M1"], "CB", plugboard.clone()).unwrap();
//! let cipher = machine.encode_message("DBCA").unwrap();
//!
//! machine.configure(&["R1", "F", "M1"], "CB", plugboard).unwrap();
//! assert_eq!(machine.encode_message(&cipher).unwrap(), "DBCA");
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod catalog;
pub mod config;
pub mod driver;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;

pub use alphabet::Alphabet;
pub use catalog::Catalog;
pub use error::Error;
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind, RotorSpec};
