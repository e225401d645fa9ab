//! Error types for the rotorwerk library.
//!
//! Every failure is a caller input error: it is never retried and never
//! silently corrected. Each variant carries the offending value so a caller
//! can print a single diagnostic line and abort the current batch without
//! taking down a process that handles several independent jobs.

/// Errors produced by the rotorwerk library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Alphabet construction rejected its symbol set.
    #[error("malformed alphabet: {reason}")]
    MalformedAlphabet { reason: String },

    /// A symbol was looked up that the alphabet does not contain.
    #[error("symbol '{symbol}' is not in the alphabet")]
    SymbolNotInAlphabet { symbol: char },

    /// An index was outside `[0, N)` for an alphabet of size N.
    #[error("index {index} is out of range for alphabet of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// Cycle notation that does not denote a valid permutation.
    #[error("malformed permutation '{cycles}': {reason}")]
    MalformedPermutation { cycles: String, reason: String },

    /// A rotor name that is not present in the catalog.
    #[error("unknown rotor name '{name}'")]
    UnknownRotorName { name: String },

    /// A rotor of the wrong kind for its slot, or an impossible machine shape.
    #[error("rotor placement: {reason}")]
    RotorPlacement { reason: String },

    /// Initial-offset string whose length does not match the slot count.
    #[error("setting '{setting}' has {actual} symbols, expected {expected}")]
    SettingLengthMismatch {
        setting: String,
        expected: usize,
        actual: usize,
    },

    /// Configuration text ended before the catalog was fully described.
    #[error("configuration truncated: {reason}")]
    TruncatedConfig { reason: String },

    /// A rotor description line that cannot be understood.
    #[error("bad rotor description for '{name}': {reason}")]
    BadRotorDescription { name: String, reason: String },

    /// A settings line that cannot be understood.
    #[error("bad settings line: {reason}")]
    BadSettingLine { reason: String },

    /// Encoding was attempted before any successful configure call.
    #[error("machine has no configured session")]
    NotConfigured,

    /// Stream error while reading input or writing output.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
