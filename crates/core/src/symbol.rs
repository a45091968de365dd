//! Symbols and phrases.
//!
//! A symbol is one input byte. A phrase is an owned run of symbols, used for
//! LZW dictionary entries and expanded output.
//!
//! Phrases display with non-printable bytes escaped, so `b"A\n"` renders as
//! `A\n`. Serialized phrases are the raw text when the bytes are valid UTF-8
//! and fall back to the escaped form otherwise.

use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// One atomic input unit.
pub type Symbol = u8;

/// Render a single symbol the way descriptions and labels show it.
pub fn symbol_label(symbol: Symbol) -> String {
    symbol.escape_ascii().to_string()
}

/// Text used for a symbol in serialized output: the character itself for
/// ASCII, the escaped label for any other byte.
pub fn symbol_text(symbol: Symbol) -> String {
    if symbol.is_ascii() {
        char::from(symbol).to_string()
    } else {
        symbol_label(symbol)
    }
}

pub(crate) fn serialize_opt_symbol<S: Serializer>(
    symbol: &Option<Symbol>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match symbol {
        Some(s) => serializer.serialize_some(&symbol_text(*s)),
        None => serializer.serialize_none(),
    }
}

/// An owned sequence of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Phrase(Vec<Symbol>);

impl Phrase {
    /// The empty phrase.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A phrase of exactly one symbol.
    pub fn single(symbol: Symbol) -> Self {
        Self(vec![symbol])
    }

    /// Return a new phrase with `symbol` appended.
    pub fn extended(&self, symbol: Symbol) -> Self {
        let mut bytes = Vec::with_capacity(self.0.len() + 1);
        bytes.extend_from_slice(&self.0);
        bytes.push(symbol);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[Symbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last symbol, if any.
    pub fn last(&self) -> Option<Symbol> {
        self.0.last().copied()
    }

    pub fn into_bytes(self) -> Vec<Symbol> {
        self.0
    }
}

impl From<&[u8]> for Phrase {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Phrase {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for Phrase {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

// Hash and Eq of `Phrase` are those of its bytes, so slice lookups agree.
impl Borrow<[u8]> for Phrase {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl Serialize for Phrase {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match std::str::from_utf8(&self.0) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.collect_str(self),
        }
    }
}
