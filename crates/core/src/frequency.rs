//! Symbol frequency counting.
//!
//! The table remembers the order in which symbols first appear. That order
//! decides Huffman leaf ids and therefore how weight ties are broken, so it
//! must be reproduced exactly.

use crate::symbol::{symbol_text, Symbol};
use serde::Serialize;

/// One row of a [`FrequencyTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolCount {
    pub symbol: Symbol,
    pub count: u64,
}

/// Ordered mapping from symbol to occurrence count.
///
/// # Invariants
/// - rows are in first-occurrence order
/// - each symbol appears once, every count is at least 1
/// - the counts sum to the input length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    rows: Vec<SymbolCount>,
    /// Position of each symbol within `rows`, or `None` if unseen
    index: [Option<u16>; 256],
}

impl FrequencyTable {
    /// Count symbols in a single pass over `input`.
    pub fn from_input(input: &[u8]) -> Self {
        let mut table = Self::default();

        for &symbol in input {
            match table.index[symbol as usize] {
                Some(pos) => table.rows[pos as usize].count += 1,
                None => {
                    table.index[symbol as usize] = Some(table.rows.len() as u16);
                    table.rows.push(SymbolCount { symbol, count: 1 });
                }
            }
        }

        table
    }

    /// Count for `symbol`, or `None` if it never occurred.
    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.index[symbol as usize].map(|pos| self.rows[pos as usize].count)
    }

    /// Rows in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolCount> {
        self.rows.iter()
    }

    /// Symbols in first-occurrence order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.rows.iter().map(|row| row.symbol)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all counts (equals the input length).
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.count).sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: [None; 256],
        }
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        #[derive(Serialize)]
        struct Row {
            symbol: String,
            count: u64,
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Row {
                symbol: symbol_text(row.symbol),
                count: row.count,
            })?;
        }
        seq.end()
    }
}

/// Build the frequency table for `input`.
pub fn compute_frequencies(input: &[u8]) -> FrequencyTable {
    FrequencyTable::from_input(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let table = compute_frequencies(b"");
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_first_occurrence_order() {
        let table = compute_frequencies(b"banana");
        let symbols: Vec<u8> = table.symbols().collect();
        assert_eq!(symbols, b"ban".to_vec());
        assert_eq!(table.get(b'a'), Some(3));
        assert_eq!(table.get(b'n'), Some(2));
        assert_eq!(table.get(b'b'), Some(1));
        assert_eq!(table.get(b'z'), None);
    }

    #[test]
    fn test_total_matches_length() {
        let input = b"AAABBACCBAADADDAABCBBCCBAAAD";
        let table = compute_frequencies(input);
        assert_eq!(table.total(), input.len() as u64);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(b'A'), Some(12));
        assert_eq!(table.get(b'B'), Some(7));
        assert_eq!(table.get(b'C'), Some(5));
        assert_eq!(table.get(b'D'), Some(4));
    }

    #[test]
    fn test_all_byte_values() {
        let input: Vec<u8> = (0..=255u8).rev().collect();
        let table = compute_frequencies(&input);
        assert_eq!(table.len(), 256);
        assert_eq!(table.symbols().next(), Some(255));
        assert!(table.iter().all(|row| row.count == 1));
    }
}
