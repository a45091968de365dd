//! Property-based tests for both engines.
//!
//! Uses proptest to check the invariants that must hold for every input,
//! not just the fixtures.

use codec_viz_core::{
    build_from_frequencies, compute_frequencies, encode_lzw, generate_codes,
    huffman_compressed_bits, lzw::concat_phrases, lzw_compressed_bits, AlphabetConfig,
};
use proptest::prelude::*;

// =============================================================================
// GENERATORS
// =============================================================================

/// Arbitrary bytes, biased toward small alphabets so ties and repeats are common
fn input_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..512),
        prop::collection::vec(prop::sample::select(b"ABCD".to_vec()), 0..512),
        prop::collection::vec(prop::sample::select(b"ab".to_vec()), 0..64),
    ]
}

/// Printable ASCII text
fn printable_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(32u8..=126, 0..512)
}

// =============================================================================
// FREQUENCY / HUFFMAN PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_frequency_sum_and_order(input in input_strategy()) {
        let freqs = compute_frequencies(&input);
        prop_assert_eq!(freqs.total(), input.len() as u64);

        // Key order equals first-occurrence order
        let mut seen = Vec::new();
        for &b in &input {
            if !seen.contains(&b) {
                seen.push(b);
            }
        }
        prop_assert_eq!(freqs.symbols().collect::<Vec<_>>(), seen);
    }

    #[test]
    fn prop_snapshot_count(input in input_strategy()) {
        let freqs = compute_frequencies(&input);
        let build = build_from_frequencies(&freqs);
        let expected = if freqs.is_empty() { 0 } else { freqs.len() };
        prop_assert_eq!(build.snapshots.len(), expected);

        // Each snapshot has one node fewer than the previous
        for (i, snapshot) in build.snapshots.iter().enumerate() {
            prop_assert_eq!(snapshot.active_nodes.len(), freqs.len() - i);
        }
    }

    #[test]
    fn prop_codes_prefix_free_and_nonempty(input in input_strategy()) {
        let freqs = compute_frequencies(&input);
        let build = build_from_frequencies(&freqs);
        let codes = generate_codes(&build.tree);

        prop_assert_eq!(codes.len(), freqs.len());
        prop_assert!(codes.iter().all(|(_, code)| !code.is_empty()));
        prop_assert!(codes.is_prefix_free());
    }

    #[test]
    fn prop_huffman_never_worse_than_fixed_width(input in input_strategy()) {
        let freqs = compute_frequencies(&input);
        let build = build_from_frequencies(&freqs);
        let bits = huffman_compressed_bits(&build.tree, &freqs);

        // Optimal prefix code is no longer than the fixed-width code for k symbols
        let k = freqs.len() as u32;
        let fixed = if k <= 1 { 1 } else { u32::BITS - (k - 1).leading_zeros() };
        prop_assert!(bits <= input.len() as u64 * u64::from(fixed));
    }

    #[test]
    fn prop_huffman_round_trip(input in input_strategy()) {
        let build = build_from_frequencies(&compute_frequencies(&input));
        let codes = generate_codes(&build.tree);
        let packed = codes.pack(&input).unwrap();
        prop_assert_eq!(build.tree.decode(&packed).unwrap(), input);
    }
}

// =============================================================================
// LZW PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_lzw_round_trip_full_byte(input in input_strategy()) {
        let encoding = encode_lzw(&input, &AlphabetConfig::full_byte()).unwrap();
        let expanded = encoding.expand().unwrap();
        prop_assert_eq!(concat_phrases(&expanded), input);
    }

    #[test]
    fn prop_lzw_round_trip_printable(input in printable_strategy()) {
        let encoding = encode_lzw(&input, &AlphabetConfig::printable_ascii()).unwrap();
        let expanded = encoding.expand().unwrap();
        prop_assert_eq!(concat_phrases(&expanded), input);
    }

    #[test]
    fn prop_lzw_codes_strictly_increasing(input in input_strategy()) {
        let encoding = encode_lzw(&input, &AlphabetConfig::full_byte()).unwrap();
        let codes: Vec<u32> = encoding.final_dictionary.entries().iter().map(|e| e.code).collect();
        prop_assert!(codes.windows(2).all(|w| w[0] < w[1]));

        // Each miss learns the previous maximum plus one
        let learned: Vec<u32> = encoding
            .steps
            .iter()
            .filter_map(|s| s.new_entry.as_ref().map(|e| e.code))
            .collect();
        let expected: Vec<u32> = (256..256 + learned.len() as u32).collect();
        prop_assert_eq!(learned, expected);
    }

    #[test]
    fn prop_lzw_output_count(input in input_strategy()) {
        let encoding = encode_lzw(&input, &AlphabetConfig::full_byte()).unwrap();
        let misses = encoding.steps.iter().filter(|s| !s.is_flush()).count();
        let flushes = encoding.steps.iter().filter(|s| s.is_flush()).count();

        prop_assert_eq!(flushes, usize::from(!input.is_empty()));
        prop_assert_eq!(encoding.output.len(), misses + flushes);
        prop_assert_eq!(encoding.final_dictionary.learned_len(), misses);
    }

    #[test]
    fn prop_lzw_size_matches_packing(input in input_strategy()) {
        let config = AlphabetConfig::full_byte();
        let encoding = encode_lzw(&input, &config).unwrap();
        let bits = lzw_compressed_bits(&encoding.output, &config);
        prop_assert_eq!(encoding.pack().unwrap().bit_len(), bits);
        if let Some(width) = encoding.bits_per_code() {
            prop_assert!(width >= 8);
            prop_assert_eq!(bits, encoding.output.len() as u64 * u64::from(width));
        }
    }
}
