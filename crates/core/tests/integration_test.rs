//! Integration tests for both engines end to end.
//!
//! These tests verify full runs: input -> frequencies -> tree -> codes ->
//! packed payload -> decoded output, and input -> LZW steps -> output codes
//! -> expanded phrases, with sizes checked against the logs.

use codec_viz_core::{
    bitio::BitReader,
    build_huffman, compute_frequencies, encode_lzw, expand_output, generate_codes,
    huffman_compressed_bits,
    lzw::{concat_phrases, unpack_codes},
    lzw_compressed_bits, AlphabetConfig, CompressionStats, Error, Preset, RunReport,
};

const FIXTURE: &[u8] = b"AAABBACCBAADADDAABCBBCCBAAAD";

/// Walk the fixture through the Huffman chain step by step.
#[test]
fn test_huffman_pipeline_fixture() {
    // Step 1: Count
    let freqs = compute_frequencies(FIXTURE);
    assert_eq!(freqs.total(), 28);

    // Step 2: Build, one snapshot per merge plus the initial one
    let build = build_huffman(FIXTURE);
    assert_eq!(build.snapshots.len(), 1 + (freqs.len() - 1));

    let last = build.snapshots.last().unwrap();
    assert_eq!(last.active_nodes.len(), 1);
    assert_eq!(last.active_nodes[0].weight, 28);
    assert_eq!(Some(last.active_nodes[0].id), last.merged_node_id);

    // Step 3: Codes
    let codes = generate_codes(&build.tree);
    assert_eq!(codes.len(), 4);
    assert!(codes.is_prefix_free());

    // Step 4: Size, packed payload and decode agree
    let bits = huffman_compressed_bits(&build.tree, &freqs);
    let packed = codes.pack(FIXTURE).unwrap();
    assert_eq!(packed.bit_len(), bits);
    assert_eq!(build.tree.decode(&packed).unwrap(), FIXTURE);

    let stats = CompressionStats::new(FIXTURE.len(), bits);
    let reduction = stats.reduction_percent().unwrap();
    assert!((reduction - (1.0 - 53.0 / 224.0) * 100.0).abs() < 1e-9);
}

/// Walk the fixture through the LZW chain and re-read the packed codes.
#[test]
fn test_lzw_pipeline_fixture() {
    let config = Preset::FullByte.config();
    let encoding = encode_lzw(FIXTURE, &config).unwrap();

    // Every step's output is a prefix of the final output
    for step in &encoding.steps {
        assert_eq!(encoding.output_at(step), &encoding.output[..step.output_len]);
        assert_eq!(step.output_len, step.ordinal);
    }
    assert_eq!(encoding.steps.len(), encoding.output.len());

    // Remaining input shrinks monotonically and ends empty
    let remaining: Vec<usize> = encoding
        .steps
        .iter()
        .map(|s| encoding.remaining_input_at(s).len())
        .collect();
    assert!(remaining.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(remaining.last(), Some(&0));

    let bits = lzw_compressed_bits(&encoding.output, &config);
    let packed = encoding.pack().unwrap();
    assert_eq!(packed.bit_len(), bits);

    let width = encoding.bits_per_code().unwrap();
    let codes = unpack_codes(&packed, width).unwrap();
    let expanded = expand_output(&codes, &encoding.final_dictionary).unwrap();
    assert_eq!(concat_phrases(&expanded), FIXTURE);

    let mut reader = BitReader::new(&packed);
    assert_eq!(reader.read_bits(width as usize).unwrap(), 65);
}

/// Repeated runs must be bit-identical.
#[test]
fn test_runs_are_reproducible() {
    let first = RunReport::new(FIXTURE, true, Some(&AlphabetConfig::full_byte())).unwrap();
    let second = RunReport::new(FIXTURE, true, Some(&AlphabetConfig::full_byte())).unwrap();
    assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());
}

/// The two presets differ in codes and sizes but both round trip.
#[test]
fn test_presets_differ() {
    let input = b"the tree merges the nodes; the dictionary learns the phrases";
    let full = encode_lzw(input, &AlphabetConfig::full_byte()).unwrap();
    let printable = encode_lzw(input, &AlphabetConfig::printable_ascii()).unwrap();

    assert_eq!(full.steps.len(), printable.steps.len());
    assert_ne!(full.output, printable.output);
    assert_eq!(concat_phrases(&full.expand().unwrap()), input);
    assert_eq!(concat_phrases(&printable.expand().unwrap()), input);
    assert!(printable.compressed_bits() < full.compressed_bits());
}

/// Non-printable input under the printable preset fails before any work.
#[test]
fn test_printable_preset_rejects_binary() {
    let input = [b'a', 0x00, b'b'];
    assert!(matches!(
        encode_lzw(&input, &AlphabetConfig::printable_ascii()),
        Err(Error::Lzw(_))
    ));
    assert!(RunReport::new(&input, true, Some(&AlphabetConfig::printable_ascii())).is_err());

    // Huffman alone is alphabet-free
    let report = RunReport::new(&input, true, None).unwrap();
    report.verify().unwrap();
}

/// Degenerate inputs are values, never errors.
#[test]
fn test_degenerate_inputs() {
    let report = RunReport::new(b"", true, Some(&AlphabetConfig::full_byte())).unwrap();
    assert_eq!(report.huffman.as_ref().unwrap().stats.reduction_percent(), None);
    assert_eq!(report.lzw.as_ref().unwrap().stats.reduction_percent(), None);
    report.verify().unwrap();

    let report = RunReport::new(b"AAAA", true, Some(&AlphabetConfig::full_byte())).unwrap();
    let huffman = report.huffman.as_ref().unwrap();
    assert_eq!(huffman.codes.get(b'A'), Some("0"));
    assert_eq!(huffman.stats.compressed_bits, 4);
    assert_eq!(report.lzw.as_ref().unwrap().encoding.output, vec![65, 256, 65]);
    report.verify().unwrap();
}

/// Larger binary input with every byte value.
#[test]
fn test_binary_round_trip() {
    let input: Vec<u8> = (0..4096u32).map(|i| ((i * 7) ^ (i >> 3)) as u8).collect();
    let report = RunReport::new(&input, true, Some(&AlphabetConfig::full_byte())).unwrap();
    report.verify().unwrap();

    let huffman = report.huffman.as_ref().unwrap();
    assert_eq!(huffman.payload.bit_len(), huffman.stats.compressed_bits);
    assert_eq!(huffman.snapshots.len(), huffman.frequencies.len());
}
