//! Human-readable output for a run report.

use codec_viz_core::huffman::HuffmanSnapshot;
use codec_viz_core::lzw::{LzwEncoding, LzwStep};
use codec_viz_core::report::{HuffmanReport, LzwReport, RunReport};
use codec_viz_core::stats::format_percent;
use codec_viz_core::symbol::symbol_label;

/// Longest phrase list printed per LZW step before eliding.
const MAX_LEARNED_SHOWN: usize = 12;

pub fn print_huffman_steps(report: &HuffmanReport) {
    println!("=== Huffman Merges ===");
    for (index, snapshot) in report.snapshots.iter().enumerate() {
        println!("[{index}] {}", snapshot.description);
        println!("    active: {}", active_nodes(snapshot));
    }
    println!();
}

fn active_nodes(snapshot: &HuffmanSnapshot) -> String {
    snapshot
        .active_nodes
        .iter()
        .map(|node| match node.symbol {
            Some(symbol) => format!("#{} '{}':{}", node.id, symbol_label(symbol), node.weight),
            None => format!("#{} *:{}", node.id, node.weight),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn print_lzw_steps(report: &LzwReport) {
    println!("=== LZW Steps ===");
    for step in &report.encoding.steps {
        println!("{}", describe_step(&report.encoding, step));
    }
    println!();
}

fn describe_step(encoding: &LzwEncoding, step: &LzwStep) -> String {
    let start_code = encoding.config.start_code();
    let mut line = match (&step.new_entry, step.current_symbol) {
        (Some(entry), Some(symbol)) => format!(
            "[{}] w='{}' c='{}' emit {} learn '{}'={} | remaining '{}'",
            step.ordinal,
            step.matched_prefix,
            symbol_label(symbol),
            step.emitted_code,
            entry.phrase,
            entry.code,
            encoding.remaining_input_at(step).escape_ascii()
        ),
        _ => format!(
            "[{}] flush w='{}' emit {}",
            step.ordinal, step.matched_prefix, step.emitted_code
        ),
    };

    let learned: Vec<String> = encoding
        .dictionary_at(step)
        .iter()
        .filter(|entry| entry.code >= start_code)
        .map(|entry| format!("{}={}", entry.phrase, entry.code))
        .collect();
    if !learned.is_empty() {
        let shown = learned.len().min(MAX_LEARNED_SHOWN);
        let elided = learned.len() - shown;
        line.push_str(&format!("\n    learned: {}", learned[learned.len() - shown..].join(" ")));
        if elided > 0 {
            line.push_str(&format!(" (+{elided} earlier)"));
        }
    }
    line
}

/// Print codes, sizes and the comparison line.
pub fn print_summary(report: &RunReport) {
    println!("=== Summary ===");
    println!("Input: {} bytes ({} bits)", report.input_len, report.input_len * 8);
    println!();

    if let Some(huffman) = &report.huffman {
        println!("--- Huffman ---");
        for (symbol, code) in huffman.codes.iter() {
            let count = huffman.frequencies.get(symbol).unwrap_or(0);
            println!("  '{}' x{count}: {code}", symbol_label(symbol));
        }
        println!("  Size: {}", huffman.stats);
        println!();
    }

    if let Some(lzw) = &report.lzw {
        println!("--- LZW ---");
        let output: Vec<String> = lzw.encoding.output.iter().map(u32::to_string).collect();
        println!("  Output: {}", output.join(" "));
        if let Some(width) = lzw.bits_per_code {
            println!("  Codes: {} x {width} bits", lzw.encoding.output.len());
        }
        println!("  Learned entries: {}", lzw.encoding.final_dictionary.learned_len());
        println!("  Size: {}", lzw.stats);
        println!();
    }

    if let (Some(huffman), Some(lzw)) = (&report.huffman, &report.lzw) {
        let (h, l) = (huffman.stats.compressed_bits, lzw.stats.compressed_bits);
        let winner = match h.cmp(&l) {
            std::cmp::Ordering::Less => "Huffman",
            std::cmp::Ordering::Greater => "LZW",
            std::cmp::Ordering::Equal => "tie",
        };
        println!(
            "Comparison: Huffman {h} bits ({}) vs LZW {l} bits ({}) -> {winner}",
            format_percent(huffman.stats.reduction_percent()),
            format_percent(lzw.stats.reduction_percent()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec_viz_core::lzw::{encode_lzw, AlphabetConfig};

    #[test]
    fn test_describe_miss_and_flush() {
        let encoding = encode_lzw(b"ABAB", &AlphabetConfig::full_byte()).unwrap();

        let first = describe_step(&encoding, &encoding.steps[0]);
        assert!(first.starts_with("[1] w='A' c='B' emit 65 learn 'AB'=256 | remaining 'AB'"));
        assert!(first.contains("learned: AB=256"));

        let last = describe_step(&encoding, encoding.steps.last().unwrap());
        assert!(last.starts_with("[3] flush w='AB' emit 256"));
    }

    #[test]
    fn test_active_nodes() {
        let build = codec_viz_core::build_huffman(b"aab");
        assert_eq!(active_nodes(&build.snapshots[0]), "#0 'a':2  #1 'b':1");
        assert_eq!(active_nodes(&build.snapshots[1]), "#2 *:3");

        let build = codec_viz_core::build_huffman(b"it's\n\n\n");
        assert!(active_nodes(&build.snapshots[0]).starts_with("#0 'i':1  #1 't':1  #2 '\\'':1"));
    }
}
