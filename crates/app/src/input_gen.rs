//! Sample text generation.
//!
//! `--sample` produces text with mixed compressibility so the two engines
//! behave differently on it:
//! - runs of one character (Huffman and LZW both shine)
//! - words from a small vocabulary (LZW learns whole words)
//! - a short repeating pattern (LZW phrases grow long)
//! - uniformly random letters (little to gain for either)
//!
//! Output is printable ASCII only, so every alphabet preset accepts it.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const WORDS: &[&str] = &[
    "the", "tree", "merge", "code", "bit", "dictionary", "phrase", "node", "weight", "symbol",
];

/// Generate `len` bytes of printable sample text, reproducible from `seed`.
pub fn generate_sample_text(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(len);

    while data.len() < len {
        let section = rng.gen_range(16..=128).min(len - data.len());

        match rng.gen_range(0..10) {
            // 30% runs of one letter
            0..=2 => {
                let letter = LETTERS[rng.gen_range(0..LETTERS.len())];
                data.extend(std::iter::repeat(letter).take(section));
            }

            // 40% words separated by spaces
            3..=6 => {
                let start = data.len();
                while data.len() - start < section {
                    let word = WORDS.choose(&mut rng).copied().unwrap_or("the");
                    data.extend_from_slice(word.as_bytes());
                    data.push(b' ');
                }
            }

            // 20% a short repeating pattern
            7..=8 => {
                let pattern: Vec<u8> = (0..rng.gen_range(2..=6))
                    .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())])
                    .collect();
                data.extend(pattern.iter().cycle().take(section));
            }

            // 10% random letters
            _ => {
                for _ in 0..section {
                    data.push(LETTERS[rng.gen_range(0..LETTERS.len())]);
                }
            }
        }
    }

    data.truncate(len);
    data
}
