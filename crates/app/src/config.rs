//! Configuration for the codec-viz application.
//!
//! Handles parsing command-line arguments and filling in defaults.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: it then encodes the classic
//! fixture string with both engines and the full-byte alphabet. The alphabet
//! in use is always printed with `--print-config`, so no run depends on a
//! silent default.

use crate::input_gen::generate_sample_text;
use codec_viz_core::{AlphabetConfig, Preset};
use std::path::PathBuf;
use std::str::FromStr;

/// Input used when none is given.
pub const DEFAULT_TEXT: &str = "AAABBACCBAADADDAABCBBCCBAAAD";

/// Where the bytes to encode come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Literal text from the command line
    Text(String),
    /// Contents of a file
    File(PathBuf),
    /// Generated sample text of the given length
    Sample { len: usize, seed: u64 },
}

/// Which engines to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Huffman,
    Lzw,
    Both,
}

impl Mode {
    pub fn runs_huffman(self) -> bool {
        matches!(self, Mode::Huffman | Mode::Both)
    }

    pub fn runs_lzw(self) -> bool {
        matches!(self, Mode::Lzw | Mode::Both)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "huffman" => Ok(Mode::Huffman),
            "lzw" => Ok(Mode::Lzw),
            "both" => Ok(Mode::Both),
            other => Err(format!("unknown mode '{other}' (expected huffman, lzw or both)")),
        }
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Input ===
    pub input: InputSource,

    // === Engines ===
    pub mode: Mode,

    /// Seed alphabet for the LZW engine
    pub alphabet: Preset,

    // === Output ===
    /// Write the full JSON report here
    pub json_file: Option<PathBuf>,

    /// Print every Huffman snapshot and LZW step
    pub show_steps: bool,

    /// Whether to print the resolved configuration
    pub print_config: bool,

    /// Whether to print the size summary
    pub print_summary: bool,

    // === Logging ===
    pub log_level: tracing::Level,
}

impl Config {
    /// Parse configuration from command-line arguments (program name excluded).
    ///
    /// `--sample` without `--seed` draws a time-based seed; the seed is
    /// printed with the config so the run can be repeated.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut text: Option<String> = None;
        let mut input_file: Option<PathBuf> = None;
        let mut sample_len: Option<usize> = None;
        let mut seed: Option<u64> = None;
        let mut mode = Mode::Both;
        let mut alphabet = Preset::FullByte;
        let mut json_file: Option<PathBuf> = None;
        let mut show_steps = false;
        let mut print_config = false;
        let mut print_summary = true;
        let mut log_level = tracing::Level::WARN;

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--text" => text = Some(take_value(args, &mut i, flag)?.to_string()),
                "--in" => input_file = Some(PathBuf::from(take_value(args, &mut i, flag)?)),
                "--sample" => {
                    sample_len = Some(
                        take_value(args, &mut i, flag)?
                            .parse()
                            .map_err(|_| "invalid sample length")?,
                    );
                }
                "--seed" => {
                    seed = Some(
                        take_value(args, &mut i, flag)?
                            .parse()
                            .map_err(|_| "invalid seed")?,
                    );
                }
                "--mode" => mode = take_value(args, &mut i, flag)?.parse()?,
                "--alphabet" => {
                    alphabet = take_value(args, &mut i, flag)?
                        .parse()
                        .map_err(|e: codec_viz_core::Error| e.to_string())?;
                }
                "--json" => json_file = Some(PathBuf::from(take_value(args, &mut i, flag)?)),
                "--log-level" => log_level = parse_level(take_value(args, &mut i, flag)?)?,
                "--steps" => show_steps = true,
                "--print-config" => print_config = true,
                "--no-summary" => print_summary = false,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        let given = [text.is_some(), input_file.is_some(), sample_len.is_some()];
        if given.iter().filter(|&&g| g).count() > 1 {
            return Err("--text, --in and --sample are mutually exclusive".to_string());
        }

        let input = match (text, input_file, sample_len) {
            (Some(text), _, _) => InputSource::Text(text),
            (_, Some(path), _) => InputSource::File(path),
            (_, _, Some(len)) => InputSource::Sample {
                len,
                seed: seed.unwrap_or_else(time_seed),
            },
            _ => InputSource::Text(DEFAULT_TEXT.to_string()),
        };

        Ok(Config {
            input,
            mode,
            alphabet,
            json_file,
            show_steps,
            print_config,
            print_summary,
            log_level,
        })
    }

    /// Alphabet handed to the LZW engine, if it runs.
    pub fn lzw_alphabet(&self) -> Option<AlphabetConfig> {
        self.mode.runs_lzw().then(|| self.alphabet.config())
    }

    /// Resolve the input bytes.
    pub fn load_input(&self) -> std::io::Result<Vec<u8>> {
        match &self.input {
            InputSource::Text(text) => Ok(text.as_bytes().to_vec()),
            InputSource::File(path) => std::fs::read(path),
            InputSource::Sample { len, seed } => Ok(generate_sample_text(*seed, *len)),
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.input {
            InputSource::Text(text) => println!("Input: text ({} bytes)", text.len()),
            InputSource::File(path) => println!("Input: file {}", path.display()),
            InputSource::Sample { len, seed } => {
                println!("Input: generated sample ({len} bytes, seed {seed})")
            }
        }
        println!("Mode: {:?}", self.mode);
        if self.mode.runs_lzw() {
            let config = self.alphabet.config();
            let seeds = config.seed_range();
            println!(
                "Alphabet: {} (seeds {}..={}, first learned code {}, min width {} bits)",
                self.alphabet.name(),
                seeds.start(),
                seeds.end(),
                config.start_code(),
                config.min_code_width()
            );
        }
        if let Some(path) = &self.json_file {
            println!("JSON report: {}", path.display());
        }
        println!();
    }
}

fn take_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_level(value: &str) -> Result<tracing::Level, String> {
    match value.to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        other => Err(format!("unknown log level '{other}'")),
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn print_help() {
    println!("codec-viz: step-by-step Huffman and LZW compression");
    println!();
    println!("USAGE:");
    println!("    codec-viz [OPTIONS]");
    println!();
    println!("INPUT (default: {DEFAULT_TEXT}):");
    println!("    --text <STR>            Encode this text");
    println!("    --in <PATH>             Encode the bytes of a file");
    println!("    --sample <N>            Encode N bytes of generated sample text");
    println!("    --seed <N>              Seed for --sample (default: time-based)");
    println!();
    println!("ENGINES:");
    println!("    --mode <MODE>           huffman, lzw or both (default: both)");
    println!("    --alphabet <NAME>       LZW seeds: full-byte or printable (default: full-byte)");
    println!();
    println!("OUTPUT:");
    println!("    --steps                 Print every snapshot and step");
    println!("    --json <PATH>           Write the full run report as JSON");
    println!("    --print-config          Print resolved configuration");
    println!("    --no-summary            Don't print the size summary");
    println!("    --log-level <LEVEL>     trace, debug, info, warn or error (default: warn)");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    codec-viz                                   # Fixture, both engines");
    println!("    codec-viz --text TOBEORNOTTOBE --steps      # Show every step");
    println!("    codec-viz --sample 4096 --seed 42 --mode lzw --alphabet printable");
    println!("    codec-viz --in notes.txt --json run.json    # Export for a visualizer");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_zero_arguments() {
        let config = Config::from_args(&[]).unwrap();
        assert_eq!(config.input, InputSource::Text(DEFAULT_TEXT.to_string()));
        assert_eq!(config.mode, Mode::Both);
        assert_eq!(config.alphabet, Preset::FullByte);
        assert!(config.print_summary);
        assert!(!config.show_steps);
        assert_eq!(config.lzw_alphabet(), Some(AlphabetConfig::full_byte()));
    }

    #[test]
    fn test_full_arguments() {
        let config = Config::from_args(&args(&[
            "--text",
            "hello",
            "--mode",
            "lzw",
            "--alphabet",
            "printable",
            "--json",
            "out.json",
            "--steps",
            "--no-summary",
            "--log-level",
            "DEBUG",
        ]))
        .unwrap();

        assert_eq!(config.input, InputSource::Text("hello".to_string()));
        assert_eq!(config.mode, Mode::Lzw);
        assert_eq!(config.alphabet, Preset::PrintableAscii);
        assert_eq!(config.json_file, Some(PathBuf::from("out.json")));
        assert!(config.show_steps);
        assert!(!config.print_summary);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.load_input().unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_sample_with_seed() {
        let config = Config::from_args(&args(&["--sample", "64", "--seed", "7"])).unwrap();
        assert_eq!(config.input, InputSource::Sample { len: 64, seed: 7 });
        let first = config.load_input().unwrap();
        let second = config.load_input().unwrap();
        assert_eq!(first.len(), 64);
        assert_eq!(first, second);
    }

    #[test]
    fn test_huffman_mode_skips_lzw() {
        let config = Config::from_args(&args(&["--mode", "huffman"])).unwrap();
        assert!(config.mode.runs_huffman());
        assert_eq!(config.lzw_alphabet(), None);
    }

    #[test]
    fn test_errors() {
        assert!(Config::from_args(&args(&["--text"])).is_err());
        assert!(Config::from_args(&args(&["--mode", "deflate"])).is_err());
        assert!(Config::from_args(&args(&["--alphabet", "utf8"])).is_err());
        assert!(Config::from_args(&args(&["--sample", "lots"])).is_err());
        assert!(Config::from_args(&args(&["--log-level", "loud"])).is_err());
        assert!(Config::from_args(&args(&["--bogus"])).is_err());
        assert!(Config::from_args(&args(&["--text", "a", "--sample", "3"])).is_err());
    }
}
