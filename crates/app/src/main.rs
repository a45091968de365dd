//! codec-viz: run the Huffman and LZW engines over one input and report
//! every step.

mod config;
mod input_gen;
mod render;

use codec_viz_core::RunReport;
use config::Config;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: tracing subscriber already installed");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> codec_viz_core::Result<()> {
    if config.print_config {
        config.print();
    }

    let input = config.load_input()?;
    info!(bytes = input.len(), mode = ?config.mode, "input loaded");

    let alphabet = config.lzw_alphabet();
    let report = RunReport::new(&input, config.mode.runs_huffman(), alphabet.as_ref())?;
    report.verify()?;
    info!(crc32 = report.input_crc32, "round trip verified");

    if config.show_steps {
        if let Some(huffman) = &report.huffman {
            render::print_huffman_steps(huffman);
        }
        if let Some(lzw) = &report.lzw {
            render::print_lzw_steps(lzw);
        }
    }

    if config.print_summary {
        render::print_summary(&report);
    }

    if let Some(path) = &config.json_file {
        std::fs::write(path, report.to_json_pretty()?)?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}
