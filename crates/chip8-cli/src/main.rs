//! CLI entry point for the headless CHIP-8 runner.

mod args;
mod render;
mod runner;

use std::env;

use args::{parse_args, Command, ParseResult, USAGE_TEXT};
use env_logger::Env;
#[cfg(test)]
use tempfile as _;

fn init_logging(command: &ParseResult) {
    let default_level = match command {
        ParseResult::Command(Command::Run(run)) if run.trace => "trace",
        ParseResult::Command(Command::Run(run)) if run.verbose => "debug",
        _ => "warn",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
}

fn main() {
    let parsed = parse_args(env::args_os().skip(1));
    if let Ok(command) = &parsed {
        init_logging(command);
    }

    let exit_code = match parsed {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Version) => {
            println!("chip8 {}", chip8_core::VERSION);
            0
        }
        Ok(ParseResult::Command(Command::Run(args))) => match runner::run(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Ok(ParseResult::Command(Command::Disasm(args))) => match runner::disasm(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            2
        }
    };

    std::process::exit(exit_code);
}
