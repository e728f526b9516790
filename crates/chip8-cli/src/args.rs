//! Command-line parsing for the `chip8` binary.

use std::ffi::OsString;
use std::path::PathBuf;

use chip8_core::DEFAULT_STEPS_PER_SECOND;

pub const USAGE_TEXT: &str = "\
Usage: chip8 <command> [options]

Commands:
  run    <rom> [options]        Execute a ROM headlessly and print the final frame
  disasm <rom> [--count <n>]    List the ROM as CHIP-8 assembly

Run options:
  -n, --steps <n>      Steps to execute (default: 540)
  -s, --seed <n>       Seed for the CXNN random source
  -k, --key <hex>      Hold a key (0-F) for the whole run; repeatable
      --hz <n>         Pace execution at n steps per second
      --halt-on-error  Stop at the first fault and exit with status 1
      --trace          Log every executed instruction
  -v, --verbose        Raise the default log level to debug

Disasm options:
  -c, --count <n>      Instruction words to list (default: whole ROM)

Options:
  -h, --help           Show this help message
  -V, --version        Print the version

Examples:
  chip8 run pong.ch8 --steps 2000 --seed 7
  chip8 run keypad.ch8 --key a --key 5
  chip8 disasm pong.ch8 --count 16
";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(RunArgs),
    Disasm(DisasmArgs),
}

#[derive(Debug, PartialEq, Eq)]
pub struct RunArgs {
    pub rom: PathBuf,
    pub steps: u64,
    pub seed: Option<u64>,
    pub keys: Vec<u8>,
    pub hz: Option<u32>,
    pub halt_on_error: bool,
    pub trace: bool,
    pub verbose: bool,
}

impl RunArgs {
    fn new(rom: PathBuf) -> Self {
        Self {
            rom,
            steps: u64::from(DEFAULT_STEPS_PER_SECOND),
            seed: None,
            keys: Vec::new(),
            hz: None,
            halt_on_error: false,
            trace: false,
            verbose: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct DisasmArgs {
    pub rom: PathBuf,
    pub count: Option<usize>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    Command(Command),
    Help,
    Version,
}

pub fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }
    if first == "--version" || first == "-V" {
        return Ok(ParseResult::Version);
    }

    let command = first.to_string_lossy().into_owned();
    match command.as_str() {
        "run" => Ok(parse_run_args(args)?
            .map_or(ParseResult::Help, |run| ParseResult::Command(Command::Run(run)))),
        "disasm" => Ok(parse_disasm_args(args)?.map_or(ParseResult::Help, |disasm| {
            ParseResult::Command(Command::Disasm(disasm))
        })),
        other => Err(format!("unknown command: {other}")),
    }
}

fn value_for(flag: &str, args: &mut impl Iterator<Item = OsString>) -> Result<String, String> {
    args.next()
        .map(|value| value.to_string_lossy().into_owned())
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn parse_number<T: std::str::FromStr>(flag: &str, text: &str) -> Result<T, String> {
    text.parse()
        .map_err(|_| format!("invalid value for {flag}: {text}"))
}

fn parse_key(text: &str) -> Result<u8, String> {
    let trimmed = text.trim_start_matches("0x");
    match u8::from_str_radix(trimmed, 16) {
        Ok(key) if key < 16 => Ok(key),
        _ => Err(format!("invalid key: {text} (expected 0-F)")),
    }
}

fn take_rom(rom: &mut Option<PathBuf>, arg: OsString) -> Result<(), String> {
    if arg.to_string_lossy().starts_with('-') {
        return Err(format!("unknown option: {}", arg.to_string_lossy()));
    }
    if rom.is_some() {
        return Err("multiple rom paths provided".to_string());
    }
    *rom = Some(PathBuf::from(arg));
    Ok(())
}

/// `Ok(None)` when `--help` was requested.
#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<Option<RunArgs>, String> {
    let mut rom: Option<PathBuf> = None;
    let mut parsed = RunArgs::new(PathBuf::new());

    while let Some(arg) = args.next() {
        let flag = arg.to_string_lossy().into_owned();
        match flag.as_str() {
            "-h" | "--help" => return Ok(None),
            "-n" | "--steps" => {
                let text = value_for("--steps", &mut args)?;
                parsed.steps = parse_number("--steps", &text)?;
            }
            "-s" | "--seed" => {
                let text = value_for("--seed", &mut args)?;
                parsed.seed = Some(parse_number("--seed", &text)?);
            }
            "-k" | "--key" => {
                let text = value_for("--key", &mut args)?;
                parsed.keys.push(parse_key(&text)?);
            }
            "--hz" => {
                let text = value_for("--hz", &mut args)?;
                let hz: u32 = parse_number("--hz", &text)?;
                if hz == 0 {
                    return Err("--hz must be greater than zero".to_string());
                }
                parsed.hz = Some(hz);
            }
            "--halt-on-error" => parsed.halt_on_error = true,
            "--trace" => parsed.trace = true,
            "-v" | "--verbose" => parsed.verbose = true,
            _ => take_rom(&mut rom, arg)?,
        }
    }

    parsed.rom = rom.ok_or_else(|| "missing rom path".to_string())?;
    Ok(Some(parsed))
}

/// `Ok(None)` when `--help` was requested.
#[allow(clippy::while_let_on_iterator)]
fn parse_disasm_args(
    mut args: impl Iterator<Item = OsString>,
) -> Result<Option<DisasmArgs>, String> {
    let mut rom: Option<PathBuf> = None;
    let mut count = None;

    while let Some(arg) = args.next() {
        let flag = arg.to_string_lossy().into_owned();
        match flag.as_str() {
            "-h" | "--help" => return Ok(None),
            "-c" | "--count" => {
                let text = value_for("--count", &mut args)?;
                count = Some(parse_number("--count", &text)?);
            }
            _ => take_rom(&mut rom, arg)?,
        }
    }

    let rom = rom.ok_or_else(|| "missing rom path".to_string())?;
    Ok(Some(DisasmArgs { rom, count }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(args: &[&str]) -> impl Iterator<Item = OsString> {
        args.iter()
            .map(|arg| OsString::from(*arg))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parses_run_with_every_option() {
        let result = parse_args(os(&[
            "run",
            "pong.ch8",
            "--steps",
            "100",
            "-s",
            "42",
            "--key",
            "a",
            "-k",
            "0x5",
            "--hz",
            "60",
            "--halt-on-error",
            "--trace",
            "-v",
        ]))
        .expect("valid run args should parse");

        assert_eq!(
            result,
            ParseResult::Command(Command::Run(RunArgs {
                rom: PathBuf::from("pong.ch8"),
                steps: 100,
                seed: Some(42),
                keys: vec![0xA, 0x5],
                hz: Some(60),
                halt_on_error: true,
                trace: true,
                verbose: true,
            }))
        );
    }

    #[test]
    fn run_defaults_to_one_second_of_steps() {
        let result = parse_args(os(&["run", "rom.ch8"])).expect("parses");
        let ParseResult::Command(Command::Run(run)) = result else {
            panic!("expected run command");
        };
        assert_eq!(run.steps, 540);
        assert_eq!(run.seed, None);
        assert!(run.keys.is_empty());
        assert_eq!(run.hz, None);
    }

    #[test]
    fn parses_disasm_count() {
        let result = parse_args(os(&["disasm", "rom.ch8", "-c", "8"])).expect("parses");
        assert_eq!(
            result,
            ParseResult::Command(Command::Disasm(DisasmArgs {
                rom: PathBuf::from("rom.ch8"),
                count: Some(8),
            }))
        );
    }

    #[test]
    fn parses_help_and_version() {
        assert_eq!(parse_args(os(&["--help"])), Ok(ParseResult::Help));
        assert_eq!(parse_args(os(&["run", "--help"])), Ok(ParseResult::Help));
        assert_eq!(parse_args(os(&["-V"])), Ok(ParseResult::Version));
    }

    #[test]
    fn rejects_bad_input() {
        let cases: [(&[&str], &str); 7] = [
            (&["launch"], "unknown command"),
            (&["run"], "missing rom path"),
            (&["run", "a.ch8", "b.ch8"], "multiple rom paths"),
            (&["run", "a.ch8", "--key", "10"], "invalid key"),
            (&["run", "a.ch8", "--steps"], "missing value for --steps"),
            (&["run", "a.ch8", "--hz", "0"], "greater than zero"),
            (&["disasm", "a.ch8", "--bogus"], "unknown option"),
        ];
        for (args, expected) in cases {
            let error = parse_args(os(args)).expect_err("should fail");
            assert!(error.contains(expected), "{args:?}: {error}");
        }
    }

    #[test]
    fn rejects_missing_command() {
        let error = parse_args(std::iter::empty()).expect_err("should fail");
        assert!(error.contains("missing command"));
    }
}
