//! Integration tests for the `chip8` binary.

use chip8_core as _;
use env_logger as _;
use log as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn chip8(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chip8"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run chip8")
}

fn create_rom(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn run_draws_a_glyph_and_prints_the_frame() {
    let temp_dir = tempfile::tempdir().unwrap();
    // LD V0, 0x0A ; LD F, V0 ; DRW V1, V1, 5 ; JP 0x206
    let rom = create_rom(
        temp_dir.path(),
        "glyph.ch8",
        &[0x60, 0x0A, 0xF0, 0x29, 0xD1, 0x15, 0x12, 0x06],
    );

    let output = chip8(&["run", rom.to_str().unwrap(), "--steps", "8"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("####."));
    assert!(lines[1].starts_with("#..#."));
    assert!(stdout.contains("pc=0x206 i=0x032"));
    assert!(stdout.contains("steps=8 faults=0"));
}

#[test]
fn run_reports_faults_but_keeps_going() {
    let temp_dir = tempfile::tempdir().unwrap();
    let rom = create_rom(temp_dir.path(), "ret.ch8", &[0x00, 0xEE]);

    let output = chip8(&["run", rom.to_str().unwrap(), "-n", "4"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("steps=4 faults=4"));
    assert!(stdout.contains("last fault: stack underflow"));
}

#[test]
fn halt_on_error_exits_nonzero() {
    let temp_dir = tempfile::tempdir().unwrap();
    let rom = create_rom(temp_dir.path(), "bad.ch8", &[0xFF, 0xFF]);

    let output = chip8(&["run", rom.to_str().unwrap(), "--halt-on-error"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("steps=1 faults=1"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("opcode 0xFFFF at 0x200"));
}

#[test]
fn run_rejects_missing_and_empty_roms() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("missing.ch8");
    let output = chip8(&["run", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("file not found"));

    let empty = create_rom(temp_dir.path(), "empty.ch8", &[]);
    let output = chip8(&["run", empty.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("0 bytes"));
}

#[test]
fn disasm_lists_the_program() {
    let temp_dir = tempfile::tempdir().unwrap();
    let rom = create_rom(
        temp_dir.path(),
        "list.ch8",
        &[0x00, 0xE0, 0x6A, 0x02, 0xDA, 0xB5, 0x22, 0x00],
    );

    let output = chip8(&["disasm", rom.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("CLS"));
    assert!(lines[1].contains("LD VA, 0x02"));
    assert!(lines[2].contains("DRW VA, VB, 5"));
    assert!(lines[3].starts_with("206: 2200  CALL 0x0200"));
}

#[test]
fn disasm_count_limits_rows() {
    let temp_dir = tempfile::tempdir().unwrap();
    let rom = create_rom(temp_dir.path(), "count.ch8", &[0x00, 0xE0, 0x00, 0xEE]);

    let output = chip8(&["disasm", rom.to_str().unwrap(), "--count", "1"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);
}

#[test]
fn help_and_version() {
    let output = chip8(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage: chip8"));

    let output = chip8(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("chip8 "));
}

#[test]
fn unknown_command_is_a_usage_error() {
    let output = chip8(&["explode"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown command"));
    assert!(stderr.contains("Usage:"));
}
