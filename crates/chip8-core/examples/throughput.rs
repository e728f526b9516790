//! Step-throughput harness for the interpreter core.
//!
//! ## Usage
//!
//! ```sh
//! cargo run -p chip8-core --release --example throughput
//! ```
//!
//! Reports steps per second for a few representative instruction mixes and
//! how many machines could run side by side at the default cadence.

#![allow(clippy::pedantic)]

use chip8_core::{Cadence, CoreConfig, Machine};
use log as _;
use proptest as _;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use tempfile as _;
use thiserror as _;

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const NUM_THREADS: usize = 4;
const BATCH_STEPS: u64 = 4_096;

#[derive(Debug, Clone, Copy)]
struct BenchmarkResult {
    name: &'static str,
    steps_per_second: f64,
    machines_at_cadence: f64,
}

fn assemble(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

/// Register arithmetic and a jump back to the start.
fn alu_program() -> Vec<u8> {
    assemble(&[0x6001, 0x6102, 0x8014, 0x8015, 0x8016, 0x801E, 0x7001, 0x1200])
}

/// Register dumps and reloads through `I`.
fn memory_program() -> Vec<u8> {
    assemble(&[0xA400, 0xFF55, 0xFF65, 0xF033, 0x1200])
}

/// Sprite drawing across the wrap edges plus a subroutine call.
fn draw_program() -> Vec<u8> {
    assemble(&[
        0x603C, 0x611E, 0x6207, 0xF229, 0xD015, 0x2214, 0x7005, 0x1206, 0x0000, 0x0000, 0x00EE,
    ])
}

fn benchmark(name: &'static str, program: fn() -> Vec<u8>, duration: Duration) -> BenchmarkResult {
    let (tx, rx) = mpsc::channel();

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|seed| {
            let tx = tx.clone();
            thread::spawn(move || {
                let mut machine = Machine::with_config(&CoreConfig {
                    rng_seed: Some(seed as u64),
                    trace_instructions: false,
                });
                if machine.load(&program()).is_err() {
                    return;
                }

                let mut total_steps = 0u64;
                let start = Instant::now();
                while start.elapsed() < duration {
                    total_steps += machine.run_steps(BATCH_STEPS, false).steps;
                }
                tx.send(total_steps).ok();
            })
        })
        .collect();

    for handle in handles {
        handle.join().ok();
    }
    drop(tx);

    let total_steps: u64 = rx.iter().sum();
    let steps_per_second = total_steps as f64 / duration.as_secs_f64();
    BenchmarkResult {
        name,
        steps_per_second,
        machines_at_cadence: steps_per_second / f64::from(Cadence::default().steps_per_second()),
    }
}

fn format_number(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.2}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.2}K", n / 1_000.0)
    } else {
        format!("{n:.2}")
    }
}

fn print_results(results: &[BenchmarkResult]) {
    let cadence = Cadence::default();
    println!("\nthreads: {NUM_THREADS}");
    println!(
        "cadence: {} steps/s ({:?} per step)",
        cadence.steps_per_second(),
        cadence.step_interval()
    );
    println!("{:12} | {:>12} | {:>12}", "mix", "steps/sec", "machines");
    println!("{:-<12}-+-{:-<12}-+-{:-<12}", "", "", "");
    for result in results {
        println!(
            "{:12} | {:>12} | {:>12}",
            result.name,
            format_number(result.steps_per_second),
            format_number(result.machines_at_cadence)
        );
    }
}

fn main() {
    let warmup = Duration::from_millis(500);
    let benchmark_duration = Duration::from_secs(3);

    println!("Running warmup for {warmup:?}...");
    let _ = benchmark("alu", alu_program, warmup);

    println!("Running benchmarks for {benchmark_duration:?} each...");
    let results = [
        benchmark("alu", alu_program, benchmark_duration),
        benchmark("memory", memory_program, benchmark_duration),
        benchmark("draw", draw_program, benchmark_duration),
    ];
    print_results(&results);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mix_runs_without_faults() {
        for program in [alu_program, memory_program, draw_program] {
            let mut machine = Machine::new();
            machine.load(&program()).expect("fits");
            let summary = machine.run_steps(1_000, false);
            assert_eq!(summary.faults, 0, "{:?}", summary.last_fault);
        }
    }

    #[test]
    fn benchmark_reports_progress() {
        let result = benchmark("alu", alu_program, Duration::from_millis(50));
        assert!(result.steps_per_second > 0.0);
        assert!(result.machines_at_cadence > 0.0);
    }
}
