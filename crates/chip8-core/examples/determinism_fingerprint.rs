//! Seeded-run fingerprint used to compare interpreter behaviour across hosts.

use chip8_core::{CoreConfig, Machine, StepOutcome};
use log as _;
use proptest as _;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use tempfile as _;
use thiserror as _;

const STEPS: u64 = 2_000;

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

/// Random sprites scattered over the screen with a random glyph per draw.
fn program() -> Vec<u8> {
    [
        0xC03F, 0xC11F, 0xC20F, 0xF229, 0xD015, 0xF318, 0x7401, 0x3400, 0x1200, 0x1212,
    ]
    .iter()
    .flat_map(|word: &u16| word.to_be_bytes())
    .collect()
}

fn fingerprint() -> String {
    let mut machine = Machine::with_config(&CoreConfig {
        rng_seed: Some(0xC0FFEE),
        trace_instructions: false,
    });
    machine.load(&program()).expect("program fits");

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for _ in 0..STEPS {
        match machine.step() {
            StepOutcome::Retired { beep } => hash_bytes(&mut hash, &[0x10, u8::from(beep)]),
            StepOutcome::AwaitingKey { beep } => hash_bytes(&mut hash, &[0x11, u8::from(beep)]),
            StepOutcome::Fault { fault, beep } => {
                hash_bytes(&mut hash, &[0x12, fault.kind().as_u8(), u8::from(beep)]);
            }
        }
    }

    hash_bytes(&mut hash, &machine.program_counter().to_le_bytes());
    hash_bytes(&mut hash, &machine.index_register().to_le_bytes());
    hash_bytes(&mut hash, &[machine.stack_pointer(), machine.delay_timer(), machine.sound_timer()]);
    for index in 0..16 {
        hash_bytes(&mut hash, &[machine.register(index).unwrap_or(0)]);
    }
    hash_bytes(&mut hash, machine.display().frame());
    hash_bytes(&mut hash, machine.memory());

    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint());
}
