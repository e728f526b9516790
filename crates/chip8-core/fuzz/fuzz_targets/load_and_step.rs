#![no_main]

use chip8_core::{
    disassemble_instruction, validate_fetch_access, validate_range, CoreConfig, Decoder, Machine,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let word = u16::from_be_bytes([data[0], data[1]]);
    let addr = u16::from_be_bytes([data[2], data[3]]);

    let _ = Decoder::decode(word);
    let _ = disassemble_instruction(word);
    let _ = validate_fetch_access(addr);
    let _ = validate_range(usize::from(addr), usize::from(data[0]));

    let mut machine = Machine::with_config(&CoreConfig {
        rng_seed: Some(u64::from(word)),
        trace_instructions: false,
    });
    if machine.load(&data[4..]).is_err() {
        return;
    }
    machine.set_key(data[2] & 0x0F, true);
    let summary = machine.run_steps(256, false);
    assert_eq!(summary.steps, 256);
    assert!(machine.stack_pointer() <= 16);
});
