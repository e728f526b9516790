use std::path::Path;

use thiserror::Error;

/// Fault taxonomy shared by the accessor layer, the execution engine and the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultKind {
    /// Memory or program-counter reference outside `0x000..=0xFFF`.
    #[error("invalid address")]
    InvalidAddress = 0x01,
    /// Register index outside `V0..=VF`.
    #[error("invalid register")]
    InvalidRegister = 0x02,
    /// Call with a full stack, stack pointer above 16, or stack slot index >= 16.
    #[error("stack overflow")]
    StackOverflow = 0x03,
    /// Return with an empty call stack.
    #[error("stack underflow")]
    StackUnderflow = 0x04,
    /// Instruction word matches no defined family/sub-opcode.
    #[error("unknown opcode")]
    UnknownOpcode = 0x05,
    /// ROM source is missing or unreadable.
    #[error("file not found")]
    FileNotFound = 0x06,
    /// ROM is empty or larger than program space.
    #[error("invalid rom size")]
    InvalidRomSize = 0x07,
}

impl FaultKind {
    /// Converts a fault kind to its stable numeric code.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable numeric code back into a fault kind.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::InvalidAddress),
            0x02 => Some(Self::InvalidRegister),
            0x03 => Some(Self::StackOverflow),
            0x04 => Some(Self::StackUnderflow),
            0x05 => Some(Self::UnknownOpcode),
            0x06 => Some(Self::FileNotFound),
            0x07 => Some(Self::InvalidRomSize),
            _ => None,
        }
    }

    /// Faults raised while sourcing a program rather than while running one.
    #[must_use]
    pub const fn is_loader(self) -> bool {
        matches!(self, Self::FileNotFound | Self::InvalidRomSize)
    }
}

/// A fault kind paired with a human-readable diagnostic.
///
/// Messages always carry the offending value so hosts can surface them
/// verbatim. Addresses and opcodes are rendered in hexadecimal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[error("{kind}: {message}")]
pub struct Fault {
    kind: FaultKind,
    message: String,
}

impl Fault {
    /// Builds a fault from a kind and a free-form message.
    #[must_use]
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the fault kind.
    #[must_use]
    pub const fn kind(&self) -> FaultKind {
        self.kind
    }

    /// Returns the diagnostic message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Appends the address of the instruction that raised the fault.
    #[must_use]
    pub fn at_pc(mut self, pc: u16) -> Self {
        self.message = format!("{} at 0x{pc:03X}", self.message);
        self
    }

    /// Memory access outside the address space.
    #[must_use]
    pub fn invalid_address(addr: usize) -> Self {
        Self::new(
            FaultKind::InvalidAddress,
            format!("memory address 0x{addr:03X} is outside 0x000..=0xFFF"),
        )
    }

    /// Multi-byte access whose last byte falls outside the address space.
    #[must_use]
    pub fn invalid_range(start: usize, len: usize) -> Self {
        let end = start.saturating_add(len.saturating_sub(1));
        Self::new(
            FaultKind::InvalidAddress,
            format!("memory range 0x{start:03X}..=0x{end:03X} exceeds 0xFFF"),
        )
    }

    /// Program counter outside the fetchable window.
    #[must_use]
    pub fn invalid_pc(pc: u16) -> Self {
        Self::new(
            FaultKind::InvalidAddress,
            format!("program counter 0x{pc:04X} cannot fetch a full instruction"),
        )
    }

    /// Register index outside `V0..=VF`.
    #[must_use]
    pub fn invalid_register(index: u8) -> Self {
        Self::new(
            FaultKind::InvalidRegister,
            format!("register V{index:X} does not exist"),
        )
    }

    /// Display coordinate outside the 64×32 grid.
    #[must_use]
    pub fn invalid_pixel(x: usize, y: usize) -> Self {
        Self::new(
            FaultKind::InvalidAddress,
            format!("pixel ({x}, {y}) / (0x{x:02X}, 0x{y:02X}) is outside the 64x32 display"),
        )
    }

    /// Program counter write outside `0x000..=0xFFF`.
    #[must_use]
    pub fn invalid_jump(target: usize) -> Self {
        Self::new(
            FaultKind::InvalidAddress,
            format!("jump target 0x{target:03X} is outside 0x000..=0xFFF"),
        )
    }

    /// Stack slot index outside the 16-entry stack.
    #[must_use]
    pub fn invalid_stack_slot(slot: u8) -> Self {
        Self::new(
            FaultKind::StackOverflow,
            format!("stack slot {slot} (0x{slot:02X}) is outside 0..16"),
        )
    }

    /// Stack pointer write above the full boundary.
    #[must_use]
    pub fn invalid_stack_pointer(pointer: u8) -> Self {
        Self::new(
            FaultKind::StackOverflow,
            format!("stack pointer {pointer} (0x{pointer:02X}) exceeds 16"),
        )
    }

    /// `2NNN` issued with all 16 stack slots in use.
    #[must_use]
    pub fn stack_overflow(pc: u16, target: u16) -> Self {
        Self::new(
            FaultKind::StackOverflow,
            format!("call to 0x{target:03X} at 0x{pc:03X} with a full stack"),
        )
    }

    /// `00EE` issued with an empty stack.
    #[must_use]
    pub fn stack_underflow(pc: u16) -> Self {
        Self::new(
            FaultKind::StackUnderflow,
            format!("return at 0x{pc:03X} with an empty stack"),
        )
    }

    /// Instruction word not recognised by the decoder.
    #[must_use]
    pub fn unknown_opcode(word: u16) -> Self {
        Self::new(FaultKind::UnknownOpcode, format!("opcode 0x{word:04X}"))
    }

    /// Glyph lookup for a value that is not a hex digit.
    #[must_use]
    pub fn invalid_glyph(value: u8) -> Self {
        Self::new(
            FaultKind::InvalidAddress,
            format!("no font glyph for value 0x{value:02X}"),
        )
    }

    /// ROM source path could not be opened or read.
    #[must_use]
    pub fn file_not_found(path: &Path, detail: &std::io::Error) -> Self {
        Self::new(
            FaultKind::FileNotFound,
            format!("cannot read rom {}: {detail}", path.display()),
        )
    }

    /// ROM length outside `1..=max` bytes.
    #[must_use]
    pub fn invalid_rom_size(len: usize, max: usize) -> Self {
        Self::new(
            FaultKind::InvalidRomSize,
            format!("rom is {len} bytes; expected 1..={max} bytes"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Fault, FaultKind};

    #[test]
    fn stable_code_roundtrip_is_bijective_for_defined_values() {
        for code in 0x01u8..=0x07 {
            let kind = FaultKind::from_u8(code).expect("defined taxonomy code");
            assert_eq!(kind.as_u8(), code);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(FaultKind::from_u8(0x00).is_none());
        assert!(FaultKind::from_u8(0x08).is_none());
        assert!(FaultKind::from_u8(0xFF).is_none());
    }

    #[test]
    fn loader_classification_covers_only_rom_sourcing() {
        assert!(FaultKind::FileNotFound.is_loader());
        assert!(FaultKind::InvalidRomSize.is_loader());
        assert!(!FaultKind::InvalidAddress.is_loader());
        assert!(!FaultKind::UnknownOpcode.is_loader());
    }

    #[test]
    fn messages_carry_the_offending_value_in_hex() {
        assert!(Fault::invalid_address(0x1000).message().contains("0x1000"));
        assert!(Fault::invalid_register(20).message().contains("V14"));
        assert!(Fault::invalid_stack_slot(20).message().contains("20"));
        assert!(Fault::unknown_opcode(0x00FF).message().contains("0x00FF"));
        assert!(Fault::invalid_rom_size(0, 3584).message().contains("bytes"));
    }

    #[test]
    fn range_fault_saturates_at_the_top_of_usize() {
        let fault = Fault::invalid_range(usize::MAX, 2);
        assert_eq!(fault.kind(), FaultKind::InvalidAddress);
        assert!(fault.message().contains(&format!("0x{:03X}", usize::MAX)));
    }

    #[test]
    fn display_prefixes_kind() {
        let fault = Fault::stack_underflow(0x200);
        assert_eq!(fault.kind(), FaultKind::StackUnderflow);
        assert_eq!(
            fault.to_string(),
            "stack underflow: return at 0x200 with an empty stack"
        );
    }
}
