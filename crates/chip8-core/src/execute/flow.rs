//! Program-counter updates produced by executed instructions.

use crate::INSTRUCTION_BYTES;

/// Describes how `PC` moves once an instruction has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PcUpdate {
    /// Advance to the following instruction.
    #[default]
    Next,
    /// Skip the following instruction.
    Skip,
    /// Transfer control to an absolute address.
    Jump(u16),
    /// Stay on the current instruction.
    Hold,
}

impl PcUpdate {
    /// Resolves the update against the address of the executing instruction.
    #[must_use]
    pub const fn apply(self, pc: u16) -> u16 {
        match self {
            Self::Next => pc.wrapping_add(INSTRUCTION_BYTES),
            Self::Skip => pc.wrapping_add(2 * INSTRUCTION_BYTES),
            Self::Jump(target) => target,
            Self::Hold => pc,
        }
    }

    /// `Skip` when `condition` holds, otherwise `Next`.
    #[must_use]
    pub const fn skip_if(condition: bool) -> Self {
        if condition {
            Self::Skip
        } else {
            Self::Next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PcUpdate;

    #[test]
    fn updates_resolve_relative_to_current_pc() {
        assert_eq!(PcUpdate::Next.apply(0x200), 0x202);
        assert_eq!(PcUpdate::Skip.apply(0x200), 0x204);
        assert_eq!(PcUpdate::Jump(0x345).apply(0x200), 0x345);
        assert_eq!(PcUpdate::Hold.apply(0x200), 0x200);
        assert_eq!(PcUpdate::skip_if(false), PcUpdate::Next);
    }
}
