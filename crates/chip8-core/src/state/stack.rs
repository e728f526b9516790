//! Return-address stack for `2NNN`/`00EE`.

#![allow(clippy::cast_lossless)]

use crate::Fault;

/// Number of return-address slots.
pub const STACK_DEPTH: usize = 16;

/// Return-address stack. Pointer `0` is empty and `16` is full.
///
/// Calls store at `slots[sp]` and then increment; returns decrement and
/// then read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStack {
    slots: [u16; STACK_DEPTH],
    sp: u8,
}

impl CallStack {
    /// Current stack pointer (`0..=16`).
    #[must_use]
    pub const fn pointer(&self) -> u8 {
        self.sp
    }

    /// Returns `true` when all 16 slots are in use.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.sp as usize >= STACK_DEPTH
    }

    /// Returns `true` when no return address is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sp == 0
    }

    /// Reads a slot by index, independent of the pointer.
    ///
    /// # Errors
    ///
    /// Returns a `StackOverflow` fault for `slot >= 16`.
    pub fn slot(&self, slot: u8) -> Result<u16, Fault> {
        self.slots
            .get(usize::from(slot))
            .copied()
            .ok_or_else(|| Fault::invalid_stack_slot(slot))
    }

    /// Writes a slot by index, independent of the pointer.
    ///
    /// # Errors
    ///
    /// Returns a `StackOverflow` fault for `slot >= 16`.
    pub fn set_slot(&mut self, slot: u8, value: u16) -> Result<(), Fault> {
        let cell = self
            .slots
            .get_mut(usize::from(slot))
            .ok_or_else(|| Fault::invalid_stack_slot(slot))?;
        *cell = value;
        Ok(())
    }

    /// Moves the stack pointer.
    ///
    /// # Errors
    ///
    /// Returns a `StackOverflow` fault for `pointer > 16`.
    pub fn set_pointer(&mut self, pointer: u8) -> Result<(), Fault> {
        if usize::from(pointer) > STACK_DEPTH {
            return Err(Fault::invalid_stack_pointer(pointer));
        }
        self.sp = pointer;
        Ok(())
    }

    /// Pushes a return address; `None` when the stack is already full.
    pub fn push(&mut self, addr: u16) -> Option<()> {
        let cell = self.slots.get_mut(usize::from(self.sp))?;
        *cell = addr;
        self.sp += 1;
        Some(())
    }

    /// Pops the most recent return address; `None` when empty.
    pub fn pop(&mut self) -> Option<u16> {
        let top = self.sp.checked_sub(1)?;
        self.sp = top;
        Some(self.slots[usize::from(top)])
    }
}

#[cfg(test)]
mod tests {
    use super::{CallStack, STACK_DEPTH};
    use crate::FaultKind;

    #[test]
    fn push_then_pop_is_lifo() {
        let mut stack = CallStack::default();
        assert!(stack.is_empty());
        stack.push(0x200).expect("room");
        stack.push(0x300).expect("room");
        assert_eq!(stack.pointer(), 2);
        assert_eq!(stack.slot(1), Ok(0x300));
        assert_eq!(stack.pop(), Some(0x300));
        assert_eq!(stack.pop(), Some(0x200));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.pointer(), 0);
    }

    #[test]
    fn full_stack_rejects_push_without_mutation() {
        let mut stack = CallStack::default();
        for n in 0..STACK_DEPTH {
            stack.push(u16::try_from(n).expect("small")).expect("room");
        }
        assert!(stack.is_full());
        let before = stack.clone();
        assert_eq!(stack.push(0xFFF), None);
        assert_eq!(stack, before);
    }

    #[test]
    fn pointer_accepts_exact_full_boundary_only() {
        let mut stack = CallStack::default();
        assert_eq!(stack.set_pointer(16), Ok(()));
        let fault = stack.set_pointer(17).expect_err("above full");
        assert_eq!(fault.kind(), FaultKind::StackOverflow);
        assert_eq!(stack.pointer(), 16);
    }

    #[test]
    fn slot_index_is_bounded() {
        let mut stack = CallStack::default();
        assert_eq!(stack.set_slot(15, 0xABC), Ok(()));
        assert_eq!(stack.slot(15), Ok(0xABC));
        let fault = stack.set_slot(16, 1).expect_err("slot 16");
        assert_eq!(fault.kind(), FaultKind::StackOverflow);
        assert!(fault.message().contains("16"));
        assert!(stack.slot(200).is_err());
    }
}
