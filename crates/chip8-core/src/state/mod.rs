//! Machine state model primitives.

/// Register file types and storage model.
pub mod registers;
/// Return-address stack.
pub mod stack;
/// Delay and sound timers.
pub mod timers;

pub use registers::{Register, RegisterFile, GENERAL_REGISTER_COUNT};
pub use stack::{CallStack, STACK_DEPTH};
pub use timers::Timers;
