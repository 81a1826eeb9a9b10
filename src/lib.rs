//! NES 2A03 (6502-derived) CPU core.
//!
//! The crate emulates the processor only: register file, flat 64 KiB
//! address space, descending page-1 stack, and the full documented
//! instruction set behind a table-driven fetch-decode-execute loop.
//! ROM parsing, mappers, PPU/APU, input, and the host timing loop are
//! external collaborators; a loader hands this core a byte buffer via
//! [`Cpu::load`] and a driver steps it with [`Cpu::step`].

mod cpu;
mod memory;
mod savestate;

pub use cpu::opcodes::{OpCode, Operation, OPCODE_TABLE};
pub use cpu::{
    AddressingMode, Cpu, CpuError, StatusFlags, IRQ_VECTOR, NMI_VECTOR, PROGRAM_ORIGIN,
    RESET_VECTOR, STACK_BASE, STACK_RESET,
};
pub use memory::Memory;
pub use savestate::{CpuSnapshot, SnapshotError};
