//! 2A03 CPU core: registers, status flags, stack, addressing-mode
//! resolution, and the table-driven fetch-decode-execute loop.
//!
//! The interpreter is single-threaded and synchronous. A driver owns
//! the instance and advances it one instruction at a time with
//! [`Cpu::step`]; NMI/IRQ lines are latched with
//! [`Cpu::request_nmi`]/[`Cpu::request_irq`] and polled at instruction
//! boundaries.

use bitflags::bitflags;

use crate::memory::Memory;

pub mod opcodes;


use opcodes::{OpCode, Operation, OPCODE_TABLE};

/// Stack lives in page 1; the stack pointer is an offset into it.
pub const STACK_BASE: u16 = 0x0100;
/// Power-on / reset value of the stack pointer.
pub const STACK_RESET: u8 = 0xFD;
/// Canonical program origin used by [`Cpu::load`].
pub const PROGRAM_ORIGIN: u16 = 0x8000;

/// Non-maskable interrupt vector.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

bitflags! {
    /// Processor status register, one bit per flag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const CARRY = 0b0000_0001;
        const ZERO = 0b0000_0010;
        const INTERRUPT_DISABLE = 0b0000_0100;
        const DECIMAL = 0b0000_1000;
        const BREAK = 0b0001_0000;
        const UNUSED = 0b0010_0000;
        const OVERFLOW = 0b0100_0000;
        const NEGATIVE = 0b1000_0000;
    }
}

/// Status byte after reset: unused + interrupt-disable set.
const STATUS_RESET: u8 = 0b0010_0100;

/// How an instruction locates its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate,
    ZeroPage,
    Absolute,
    ZeroPageX,
    ZeroPageY,
    AbsoluteX,
    AbsoluteY,
    IndirectX,
    IndirectY,
    Relative,
    Accumulator,
    /// JMP only, with the page-boundary wraparound quirk.
    Indirect,
    NoneAddressing,
}

impl AddressingMode {
    /// Instruction-stream bytes the operand occupies after the opcode.
    pub const fn operand_bytes(self) -> u16 {
        match self {
            AddressingMode::Accumulator | AddressingMode::NoneAddressing => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

/// Reportable execution faults. The dispatcher never panics on bad
/// program bytes; the driver decides whether to halt, log, or resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// The fetched byte has no entry in the opcode table. `pc` is the
    /// address the opcode was fetched from.
    UndefinedOpcode { opcode: u8, pc: u16 },
}

impl std::fmt::Display for CpuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CpuError::UndefinedOpcode { opcode, pc } => {
                write!(f, "undefined opcode {opcode:#04X} at {pc:#06X}")
            }
        }
    }
}

impl std::error::Error for CpuError {}

pub struct Cpu {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: StatusFlags,
    pub memory: Memory,
    nmi_pending: bool,
    irq_pending: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            a: 0,
            x: 0,
            y: 0,
            sp: STACK_RESET,
            pc: 0,
            status: StatusFlags::from_bits_truncate(STATUS_RESET),
            memory: Memory::new(),
            nmi_pending: false,
            irq_pending: false,
        }
    }

    /// Copy a program image to the canonical origin and point the
    /// reset vector at it.
    pub fn load(&mut self, program: &[u8]) {
        self.load_at(PROGRAM_ORIGIN, program);
    }

    /// Copy a program image to `origin` and point the reset vector at it.
    pub fn load_at(&mut self, origin: u16, program: &[u8]) {
        self.memory.load_at(origin, program);
        self.memory.write_u16(RESET_VECTOR, origin);
    }

    /// Power-on state: registers cleared, status `0b0010_0100`, stack
    /// pointer `0xFD`, program counter from the reset vector.
    pub fn reset(&mut self) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = STACK_RESET;
        self.status = StatusFlags::from_bits_truncate(STATUS_RESET);
        self.pc = self.memory.read_u16(RESET_VECTOR);
        self.nmi_pending = false;
        self.irq_pending = false;
    }

    /// Latch the NMI line; serviced before the next instruction.
    pub fn request_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Latch the IRQ line; serviced before the next instruction unless
    /// interrupts are disabled, in which case it stays pending.
    pub fn request_irq(&mut self) {
        self.irq_pending = true;
    }

    /// Execute exactly one instruction (servicing a pending interrupt
    /// first). Undefined opcodes are reported, not executed: registers
    /// are left untouched and the program counter rests just past the
    /// offending byte.
    pub fn step(&mut self) -> Result<(), CpuError> {
        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(NMI_VECTOR);
        } else if self.irq_pending && !self.status.contains(StatusFlags::INTERRUPT_DISABLE) {
            self.irq_pending = false;
            self.interrupt(IRQ_VECTOR);
        }

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", self.trace());
        }

        let pc = self.pc;
        let opcode = self.memory.read(pc);
        self.pc = self.pc.wrapping_add(1);

        let Some(entry) = OPCODE_TABLE[opcode as usize] else {
            log::warn!("undefined opcode {opcode:#04X} at {pc:#06X}");
            return Err(CpuError::UndefinedOpcode { opcode, pc });
        };

        // pc points at the first operand byte here; the resolver reads
        // it without mutating anything.
        let operand = self.operand_address(entry.mode);
        self.pc = self.pc.wrapping_add(entry.operand_bytes());
        self.execute(entry, operand);
        Ok(())
    }

    /// Run until a reportable condition stops the loop. The baseline
    /// instruction set has no halt, so this returns only by error.
    pub fn run(&mut self) -> Result<(), CpuError> {
        loop {
            self.step()?;
        }
    }

    /// Like [`Cpu::run`] but invokes `callback` before every
    /// instruction, the seam an external scheduler drives.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<(), CpuError>
    where
        F: FnMut(&mut Cpu),
    {
        loop {
            callback(self);
            self.step()?;
        }
    }

    /// One-line execution trace for the instruction at the current
    /// program counter.
    pub fn trace(&self) -> String {
        let opcode = self.memory.read(self.pc);
        let mnemonic = OPCODE_TABLE[opcode as usize].map_or("???", |e| e.mnemonic());
        format!(
            "{:04X}  {:02X}  {}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
            self.pc,
            opcode,
            mnemonic,
            self.a,
            self.x,
            self.y,
            self.status.bits(),
            self.sp
        )
    }

    /// Effective operand address for `mode`, with the program counter
    /// at the first operand byte. Pure: reads registers and memory,
    /// mutates neither.
    fn operand_address(&self, mode: AddressingMode) -> u16 {
        match mode {
            // The operand byte itself is the target.
            AddressingMode::Immediate | AddressingMode::Relative => self.pc,
            AddressingMode::ZeroPage => self.memory.read(self.pc) as u16,
            AddressingMode::Absolute => self.memory.read_u16(self.pc),
            // Zero-page indexing wraps within page zero.
            AddressingMode::ZeroPageX => self.memory.read(self.pc).wrapping_add(self.x) as u16,
            AddressingMode::ZeroPageY => self.memory.read(self.pc).wrapping_add(self.y) as u16,
            // Absolute indexing may cross a page.
            AddressingMode::AbsoluteX => {
                self.memory.read_u16(self.pc).wrapping_add(self.x as u16)
            }
            AddressingMode::AbsoluteY => {
                self.memory.read_u16(self.pc).wrapping_add(self.y as u16)
            }
            AddressingMode::IndirectX => {
                let ptr = self.memory.read(self.pc).wrapping_add(self.x);
                let lo = self.memory.read(ptr as u16) as u16;
                let hi = self.memory.read(ptr.wrapping_add(1) as u16) as u16;
                (hi << 8) | lo
            }
            AddressingMode::IndirectY => {
                let ptr = self.memory.read(self.pc);
                let lo = self.memory.read(ptr as u16) as u16;
                let hi = self.memory.read(ptr.wrapping_add(1) as u16) as u16;
                ((hi << 8) | lo).wrapping_add(self.y as u16)
            }
            AddressingMode::Indirect => {
                let ptr = self.memory.read_u16(self.pc);
                let lo = self.memory.read(ptr) as u16;
                // Hardware quirk: a pointer ending in 0xFF fetches its
                // high byte from the start of the same page.
                let hi = if ptr & 0x00FF == 0x00FF {
                    self.memory.read(ptr & 0xFF00) as u16
                } else {
                    self.memory.read(ptr.wrapping_add(1)) as u16
                };
                (hi << 8) | lo
            }
            AddressingMode::Accumulator | AddressingMode::NoneAddressing => self.pc,
        }
    }

    fn execute(&mut self, entry: OpCode, operand: u16) {
        match entry.op {
            Operation::Adc => {
                let value = self.memory.read(operand);
                self.adc(value);
            }
            Operation::Sbc => {
                // A - M - (1 - C) == A + !M + C
                let value = self.memory.read(operand);
                self.adc(value ^ 0xFF);
            }
            Operation::And => {
                self.a &= self.memory.read(operand);
                self.update_zero_and_negative(self.a);
            }
            Operation::Ora => {
                self.a |= self.memory.read(operand);
                self.update_zero_and_negative(self.a);
            }
            Operation::Eor => {
                self.a ^= self.memory.read(operand);
                self.update_zero_and_negative(self.a);
            }
            Operation::Bit => {
                let value = self.memory.read(operand);
                self.status.set(StatusFlags::ZERO, self.a & value == 0);
                self.status.set(StatusFlags::OVERFLOW, value & 0x40 != 0);
                self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
            }

            Operation::Asl => self.asl(entry.mode, operand),
            Operation::Lsr => self.lsr(entry.mode, operand),
            Operation::Rol => self.rol(entry.mode, operand),
            Operation::Ror => self.ror(entry.mode, operand),

            Operation::Bcc => self.branch(!self.status.contains(StatusFlags::CARRY), operand),
            Operation::Bcs => self.branch(self.status.contains(StatusFlags::CARRY), operand),
            Operation::Beq => self.branch(self.status.contains(StatusFlags::ZERO), operand),
            Operation::Bne => self.branch(!self.status.contains(StatusFlags::ZERO), operand),
            Operation::Bmi => self.branch(self.status.contains(StatusFlags::NEGATIVE), operand),
            Operation::Bpl => self.branch(!self.status.contains(StatusFlags::NEGATIVE), operand),
            Operation::Bvs => self.branch(self.status.contains(StatusFlags::OVERFLOW), operand),
            Operation::Bvc => self.branch(!self.status.contains(StatusFlags::OVERFLOW), operand),

            Operation::Cmp => {
                let value = self.memory.read(operand);
                self.compare(self.a, value);
            }
            Operation::Cpx => {
                let value = self.memory.read(operand);
                self.compare(self.x, value);
            }
            Operation::Cpy => {
                let value = self.memory.read(operand);
                self.compare(self.y, value);
            }

            Operation::Inc => {
                let value = self.memory.read(operand).wrapping_add(1);
                self.memory.write(operand, value);
                self.update_zero_and_negative(value);
            }
            Operation::Dec => {
                let value = self.memory.read(operand).wrapping_sub(1);
                self.memory.write(operand, value);
                self.update_zero_and_negative(value);
            }
            Operation::Inx => {
                self.x = self.x.wrapping_add(1);
                self.update_zero_and_negative(self.x);
            }
            Operation::Iny => {
                self.y = self.y.wrapping_add(1);
                self.update_zero_and_negative(self.y);
            }
            Operation::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.update_zero_and_negative(self.x);
            }
            Operation::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.update_zero_and_negative(self.y);
            }

            Operation::Lda => {
                self.a = self.memory.read(operand);
                self.update_zero_and_negative(self.a);
            }
            Operation::Ldx => {
                self.x = self.memory.read(operand);
                self.update_zero_and_negative(self.x);
            }
            Operation::Ldy => {
                self.y = self.memory.read(operand);
                self.update_zero_and_negative(self.y);
            }
            Operation::Sta => self.memory.write(operand, self.a),
            Operation::Stx => self.memory.write(operand, self.x),
            Operation::Sty => self.memory.write(operand, self.y),

            Operation::Tax => {
                self.x = self.a;
                self.update_zero_and_negative(self.x);
            }
            Operation::Tay => {
                self.y = self.a;
                self.update_zero_and_negative(self.y);
            }
            Operation::Txa => {
                self.a = self.x;
                self.update_zero_and_negative(self.a);
            }
            Operation::Tya => {
                self.a = self.y;
                self.update_zero_and_negative(self.a);
            }
            Operation::Tsx => {
                self.x = self.sp;
                self.update_zero_and_negative(self.x);
            }
            // Stack pointer transfer only; no flags.
            Operation::Txs => self.sp = self.x,

            Operation::Pha => self.push(self.a),
            Operation::Php => {
                // Pushed copy carries BREAK and UNUSED set.
                let pushed = self.status | StatusFlags::BREAK | StatusFlags::UNUSED;
                self.push(pushed.bits());
            }
            Operation::Pla => {
                self.a = self.pop();
                self.update_zero_and_negative(self.a);
            }
            Operation::Plp => {
                let value = self.pop();
                self.status = StatusFlags::from_bits_truncate(value);
                self.status.insert(StatusFlags::UNUSED);
                self.status.remove(StatusFlags::BREAK);
            }

            Operation::Jmp => self.pc = operand,
            Operation::Jsr => {
                // pc already points past the operand; push the address
                // of its last byte, RTS adds one back.
                self.push_u16(self.pc.wrapping_sub(1));
                self.pc = operand;
            }
            Operation::Rts => {
                self.pc = self.pop_u16().wrapping_add(1);
            }
            Operation::Brk => {
                self.push_u16(self.pc);
                let pushed = self.status | StatusFlags::BREAK | StatusFlags::UNUSED;
                self.push(pushed.bits());
                self.status.insert(StatusFlags::INTERRUPT_DISABLE);
                self.pc = self.memory.read_u16(IRQ_VECTOR);
            }
            Operation::Rti => {
                let value = self.pop();
                self.status = StatusFlags::from_bits_truncate(value);
                self.status.insert(StatusFlags::UNUSED);
                self.status.remove(StatusFlags::BREAK);
                self.pc = self.pop_u16();
            }

            Operation::Clc => self.status.remove(StatusFlags::CARRY),
            Operation::Sec => self.status.insert(StatusFlags::CARRY),
            Operation::Cld => self.status.remove(StatusFlags::DECIMAL),
            Operation::Sed => self.status.insert(StatusFlags::DECIMAL),
            Operation::Cli => self.status.remove(StatusFlags::INTERRUPT_DISABLE),
            Operation::Sei => self.status.insert(StatusFlags::INTERRUPT_DISABLE),
            Operation::Clv => self.status.remove(StatusFlags::OVERFLOW),

            Operation::Nop => {}
        }
    }

    /// Hardware interrupt entry: push pc, push status with BREAK
    /// clear, mask further IRQs, jump through the vector.
    fn interrupt(&mut self, vector: u16) {
        self.push_u16(self.pc);
        let pushed = (self.status | StatusFlags::UNUSED) & !StatusFlags::BREAK;
        self.push(pushed.bits());
        self.status.insert(StatusFlags::INTERRUPT_DISABLE);
        self.pc = self.memory.read_u16(vector);
    }

    /// Binary-mode add with carry-in; the DECIMAL flag is bookkeeping
    /// only. Carry out of bit 7 and signed overflow are detected on a
    /// widened intermediate.
    fn adc(&mut self, value: u8) {
        let carry = u16::from(self.status.contains(StatusFlags::CARRY));
        let sum = self.a as u16 + value as u16 + carry;
        let result = sum as u8;
        self.status.set(StatusFlags::CARRY, sum > 0xFF);
        self.status.set(
            StatusFlags::OVERFLOW,
            (self.a ^ result) & (value ^ result) & 0x80 != 0,
        );
        self.a = result;
        self.update_zero_and_negative(result);
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.status.set(StatusFlags::CARRY, register >= value);
        self.update_zero_and_negative(register.wrapping_sub(value));
    }

    /// Conditional relative branch. The program counter already points
    /// past the branch instruction, so the signed offset lands on the
    /// canonical target.
    fn branch(&mut self, condition: bool, operand: u16) {
        if condition {
            let offset = self.memory.read(operand) as i8;
            self.pc = self.pc.wrapping_add(offset as u16);
        }
    }

    fn shift_source(&self, mode: AddressingMode, operand: u16) -> u8 {
        if mode == AddressingMode::Accumulator {
            self.a
        } else {
            self.memory.read(operand)
        }
    }

    fn shift_store(&mut self, mode: AddressingMode, operand: u16, value: u8) {
        if mode == AddressingMode::Accumulator {
            self.a = value;
        } else {
            self.memory.write(operand, value);
        }
    }

    fn asl(&mut self, mode: AddressingMode, operand: u16) {
        let value = self.shift_source(mode, operand);
        let result = value << 1;
        self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
        self.shift_store(mode, operand, result);
        self.update_zero_and_negative(result);
    }

    fn lsr(&mut self, mode: AddressingMode, operand: u16) {
        let value = self.shift_source(mode, operand);
        let result = value >> 1;
        self.status.set(StatusFlags::CARRY, value & 0x01 != 0);
        self.shift_store(mode, operand, result);
        self.update_zero_and_negative(result);
    }

    fn rol(&mut self, mode: AddressingMode, operand: u16) {
        let value = self.shift_source(mode, operand);
        let carry_in = u8::from(self.status.contains(StatusFlags::CARRY));
        let result = (value << 1) | carry_in;
        self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
        self.shift_store(mode, operand, result);
        self.update_zero_and_negative(result);
    }

    fn ror(&mut self, mode: AddressingMode, operand: u16) {
        let value = self.shift_source(mode, operand);
        let carry_in = u8::from(self.status.contains(StatusFlags::CARRY));
        let result = (value >> 1) | (carry_in << 7);
        self.status.set(StatusFlags::CARRY, value & 0x01 != 0);
        self.shift_store(mode, operand, result);
        self.update_zero_and_negative(result);
    }

    fn push(&mut self, value: u8) {
        self.memory.write(STACK_BASE + self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(STACK_BASE + self.sp as u16)
    }

    /// High byte first, so a pop recomposes the original value.
    fn push_u16(&mut self, value: u16) {
        self.push((value >> 8) as u8);
        self.push((value & 0xFF) as u8);
    }

    fn pop_u16(&mut self) -> u16 {
        let lo = self.pop() as u16;
        let hi = self.pop() as u16;
        (hi << 8) | lo
    }

    /// ZERO iff the value is zero, NEGATIVE iff bit 7 is set; both
    /// recomputed from scratch on every call.
    fn update_zero_and_negative(&mut self, value: u8) {
        self.status.set(StatusFlags::ZERO, value == 0);
        self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
