//! Opcode table: every documented 2A03 opcode byte mapped to its
//! operation and addressing mode.
//!
//! Dispatch is data-driven so tests can enumerate all 256 slots and
//! detect gaps mechanically. Operand width is derived from the
//! addressing mode, never stored separately, so the table and the
//! resolver cannot disagree. Undocumented opcodes have no entry;
//! the dispatcher reports them through [`crate::CpuError`].

use super::AddressingMode;

/// The 56 documented 6502 operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
}

impl Operation {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Operation::Adc => "ADC",
            Operation::And => "AND",
            Operation::Asl => "ASL",
            Operation::Bcc => "BCC",
            Operation::Bcs => "BCS",
            Operation::Beq => "BEQ",
            Operation::Bit => "BIT",
            Operation::Bmi => "BMI",
            Operation::Bne => "BNE",
            Operation::Bpl => "BPL",
            Operation::Brk => "BRK",
            Operation::Bvc => "BVC",
            Operation::Bvs => "BVS",
            Operation::Clc => "CLC",
            Operation::Cld => "CLD",
            Operation::Cli => "CLI",
            Operation::Clv => "CLV",
            Operation::Cmp => "CMP",
            Operation::Cpx => "CPX",
            Operation::Cpy => "CPY",
            Operation::Dec => "DEC",
            Operation::Dex => "DEX",
            Operation::Dey => "DEY",
            Operation::Eor => "EOR",
            Operation::Inc => "INC",
            Operation::Inx => "INX",
            Operation::Iny => "INY",
            Operation::Jmp => "JMP",
            Operation::Jsr => "JSR",
            Operation::Lda => "LDA",
            Operation::Ldx => "LDX",
            Operation::Ldy => "LDY",
            Operation::Lsr => "LSR",
            Operation::Nop => "NOP",
            Operation::Ora => "ORA",
            Operation::Pha => "PHA",
            Operation::Php => "PHP",
            Operation::Pla => "PLA",
            Operation::Plp => "PLP",
            Operation::Rol => "ROL",
            Operation::Ror => "ROR",
            Operation::Rti => "RTI",
            Operation::Rts => "RTS",
            Operation::Sbc => "SBC",
            Operation::Sec => "SEC",
            Operation::Sed => "SED",
            Operation::Sei => "SEI",
            Operation::Sta => "STA",
            Operation::Stx => "STX",
            Operation::Sty => "STY",
            Operation::Tax => "TAX",
            Operation::Tay => "TAY",
            Operation::Tsx => "TSX",
            Operation::Txa => "TXA",
            Operation::Txs => "TXS",
            Operation::Tya => "TYA",
        }
    }
}

/// One table entry: what to do and how to find the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpCode {
    pub op: Operation,
    pub mode: AddressingMode,
}

impl OpCode {
    pub const fn mnemonic(&self) -> &'static str {
        self.op.mnemonic()
    }

    /// Operand bytes consumed after the opcode byte.
    pub const fn operand_bytes(&self) -> u16 {
        self.mode.operand_bytes()
    }
}

const fn entry(op: Operation, mode: AddressingMode) -> Option<OpCode> {
    Some(OpCode { op, mode })
}

pub const OPCODE_TABLE: [Option<OpCode>; 256] = build_table();

#[allow(clippy::too_many_lines)]
const fn build_table() -> [Option<OpCode>; 256] {
    use AddressingMode::*;
    use Operation::*;

    let mut t: [Option<OpCode>; 256] = [None; 256];

    t[0x69] = entry(Adc, Immediate);
    t[0x65] = entry(Adc, ZeroPage);
    t[0x75] = entry(Adc, ZeroPageX);
    t[0x6D] = entry(Adc, Absolute);
    t[0x7D] = entry(Adc, AbsoluteX);
    t[0x79] = entry(Adc, AbsoluteY);
    t[0x61] = entry(Adc, IndirectX);
    t[0x71] = entry(Adc, IndirectY);

    t[0x29] = entry(And, Immediate);
    t[0x25] = entry(And, ZeroPage);
    t[0x35] = entry(And, ZeroPageX);
    t[0x2D] = entry(And, Absolute);
    t[0x3D] = entry(And, AbsoluteX);
    t[0x39] = entry(And, AbsoluteY);
    t[0x21] = entry(And, IndirectX);
    t[0x31] = entry(And, IndirectY);

    t[0x0A] = entry(Asl, Accumulator);
    t[0x06] = entry(Asl, ZeroPage);
    t[0x16] = entry(Asl, ZeroPageX);
    t[0x0E] = entry(Asl, Absolute);
    t[0x1E] = entry(Asl, AbsoluteX);

    t[0x90] = entry(Bcc, Relative);
    t[0xB0] = entry(Bcs, Relative);
    t[0xF0] = entry(Beq, Relative);
    t[0x30] = entry(Bmi, Relative);
    t[0xD0] = entry(Bne, Relative);
    t[0x10] = entry(Bpl, Relative);
    t[0x50] = entry(Bvc, Relative);
    t[0x70] = entry(Bvs, Relative);

    t[0x24] = entry(Bit, ZeroPage);
    t[0x2C] = entry(Bit, Absolute);

    t[0x00] = entry(Brk, NoneAddressing);

    t[0x18] = entry(Clc, NoneAddressing);
    t[0xD8] = entry(Cld, NoneAddressing);
    t[0x58] = entry(Cli, NoneAddressing);
    t[0xB8] = entry(Clv, NoneAddressing);

    t[0xC9] = entry(Cmp, Immediate);
    t[0xC5] = entry(Cmp, ZeroPage);
    t[0xD5] = entry(Cmp, ZeroPageX);
    t[0xCD] = entry(Cmp, Absolute);
    t[0xDD] = entry(Cmp, AbsoluteX);
    t[0xD9] = entry(Cmp, AbsoluteY);
    t[0xC1] = entry(Cmp, IndirectX);
    t[0xD1] = entry(Cmp, IndirectY);

    t[0xE0] = entry(Cpx, Immediate);
    t[0xE4] = entry(Cpx, ZeroPage);
    t[0xEC] = entry(Cpx, Absolute);

    t[0xC0] = entry(Cpy, Immediate);
    t[0xC4] = entry(Cpy, ZeroPage);
    t[0xCC] = entry(Cpy, Absolute);

    t[0xC6] = entry(Dec, ZeroPage);
    t[0xD6] = entry(Dec, ZeroPageX);
    t[0xCE] = entry(Dec, Absolute);
    t[0xDE] = entry(Dec, AbsoluteX);

    t[0xCA] = entry(Dex, NoneAddressing);
    t[0x88] = entry(Dey, NoneAddressing);

    t[0x49] = entry(Eor, Immediate);
    t[0x45] = entry(Eor, ZeroPage);
    t[0x55] = entry(Eor, ZeroPageX);
    t[0x4D] = entry(Eor, Absolute);
    t[0x5D] = entry(Eor, AbsoluteX);
    t[0x59] = entry(Eor, AbsoluteY);
    t[0x41] = entry(Eor, IndirectX);
    t[0x51] = entry(Eor, IndirectY);

    t[0xE6] = entry(Inc, ZeroPage);
    t[0xF6] = entry(Inc, ZeroPageX);
    t[0xEE] = entry(Inc, Absolute);
    t[0xFE] = entry(Inc, AbsoluteX);

    t[0xE8] = entry(Inx, NoneAddressing);
    t[0xC8] = entry(Iny, NoneAddressing);

    t[0x4C] = entry(Jmp, Absolute);
    t[0x6C] = entry(Jmp, Indirect);

    t[0x20] = entry(Jsr, Absolute);

    t[0xA9] = entry(Lda, Immediate);
    t[0xA5] = entry(Lda, ZeroPage);
    t[0xB5] = entry(Lda, ZeroPageX);
    t[0xAD] = entry(Lda, Absolute);
    t[0xBD] = entry(Lda, AbsoluteX);
    t[0xB9] = entry(Lda, AbsoluteY);
    t[0xA1] = entry(Lda, IndirectX);
    t[0xB1] = entry(Lda, IndirectY);

    t[0xA2] = entry(Ldx, Immediate);
    t[0xA6] = entry(Ldx, ZeroPage);
    t[0xB6] = entry(Ldx, ZeroPageY);
    t[0xAE] = entry(Ldx, Absolute);
    t[0xBE] = entry(Ldx, AbsoluteY);

    t[0xA0] = entry(Ldy, Immediate);
    t[0xA4] = entry(Ldy, ZeroPage);
    t[0xB4] = entry(Ldy, ZeroPageX);
    t[0xAC] = entry(Ldy, Absolute);
    t[0xBC] = entry(Ldy, AbsoluteX);

    t[0x4A] = entry(Lsr, Accumulator);
    t[0x46] = entry(Lsr, ZeroPage);
    t[0x56] = entry(Lsr, ZeroPageX);
    t[0x4E] = entry(Lsr, Absolute);
    t[0x5E] = entry(Lsr, AbsoluteX);

    t[0xEA] = entry(Nop, NoneAddressing);

    t[0x09] = entry(Ora, Immediate);
    t[0x05] = entry(Ora, ZeroPage);
    t[0x15] = entry(Ora, ZeroPageX);
    t[0x0D] = entry(Ora, Absolute);
    t[0x1D] = entry(Ora, AbsoluteX);
    t[0x19] = entry(Ora, AbsoluteY);
    t[0x01] = entry(Ora, IndirectX);
    t[0x11] = entry(Ora, IndirectY);

    t[0x48] = entry(Pha, NoneAddressing);
    t[0x08] = entry(Php, NoneAddressing);
    t[0x68] = entry(Pla, NoneAddressing);
    t[0x28] = entry(Plp, NoneAddressing);

    t[0x2A] = entry(Rol, Accumulator);
    t[0x26] = entry(Rol, ZeroPage);
    t[0x36] = entry(Rol, ZeroPageX);
    t[0x2E] = entry(Rol, Absolute);
    t[0x3E] = entry(Rol, AbsoluteX);

    t[0x6A] = entry(Ror, Accumulator);
    t[0x66] = entry(Ror, ZeroPage);
    t[0x76] = entry(Ror, ZeroPageX);
    t[0x6E] = entry(Ror, Absolute);
    t[0x7E] = entry(Ror, AbsoluteX);

    t[0x40] = entry(Rti, NoneAddressing);
    t[0x60] = entry(Rts, NoneAddressing);

    t[0xE9] = entry(Sbc, Immediate);
    t[0xE5] = entry(Sbc, ZeroPage);
    t[0xF5] = entry(Sbc, ZeroPageX);
    t[0xED] = entry(Sbc, Absolute);
    t[0xFD] = entry(Sbc, AbsoluteX);
    t[0xF9] = entry(Sbc, AbsoluteY);
    t[0xE1] = entry(Sbc, IndirectX);
    t[0xF1] = entry(Sbc, IndirectY);

    t[0x38] = entry(Sec, NoneAddressing);
    t[0xF8] = entry(Sed, NoneAddressing);
    t[0x78] = entry(Sei, NoneAddressing);

    t[0x85] = entry(Sta, ZeroPage);
    t[0x95] = entry(Sta, ZeroPageX);
    t[0x8D] = entry(Sta, Absolute);
    t[0x9D] = entry(Sta, AbsoluteX);
    t[0x99] = entry(Sta, AbsoluteY);
    t[0x81] = entry(Sta, IndirectX);
    t[0x91] = entry(Sta, IndirectY);

    t[0x86] = entry(Stx, ZeroPage);
    t[0x96] = entry(Stx, ZeroPageY);
    t[0x8E] = entry(Stx, Absolute);

    t[0x84] = entry(Sty, ZeroPage);
    t[0x94] = entry(Sty, ZeroPageX);
    t[0x8C] = entry(Sty, Absolute);

    t[0xAA] = entry(Tax, NoneAddressing);
    t[0xA8] = entry(Tay, NoneAddressing);
    t[0xBA] = entry(Tsx, NoneAddressing);
    t[0x8A] = entry(Txa, NoneAddressing);
    t[0x9A] = entry(Txs, NoneAddressing);
    t[0x98] = entry(Tya, NoneAddressing);

    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_opcode_count() {
        let count = OPCODE_TABLE.iter().filter(|e| e.is_some()).count();
        assert_eq!(count, 151);
    }

    #[test]
    fn operand_width_follows_addressing_mode() {
        for (code, entry) in OPCODE_TABLE.iter().enumerate() {
            let Some(op) = entry else { continue };
            let expected = match op.mode {
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
            };
            assert_eq!(
                op.operand_bytes(),
                expected,
                "opcode {code:#04X} ({})",
                op.mnemonic()
            );
        }
    }

    #[test]
    fn branches_are_relative_and_jumps_are_not() {
        for op in OPCODE_TABLE.iter().flatten() {
            match op.op {
                Operation::Bcc
                | Operation::Bcs
                | Operation::Beq
                | Operation::Bne
                | Operation::Bmi
                | Operation::Bpl
                | Operation::Bvc
                | Operation::Bvs => {
                    assert_eq!(op.mode, AddressingMode::Relative);
                }
                Operation::Jmp => assert!(matches!(
                    op.mode,
                    AddressingMode::Absolute | AddressingMode::Indirect
                )),
                Operation::Jsr => assert_eq!(op.mode, AddressingMode::Absolute),
                _ => {}
            }
        }
    }

    #[test]
    fn indirect_mode_is_jmp_only() {
        for op in OPCODE_TABLE.iter().flatten() {
            if op.mode == AddressingMode::Indirect {
                assert_eq!(op.op, Operation::Jmp);
            }
        }
    }
}
