//! Static instruction dispatch tables.
//!
//! Both pages are data: an opcode indexes an immutable descriptor whose
//! enum-tagged operation is run by the interpreter in `execute`. The
//! eleven genuinely undefined primary bytes have no entry; hitting one
//! is a fatal fault, never a silent no-op.

#![allow(
    clippy::cast_possible_truncation,
    clippy::too_many_lines,
    clippy::unnecessary_wraps,
    clippy::match_same_arms
)]

/// The prefix byte selecting the extended page.
pub const EXTENDED_PREFIX: u8 = 0xCB;

/// 8-bit operand selector shared by loads, ALU and bit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Operand8 {
    B,
    C,
    D,
    E,
    H,
    L,
    /// The byte addressed by the HL pair.
    HlIndirect,
    A,
    /// The instruction's immediate operand byte.
    Immediate,
}

/// 16-bit register pair selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Reg16 {
    Bc,
    De,
    Hl,
    Sp,
    Af,
}

/// Condition codes for branches, calls and returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Cond {
    Always,
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

/// Addressing forms for accumulator load/store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrMode {
    /// The byte addressed by BC.
    BcIndirect,
    /// The byte addressed by DE.
    DeIndirect,
    /// The byte addressed by HL, incrementing HL afterwards.
    HlIncrement,
    /// The byte addressed by HL, decrementing HL afterwards.
    HlDecrement,
    /// A 16-bit immediate absolute address.
    Absolute,
    /// The high page at 0xFF00 plus the immediate byte.
    HighImmediate,
    /// The high page at 0xFF00 plus register C.
    HighC,
}

/// Accumulator arithmetic/logic operation classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

/// Rotate/shift/swap operation classes (extended page row order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

/// Enum-tagged operation executed by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Op {
    Nop,
    Stop,
    Halt,
    DisableInterrupts,
    EnableInterrupts,
    Ld8 { dst: Operand8, src: Operand8 },
    Ld16Imm(Reg16),
    LdAFromMem(AddrMode),
    LdMemFromA(AddrMode),
    LdSpToMem,
    LdHlSpOffset,
    LdSpHl,
    Inc8(Operand8),
    Dec8(Operand8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    AddSp,
    Alu { op: AluOp, src: Operand8 },
    Daa,
    Cpl,
    Scf,
    Ccf,
    RotateA(ShiftOp),
    Shift { op: ShiftOp, target: Operand8 },
    Bit { bit: u8, target: Operand8 },
    Res { bit: u8, target: Operand8 },
    Set { bit: u8, target: Operand8 },
    Jr(Cond),
    Jp(Cond),
    JpHl,
    Call(Cond),
    Ret(Cond),
    Reti,
    Rst(u8),
    Push(Reg16),
    Pop(Reg16),
}

/// Immutable descriptor for one table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Mnemonic family used for diagnostics and tracing.
    pub mnemonic: &'static str,
    /// Total encoded length in bytes, opcode included (1..=3).
    pub length: u8,
    /// Base cycle cost.
    pub cycles: u32,
    /// Additional cost when a conditional branch/call/return is taken.
    pub extra_cycles: u32,
    /// The operation the interpreter runs.
    pub op: Op,
}

const fn inst(mnemonic: &'static str, length: u8, cycles: u32, op: Op) -> Option<Instruction> {
    Some(Instruction {
        mnemonic,
        length,
        cycles,
        extra_cycles: 0,
        op,
    })
}

const fn branch(
    mnemonic: &'static str,
    length: u8,
    cycles: u32,
    extra_cycles: u32,
    op: Op,
) -> Option<Instruction> {
    Some(Instruction {
        mnemonic,
        length,
        cycles,
        extra_cycles,
        op,
    })
}

const fn operand(bits: u8) -> Operand8 {
    match bits & 0x07 {
        0 => Operand8::B,
        1 => Operand8::C,
        2 => Operand8::D,
        3 => Operand8::E,
        4 => Operand8::H,
        5 => Operand8::L,
        6 => Operand8::HlIndirect,
        _ => Operand8::A,
    }
}

const fn alu_class(opcode: u8) -> AluOp {
    match (opcode >> 3) & 0x07 {
        0 => AluOp::Add,
        1 => AluOp::Adc,
        2 => AluOp::Sub,
        3 => AluOp::Sbc,
        4 => AluOp::And,
        5 => AluOp::Xor,
        6 => AluOp::Or,
        _ => AluOp::Cp,
    }
}

const fn alu_mnemonic(class: AluOp) -> &'static str {
    match class {
        AluOp::Add => "ADD A,r",
        AluOp::Adc => "ADC A,r",
        AluOp::Sub => "SUB r",
        AluOp::Sbc => "SBC A,r",
        AluOp::And => "AND r",
        AluOp::Xor => "XOR r",
        AluOp::Or => "OR r",
        AluOp::Cp => "CP r",
    }
}

const fn alu_imm_mnemonic(class: AluOp) -> &'static str {
    match class {
        AluOp::Add => "ADD A,n",
        AluOp::Adc => "ADC A,n",
        AluOp::Sub => "SUB n",
        AluOp::Sbc => "SBC A,n",
        AluOp::And => "AND n",
        AluOp::Xor => "XOR n",
        AluOp::Or => "OR n",
        AluOp::Cp => "CP n",
    }
}

const fn shift_class(opcode: u8) -> ShiftOp {
    match (opcode >> 3) & 0x07 {
        0 => ShiftOp::Rlc,
        1 => ShiftOp::Rrc,
        2 => ShiftOp::Rl,
        3 => ShiftOp::Rr,
        4 => ShiftOp::Sla,
        5 => ShiftOp::Sra,
        6 => ShiftOp::Swap,
        _ => ShiftOp::Srl,
    }
}

const fn shift_mnemonic(class: ShiftOp) -> &'static str {
    match class {
        ShiftOp::Rlc => "RLC r",
        ShiftOp::Rrc => "RRC r",
        ShiftOp::Rl => "RL r",
        ShiftOp::Rr => "RR r",
        ShiftOp::Sla => "SLA r",
        ShiftOp::Sra => "SRA r",
        ShiftOp::Swap => "SWAP r",
        ShiftOp::Srl => "SRL r",
    }
}

const fn hl_cost(target: Operand8, with_hl: u32, without_hl: u32) -> u32 {
    match target {
        Operand8::HlIndirect => with_hl,
        _ => without_hl,
    }
}

const fn decode_primary(opcode: u8) -> Option<Instruction> {
    match opcode {
        0x00 => inst("NOP", 1, 4, Op::Nop),
        0x10 => inst("STOP", 2, 4, Op::Stop),
        0x76 => inst("HALT", 1, 4, Op::Halt),
        0xF3 => inst("DI", 1, 4, Op::DisableInterrupts),
        0xFB => inst("EI", 1, 4, Op::EnableInterrupts),

        // Register-to-register load block.
        0x40..=0x7F => {
            let dst = operand(opcode >> 3);
            let src = operand(opcode);
            let cycles = if matches!(dst, Operand8::HlIndirect)
                || matches!(src, Operand8::HlIndirect)
            {
                8
            } else {
                4
            };
            inst("LD r,r'", 1, cycles, Op::Ld8 { dst, src })
        }

        // Immediate loads.
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            let dst = operand(opcode >> 3);
            inst(
                "LD r,n",
                2,
                hl_cost(dst, 12, 8),
                Op::Ld8 {
                    dst,
                    src: Operand8::Immediate,
                },
            )
        }

        // 8-bit increment/decrement rows.
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            let target = operand(opcode >> 3);
            inst("INC r", 1, hl_cost(target, 12, 4), Op::Inc8(target))
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            let target = operand(opcode >> 3);
            inst("DEC r", 1, hl_cost(target, 12, 4), Op::Dec8(target))
        }

        // Accumulator ALU block and its immediate forms.
        0x80..=0xBF => {
            let class = alu_class(opcode);
            let src = operand(opcode);
            inst(
                alu_mnemonic(class),
                1,
                hl_cost(src, 8, 4),
                Op::Alu { op: class, src },
            )
        }
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
            let class = alu_class(opcode);
            inst(
                alu_imm_mnemonic(class),
                2,
                8,
                Op::Alu {
                    op: class,
                    src: Operand8::Immediate,
                },
            )
        }

        // 16-bit immediate loads and pointer moves.
        0x01 => inst("LD BC,nn", 3, 12, Op::Ld16Imm(Reg16::Bc)),
        0x11 => inst("LD DE,nn", 3, 12, Op::Ld16Imm(Reg16::De)),
        0x21 => inst("LD HL,nn", 3, 12, Op::Ld16Imm(Reg16::Hl)),
        0x31 => inst("LD SP,nn", 3, 12, Op::Ld16Imm(Reg16::Sp)),
        0x08 => inst("LD (nn),SP", 3, 20, Op::LdSpToMem),
        0xF8 => inst("LD HL,SP+d", 2, 12, Op::LdHlSpOffset),
        0xF9 => inst("LD SP,HL", 1, 8, Op::LdSpHl),

        // Accumulator load/store addressing forms.
        0x02 => inst("LD (BC),A", 1, 8, Op::LdMemFromA(AddrMode::BcIndirect)),
        0x12 => inst("LD (DE),A", 1, 8, Op::LdMemFromA(AddrMode::DeIndirect)),
        0x22 => inst("LD (HL+),A", 1, 8, Op::LdMemFromA(AddrMode::HlIncrement)),
        0x32 => inst("LD (HL-),A", 1, 8, Op::LdMemFromA(AddrMode::HlDecrement)),
        0xE0 => inst("LDH (n),A", 2, 12, Op::LdMemFromA(AddrMode::HighImmediate)),
        0xE2 => inst("LDH (C),A", 1, 8, Op::LdMemFromA(AddrMode::HighC)),
        0xEA => inst("LD (nn),A", 3, 16, Op::LdMemFromA(AddrMode::Absolute)),
        0x0A => inst("LD A,(BC)", 1, 8, Op::LdAFromMem(AddrMode::BcIndirect)),
        0x1A => inst("LD A,(DE)", 1, 8, Op::LdAFromMem(AddrMode::DeIndirect)),
        0x2A => inst("LD A,(HL+)", 1, 8, Op::LdAFromMem(AddrMode::HlIncrement)),
        0x3A => inst("LD A,(HL-)", 1, 8, Op::LdAFromMem(AddrMode::HlDecrement)),
        0xF0 => inst("LDH A,(n)", 2, 12, Op::LdAFromMem(AddrMode::HighImmediate)),
        0xF2 => inst("LDH A,(C)", 1, 8, Op::LdAFromMem(AddrMode::HighC)),
        0xFA => inst("LD A,(nn)", 3, 16, Op::LdAFromMem(AddrMode::Absolute)),

        // 16-bit arithmetic.
        0x03 => inst("INC BC", 1, 8, Op::Inc16(Reg16::Bc)),
        0x13 => inst("INC DE", 1, 8, Op::Inc16(Reg16::De)),
        0x23 => inst("INC HL", 1, 8, Op::Inc16(Reg16::Hl)),
        0x33 => inst("INC SP", 1, 8, Op::Inc16(Reg16::Sp)),
        0x0B => inst("DEC BC", 1, 8, Op::Dec16(Reg16::Bc)),
        0x1B => inst("DEC DE", 1, 8, Op::Dec16(Reg16::De)),
        0x2B => inst("DEC HL", 1, 8, Op::Dec16(Reg16::Hl)),
        0x3B => inst("DEC SP", 1, 8, Op::Dec16(Reg16::Sp)),
        0x09 => inst("ADD HL,BC", 1, 8, Op::AddHl(Reg16::Bc)),
        0x19 => inst("ADD HL,DE", 1, 8, Op::AddHl(Reg16::De)),
        0x29 => inst("ADD HL,HL", 1, 8, Op::AddHl(Reg16::Hl)),
        0x39 => inst("ADD HL,SP", 1, 8, Op::AddHl(Reg16::Sp)),
        0xE8 => inst("ADD SP,d", 2, 16, Op::AddSp),

        // Accumulator rotates and flag operations.
        0x07 => inst("RLCA", 1, 4, Op::RotateA(ShiftOp::Rlc)),
        0x0F => inst("RRCA", 1, 4, Op::RotateA(ShiftOp::Rrc)),
        0x17 => inst("RLA", 1, 4, Op::RotateA(ShiftOp::Rl)),
        0x1F => inst("RRA", 1, 4, Op::RotateA(ShiftOp::Rr)),
        0x27 => inst("DAA", 1, 4, Op::Daa),
        0x2F => inst("CPL", 1, 4, Op::Cpl),
        0x37 => inst("SCF", 1, 4, Op::Scf),
        0x3F => inst("CCF", 1, 4, Op::Ccf),

        // Relative and absolute jumps.
        0x18 => branch("JR d", 2, 12, 0, Op::Jr(Cond::Always)),
        0x20 => branch("JR NZ,d", 2, 8, 4, Op::Jr(Cond::NotZero)),
        0x28 => branch("JR Z,d", 2, 8, 4, Op::Jr(Cond::Zero)),
        0x30 => branch("JR NC,d", 2, 8, 4, Op::Jr(Cond::NotCarry)),
        0x38 => branch("JR C,d", 2, 8, 4, Op::Jr(Cond::Carry)),
        0xC3 => branch("JP nn", 3, 16, 0, Op::Jp(Cond::Always)),
        0xC2 => branch("JP NZ,nn", 3, 12, 4, Op::Jp(Cond::NotZero)),
        0xCA => branch("JP Z,nn", 3, 12, 4, Op::Jp(Cond::Zero)),
        0xD2 => branch("JP NC,nn", 3, 12, 4, Op::Jp(Cond::NotCarry)),
        0xDA => branch("JP C,nn", 3, 12, 4, Op::Jp(Cond::Carry)),
        0xE9 => inst("JP HL", 1, 4, Op::JpHl),

        // Calls, returns and restarts.
        0xCD => branch("CALL nn", 3, 24, 0, Op::Call(Cond::Always)),
        0xC4 => branch("CALL NZ,nn", 3, 12, 12, Op::Call(Cond::NotZero)),
        0xCC => branch("CALL Z,nn", 3, 12, 12, Op::Call(Cond::Zero)),
        0xD4 => branch("CALL NC,nn", 3, 12, 12, Op::Call(Cond::NotCarry)),
        0xDC => branch("CALL C,nn", 3, 12, 12, Op::Call(Cond::Carry)),
        0xC9 => branch("RET", 1, 16, 0, Op::Ret(Cond::Always)),
        0xC0 => branch("RET NZ", 1, 8, 12, Op::Ret(Cond::NotZero)),
        0xC8 => branch("RET Z", 1, 8, 12, Op::Ret(Cond::Zero)),
        0xD0 => branch("RET NC", 1, 8, 12, Op::Ret(Cond::NotCarry)),
        0xD8 => branch("RET C", 1, 8, 12, Op::Ret(Cond::Carry)),
        0xD9 => inst("RETI", 1, 16, Op::Reti),
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            inst("RST t", 1, 16, Op::Rst(opcode & 0x38))
        }

        // Stack operations.
        0xC5 => inst("PUSH BC", 1, 16, Op::Push(Reg16::Bc)),
        0xD5 => inst("PUSH DE", 1, 16, Op::Push(Reg16::De)),
        0xE5 => inst("PUSH HL", 1, 16, Op::Push(Reg16::Hl)),
        0xF5 => inst("PUSH AF", 1, 16, Op::Push(Reg16::Af)),
        0xC1 => inst("POP BC", 1, 12, Op::Pop(Reg16::Bc)),
        0xD1 => inst("POP DE", 1, 12, Op::Pop(Reg16::De)),
        0xE1 => inst("POP HL", 1, 12, Op::Pop(Reg16::Hl)),
        0xF1 => inst("POP AF", 1, 12, Op::Pop(Reg16::Af)),

        // The extended-page prefix is dispatched before table lookup, and
        // the remaining bytes do not exist on this hardware.
        0xCB | 0xD3 | 0xDB | 0xDD | 0xE3 | 0xE4 | 0xEB | 0xEC | 0xED | 0xF4 | 0xFC | 0xFD => None,
    }
}

const fn decode_extended(opcode: u8) -> Option<Instruction> {
    let target = operand(opcode);
    match opcode {
        0x00..=0x3F => {
            let class = shift_class(opcode);
            inst(
                shift_mnemonic(class),
                1,
                hl_cost(target, 16, 8),
                Op::Shift { op: class, target },
            )
        }
        0x40..=0x7F => inst(
            "BIT b,r",
            1,
            hl_cost(target, 16, 8),
            Op::Bit {
                bit: (opcode >> 3) & 0x07,
                target,
            },
        ),
        0x80..=0xBF => inst(
            "RES b,r",
            1,
            hl_cost(target, 16, 8),
            Op::Res {
                bit: (opcode >> 3) & 0x07,
                target,
            },
        ),
        0xC0..=0xFF => inst(
            "SET b,r",
            1,
            hl_cost(target, 16, 8),
            Op::Set {
                bit: (opcode >> 3) & 0x07,
                target,
            },
        ),
    }
}

const fn build_primary_page() -> [Option<Instruction>; 256] {
    let mut table = [None; 256];
    let mut index = 0;
    while index < 256 {
        table[index] = decode_primary(index as u8);
        index += 1;
    }
    table
}

const fn build_extended_page() -> [Option<Instruction>; 256] {
    let mut table = [None; 256];
    let mut index = 0;
    while index < 256 {
        table[index] = decode_extended(index as u8);
        index += 1;
    }
    table
}

/// Primary dispatch page, indexed by the first opcode byte.
pub static PRIMARY_PAGE: [Option<Instruction>; 256] = build_primary_page();

/// Extended dispatch page, indexed by the byte after the 0xCB prefix.
pub static EXTENDED_PAGE: [Option<Instruction>; 256] = build_extended_page();
