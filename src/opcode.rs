use std::fmt;

/// LS-8 instruction opcodes.
///
/// Opcode bytes are laid out as `AABCDDDD`, where `AA` is the number of
/// operands, `B` marks ALU operations and `C` marks instructions that set
/// the PC themselves.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    HLT = 0b0000_0001,
    RET = 0b0001_0001,
    PUSH = 0b0100_0101,
    POP = 0b0100_0110,
    PRN = 0b0100_0111,
    CALL = 0b0101_0000,
    JMP = 0b0101_0100,
    JEQ = 0b0101_0101,
    JNE = 0b0101_0110,
    LDI = 0b1000_0010,
    ADD = 0b1010_0000,
    SUB = 0b1010_0001,
    MUL = 0b1010_0010,
    DIV = 0b1010_0011,
    CMP = 0b1010_0111,
}

impl Opcode {
    pub const ALL: [Opcode; 15] = [
        Self::HLT,
        Self::RET,
        Self::PUSH,
        Self::POP,
        Self::PRN,
        Self::CALL,
        Self::JMP,
        Self::JEQ,
        Self::JNE,
        Self::LDI,
        Self::ADD,
        Self::SUB,
        Self::MUL,
        Self::DIV,
        Self::CMP,
    ];

    pub fn decode(byte: u8) -> Option<Opcode> {
        Self::ALL.into_iter().find(|op| *op as u8 == byte)
    }

    /// Number of operand bytes following the opcode.
    pub fn operand_count(self) -> usize {
        match self {
            Self::HLT | Self::RET => 0,
            Self::PUSH
            | Self::POP
            | Self::PRN
            | Self::CALL
            | Self::JMP
            | Self::JEQ
            | Self::JNE => 1,
            Self::LDI | Self::ADD | Self::SUB | Self::MUL | Self::DIV | Self::CMP => 2,
        }
    }

    /// Total instruction width, opcode included.
    pub fn width(self) -> usize {
        1 + self.operand_count()
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::HLT => "HLT",
            Self::RET => "RET",
            Self::PUSH => "PUSH",
            Self::POP => "POP",
            Self::PRN => "PRN",
            Self::CALL => "CALL",
            Self::JMP => "JMP",
            Self::JEQ => "JEQ",
            Self::JNE => "JNE",
            Self::LDI => "LDI",
            Self::ADD => "ADD",
            Self::SUB => "SUB",
            Self::MUL => "MUL",
            Self::DIV => "DIV",
            Self::CMP => "CMP",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
