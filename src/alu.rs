use std::fmt;
use std::str::FromStr;

use crate::error::VmError;
use crate::registers::{Flags, Registers};

/// Register-to-register operations. All arithmetic wraps at 8 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Cmp,
}

impl AluOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Cmp => "CMP",
        }
    }

    /// Apply the operation to `reg_a` and `reg_b`.
    ///
    /// Arithmetic stores its result in `reg_a`; `Cmp` leaves the registers
    /// alone and returns the new flags instead.
    pub fn apply(
        self,
        reg: &mut Registers,
        reg_a: u8,
        reg_b: u8,
    ) -> Result<Option<Flags>, VmError> {
        let a = reg.get(reg_a)?;
        let b = reg.get(reg_b)?;
        let res = match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::Mul => a.wrapping_mul(b),
            Self::Div => a.checked_div(b).ok_or(VmError::DivisionByZero)?,
            Self::Cmp => return Ok(Some(Flags::compare(a, b))),
        };
        reg.set(reg_a, res)?;
        Ok(None)
    }
}

impl FromStr for AluOp {
    type Err = VmError;
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(match name.to_ascii_uppercase().as_str() {
            "ADD" => Self::Add,
            "SUB" => Self::Sub,
            "MUL" => Self::Mul,
            "DIV" => Self::Div,
            "CMP" => Self::Cmp,
            _ => {
                return Err(VmError::UnsupportedOperation {
                    name: name.to_string(),
                })
            }
        })
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
