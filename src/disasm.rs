use std::fmt;

use crate::opcode::Opcode;

/// One line of a disassembly listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub address: usize,
    pub bytes: Vec<u8>,
    pub kind: LineKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Instruction(Opcode),
    /// Not a known opcode, or an instruction cut short by the end of the program
    Data,
}

/// Linear sweep over `program` from address 0.
pub fn disassemble(program: &[u8]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut address = 0;
    while address < program.len() {
        let byte = program[address];
        let line = match Opcode::decode(byte) {
            Some(op) if address + op.width() <= program.len() => Line {
                address,
                bytes: program[address..address + op.width()].to_vec(),
                kind: LineKind::Instruction(op),
            },
            _ => Line {
                address,
                bytes: vec![byte],
                kind: LineKind::Data,
            },
        };
        address += line.bytes.len();
        lines.push(line);
    }
    lines
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self
            .bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{:02x}:  {raw:<8}  ", self.address)?;
        match self.kind {
            LineKind::Data => write!(f, ".byte {:#010b}", self.bytes[0]),
            LineKind::Instruction(op) => {
                write!(f, "{op}")?;
                match op {
                    Opcode::LDI => write!(f, " R{},{}", self.bytes[1], self.bytes[2]),
                    _ => {
                        let regs = self.bytes[1..]
                            .iter()
                            .map(|r| format!("R{r}"))
                            .collect::<Vec<_>>();
                        if regs.is_empty() {
                            Ok(())
                        } else {
                            write!(f, " {}", regs.join(","))
                        }
                    }
                }
            }
        }
    }
}
