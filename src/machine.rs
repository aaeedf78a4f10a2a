use std::fmt::Write as _;
use std::io::Write;

use tracing::{debug, trace, Level};

use crate::alu::AluOp;
use crate::error::VmError;
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::registers::{Flags, Registers, REGISTER_COUNT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
}

/// Represents complete machine state during runtime.
pub struct Machine {
    /// Instructions and data, 256 bytes
    mem: Memory,
    /// 8x 8-bit registers, R7 is the stack pointer
    reg: Registers,
    /// Program counter
    pc: usize,
    /// Set by the most recent CMP, `None` until then
    flags: Option<Flags>,
    state: State,
    /// Instructions executed so far
    steps: u64,
    step_limit: Option<u64>,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            mem: Memory::new(),
            reg: Registers::new(),
            pc: 0,
            flags: None,
            state: State::Running,
            steps: 0,
            step_limit: None,
        }
    }

    pub fn with_program(program: &[u8]) -> Result<Self, VmError> {
        let mut machine = Self::new();
        machine.mem.load(program)?;
        Ok(machine)
    }

    /// Fail with [`VmError::StepLimitExceeded`] instead of executing more than `limit` instructions.
    pub fn set_step_limit(&mut self, limit: Option<u64>) {
        self.step_limit = limit;
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn flags(&self) -> Option<Flags> {
        self.flags
    }

    pub fn registers(&self) -> &Registers {
        &self.reg
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run until `HLT`, writing `PRN` output to `out`.
    ///
    /// Returns the total number of instructions executed, `HLT` included.
    /// Any fault stops the machine with the PC left on the faulting instruction.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<u64, VmError> {
        debug!(pc = self.pc, "running");
        while self.step(out)? == State::Running {}
        out.flush()?;
        debug!(steps = self.steps, "halted");
        Ok(self.steps)
    }

    /// Fetch, decode and execute a single instruction.
    pub fn step<W: Write>(&mut self, out: &mut W) -> Result<State, VmError> {
        if self.state == State::Halted {
            return Ok(State::Halted);
        }
        if let Some(limit) = self.step_limit {
            if self.steps >= limit {
                return Err(VmError::StepLimitExceeded { limit });
            }
        }
        if tracing::enabled!(Level::TRACE) {
            trace!("{}", self.trace_line());
        }

        let byte = self.mem.read(self.pc)?;
        let opcode = Opcode::decode(byte).ok_or(VmError::UnknownOpcode {
            opcode: byte,
            address: self.pc,
        })?;
        self.execute(opcode, out)?;
        self.steps += 1;
        Ok(self.state)
    }

    fn execute<W: Write>(&mut self, opcode: Opcode, out: &mut W) -> Result<(), VmError> {
        match opcode {
            Opcode::HLT => {
                self.state = State::Halted;
            }
            Opcode::LDI => {
                let reg = self.reg_operand(1)?;
                let val = self.operand(2)?;
                self.reg.set(reg, val)?;
            }
            Opcode::PRN => {
                let val = self.reg.get(self.reg_operand(1)?)?;
                writeln!(out, "{val}")?;
            }
            Opcode::ADD => self.alu(AluOp::Add)?,
            Opcode::SUB => self.alu(AluOp::Sub)?,
            Opcode::MUL => self.alu(AluOp::Mul)?,
            Opcode::DIV => self.alu(AluOp::Div)?,
            Opcode::CMP => self.alu(AluOp::Cmp)?,
            // The register is read after SP moves, so `PUSH R7` stores the new SP
            Opcode::PUSH => {
                let reg = self.reg_operand(1)?;
                let sp = self.grow_stack();
                let val = self.reg.get(reg)?;
                self.mem.write(sp as usize, val)?;
            }
            // SP moves after the register is written, so `POP R7` leaves popped + 1
            Opcode::POP => {
                let reg = self.reg_operand(1)?;
                let val = self.mem.read(self.reg.sp() as usize)?;
                self.reg.set(reg, val)?;
                self.reg.set_sp(self.reg.sp().wrapping_add(1));
            }
            Opcode::CALL => {
                let reg = self.reg_operand(1)?;
                let ret = self.pc + opcode.width();
                let ret = u8::try_from(ret)
                    .map_err(|_| VmError::MemoryOutOfRange { address: ret })?;
                let sp = self.grow_stack();
                self.mem.write(sp as usize, ret)?;
                self.pc = self.reg.get(reg)? as usize;
                return Ok(());
            }
            Opcode::RET => {
                self.pc = self.pop_val()? as usize;
                return Ok(());
            }
            Opcode::JMP => {
                self.pc = self.reg.get(self.reg_operand(1)?)? as usize;
                return Ok(());
            }
            Opcode::JEQ | Opcode::JNE => {
                let target = self.reg.get(self.reg_operand(1)?)?;
                let flags = self.flags.ok_or(VmError::FlagsUninitialized)?;
                if flags.equal == (opcode == Opcode::JEQ) {
                    self.pc = target as usize;
                    return Ok(());
                }
            }
        }
        if self.state == State::Running {
            self.pc += opcode.width();
        }
        Ok(())
    }

    #[inline]
    fn operand(&self, offset: usize) -> Result<u8, VmError> {
        self.mem.read(self.pc + offset)
    }

    /// Operand naming a register, checked before any state changes.
    fn reg_operand(&self, offset: usize) -> Result<u8, VmError> {
        let index = self.operand(offset)?;
        if index as usize >= REGISTER_COUNT {
            return Err(VmError::RegisterOutOfRange { index });
        }
        Ok(index)
    }

    fn alu(&mut self, op: AluOp) -> Result<(), VmError> {
        let reg_a = self.reg_operand(1)?;
        let reg_b = self.reg_operand(2)?;
        if let Some(flags) = op.apply(&mut self.reg, reg_a, reg_b)? {
            self.flags = Some(flags);
        }
        Ok(())
    }

    /// Decrement SP, returning the new top of stack.
    fn grow_stack(&mut self) -> u8 {
        let sp = self.reg.sp().wrapping_sub(1);
        self.reg.set_sp(sp);
        sp
    }

    fn pop_val(&mut self) -> Result<u8, VmError> {
        let sp = self.reg.sp();
        let val = self.mem.read(sp as usize)?;
        self.reg.set_sp(sp.wrapping_add(1));
        Ok(val)
    }

    /// `TRACE: PC | ram[PC] ram[PC+1] ram[PC+2] | R0 .. R7`, in hex.
    fn trace_line(&self) -> String {
        let mut line = format!("TRACE: {:02X} |", self.pc);
        for addr in self.pc..self.pc + 3 {
            match self.mem.read(addr) {
                Ok(byte) => {
                    let _ = write!(line, " {byte:02X}");
                }
                Err(_) => line.push_str(" --"),
            }
        }
        line.push_str(" |");
        for val in self.reg.as_slice() {
            let _ = write!(line, " {val:02X}");
        }
        line
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
