// Machine
mod alu;
pub use alu::AluOp;
mod memory;
pub use memory::{Memory, MEMORY_SIZE};
mod registers;
pub use registers::{Flags, Registers, SP, SP_INIT};
mod opcode;
pub use opcode::Opcode;
mod machine;
pub use machine::{Machine, State};

// Program files
pub mod disasm;
pub mod loader;

mod error;
pub use error::{Error, LoadError, VmError, EXIT_FAILURE, EXIT_FILE_NOT_FOUND};

pub mod env;
pub mod output;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 2;
