use std::io;
use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Exit code used when the program file cannot be found.
pub const EXIT_FILE_NOT_FOUND: i32 = 2;
/// Exit code for every other failure.
pub const EXIT_FAILURE: i32 = 1;

// Loader errors

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("program file `{}` not found", .path.display())]
    #[diagnostic(
        code(ls8::load::not_found),
        help("check the path to the program file")
    )]
    FileNotFound { path: PathBuf },

    #[error("failed to read `{}`", .path.display())]
    #[diagnostic(code(ls8::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: `{token}` is not a base-2 byte")]
    #[diagnostic(
        code(ls8::load::invalid_byte),
        help("each line holds one byte of up to eight `0`/`1` digits, optionally followed by a `#` comment")
    )]
    InvalidByte {
        line: usize,
        token: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid byte")]
        span: SourceSpan,
    },

    #[error("program is {len} bytes long but memory holds {capacity}")]
    #[diagnostic(
        code(ls8::load::too_large),
        help("programs are loaded at address 0 and must fit in memory")
    )]
    ProgramTooLarge { len: usize, capacity: usize },
}

// Machine errors

#[derive(Debug, Error, Diagnostic)]
pub enum VmError {
    #[error("memory address {address:#04x} is out of range")]
    #[diagnostic(
        code(ls8::vm::memory_range),
        help("the LS-8 addresses 256 bytes of memory, 0x00 to 0xff")
    )]
    MemoryOutOfRange { address: usize },

    #[error("register R{index} does not exist")]
    #[diagnostic(
        code(ls8::vm::register_range),
        help("only registers R0 to R7 are available")
    )]
    RegisterOutOfRange { index: u8 },

    #[error("division by zero")]
    #[diagnostic(code(ls8::vm::div_zero))]
    DivisionByZero,

    #[error("unsupported ALU operation `{name}`")]
    #[diagnostic(
        code(ls8::alu::unsupported),
        help("supported operations are ADD, SUB, MUL, DIV and CMP")
    )]
    UnsupportedOperation { name: String },

    #[error("unknown opcode {opcode:#010b} at address {address:#04x}")]
    #[diagnostic(code(ls8::vm::unknown_opcode))]
    UnknownOpcode { opcode: u8, address: usize },

    #[error("conditional jump executed before any comparison")]
    #[diagnostic(
        code(ls8::vm::flags_unset),
        help("run CMP before JEQ or JNE")
    )]
    FlagsUninitialized,

    #[error("step limit of {limit} instructions exceeded")]
    #[diagnostic(
        code(ls8::vm::step_limit),
        help("the program may be stuck in a loop; raise the limit with `--max-steps`")
    )]
    StepLimitExceeded { limit: u64 },

    #[error("failed to write program output")]
    #[diagnostic(code(ls8::vm::output))]
    Output(#[from] io::Error),
}

/// Any failure between reading a program file and halting.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Vm(#[from] VmError),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Load(LoadError::FileNotFound { .. }) => EXIT_FILE_NOT_FOUND,
            _ => EXIT_FAILURE,
        }
    }
}
