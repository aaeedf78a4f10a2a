//! Reading `.ls8` program files.
//!
//! A program file holds one byte per line, written in base 2. Anything after
//! a `#` is a comment, and blank lines are ignored:
//!
//! ```text
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! ```

use std::fs;
use std::io;
use std::path::Path;

use miette::{NamedSource, SourceSpan};
use tracing::debug;

use crate::error::LoadError;
use crate::memory::MEMORY_SIZE;

const COMMENT: char = '#';

/// Read and parse the program file at `path`.
pub fn load_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    let source = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let program = parse(&path.display().to_string(), &source)?;
    debug!(path = %path.display(), len = program.len(), "loaded program");
    Ok(program)
}

/// Parse program text into bytes. `name` labels diagnostics.
pub fn parse(name: &str, source: &str) -> Result<Vec<u8>, LoadError> {
    let mut program = Vec::new();
    let mut line_start = 0;

    for (i, line) in source.split_inclusive('\n').enumerate() {
        let code = line.split(COMMENT).next().unwrap_or_default();
        let token = code.trim();
        if !token.is_empty() {
            let Some(byte) = parse_byte(token) else {
                let indent = code.len() - code.trim_start().len();
                let span = SourceSpan::from((line_start + indent, token.len()));
                return Err(LoadError::InvalidByte {
                    line: i + 1,
                    token: token.to_string(),
                    src: NamedSource::new(name, source.to_string()),
                    span,
                });
            };
            program.push(byte);
        }
        line_start += line.len();
    }

    if program.len() > MEMORY_SIZE {
        return Err(LoadError::ProgramTooLarge {
            len: program.len(),
            capacity: MEMORY_SIZE,
        });
    }
    Ok(program)
}

fn parse_byte(token: &str) -> Option<u8> {
    // `from_str_radix` would also accept a leading `+`
    if !token.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    u8::from_str_radix(token, 2).ok()
}
