use crate::error::VmError;

/// The LS-8 can address 256 bytes of memory.
pub const MEMORY_SIZE: usize = 0x100;

/// Combined instruction and data store.
#[derive(Clone)]
pub struct Memory {
    cells: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            cells: Box::new([0; MEMORY_SIZE]),
        }
    }

    /// Copy `program` into memory starting at address 0.
    pub fn load(&mut self, program: &[u8]) -> Result<(), VmError> {
        if program.len() > MEMORY_SIZE {
            return Err(VmError::MemoryOutOfRange {
                address: MEMORY_SIZE,
            });
        }
        self.cells[..program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn read(&self, address: usize) -> Result<u8, VmError> {
        self.cells
            .get(address)
            .copied()
            .ok_or(VmError::MemoryOutOfRange { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), VmError> {
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(VmError::MemoryOutOfRange { address })?;
        *cell = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        self.cells.as_slice()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_initialised() {
        let mem = Memory::new();
        assert!(mem.as_slice().iter().all(|&b| b == 0));
        assert_eq!(mem.as_slice().len(), MEMORY_SIZE);
    }

    #[test]
    fn read_write_bounds() {
        let mut mem = Memory::new();
        mem.write(0x00, 0x12).unwrap();
        mem.write(0xff, 0x34).unwrap();
        assert_eq!(mem.read(0x00).unwrap(), 0x12);
        assert_eq!(mem.read(0xff).unwrap(), 0x34);

        assert!(matches!(
            mem.read(0x100),
            Err(VmError::MemoryOutOfRange { address: 0x100 })
        ));
        assert!(matches!(
            mem.write(usize::MAX, 1),
            Err(VmError::MemoryOutOfRange { address: usize::MAX })
        ));
    }

    #[test]
    fn load_program() {
        let mut mem = Memory::new();
        mem.load(&[1, 2, 3]).unwrap();
        assert_eq!(&mem.as_slice()[..4], &[1, 2, 3, 0]);

        let full = [0xaa; MEMORY_SIZE];
        mem.load(&full).unwrap();
        assert_eq!(mem.read(0xff).unwrap(), 0xaa);

        let too_long = [0; MEMORY_SIZE + 1];
        assert!(matches!(
            mem.load(&too_long),
            Err(VmError::MemoryOutOfRange { address: MEMORY_SIZE })
        ));
    }
}
