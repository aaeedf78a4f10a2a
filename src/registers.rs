use crate::error::VmError;

pub const REGISTER_COUNT: usize = 8;
/// Register 7 holds the stack pointer.
pub const SP: u8 = 7;
/// Top of the descending stack, just below the interrupt vectors.
pub const SP_INIT: u8 = 0xF4;

/// 8x 8-bit general purpose registers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registers {
    reg: [u8; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        let mut reg = [0; REGISTER_COUNT];
        reg[SP as usize] = SP_INIT;
        Self { reg }
    }

    pub fn get(&self, index: u8) -> Result<u8, VmError> {
        self.reg
            .get(index as usize)
            .copied()
            .ok_or(VmError::RegisterOutOfRange { index })
    }

    /// Writing `SP` is allowed; it is an ordinary register to the ALU.
    pub fn set(&mut self, index: u8, value: u8) -> Result<(), VmError> {
        let reg = self
            .reg
            .get_mut(index as usize)
            .ok_or(VmError::RegisterOutOfRange { index })?;
        *reg = value;
        Ok(())
    }

    #[inline]
    pub fn sp(&self) -> u8 {
        self.reg[SP as usize]
    }

    #[inline]
    pub fn set_sp(&mut self, value: u8) {
        self.reg[SP as usize] = value;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.reg
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of the most recent `CMP`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub equal: bool,
    pub less: bool,
    pub greater: bool,
}

impl Flags {
    pub fn compare(a: u8, b: u8) -> Self {
        Self {
            equal: a == b,
            less: a < b,
            greater: a > b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_pointer_preset() {
        let reg = Registers::new();
        assert_eq!(reg.sp(), SP_INIT);
        assert_eq!(reg.get(SP).unwrap(), SP_INIT);
        assert_eq!(&reg.as_slice()[..7], &[0; 7]);
    }

    #[test]
    fn index_bounds() {
        let mut reg = Registers::new();
        reg.set(0, 42).unwrap();
        reg.set(SP, 0x10).unwrap();
        assert_eq!(reg.get(0).unwrap(), 42);
        assert_eq!(reg.sp(), 0x10);

        assert!(matches!(
            reg.get(8),
            Err(VmError::RegisterOutOfRange { index: 8 })
        ));
        assert!(matches!(
            reg.set(0xff, 1),
            Err(VmError::RegisterOutOfRange { index: 0xff })
        ));
    }

    #[test]
    fn compare_is_exclusive() {
        for (a, b) in [(0, 0), (1, 2), (2, 1), (255, 0), (0, 255), (7, 7)] {
            let flags = Flags::compare(a, b);
            let set = [flags.equal, flags.less, flags.greater]
                .iter()
                .filter(|&&f| f)
                .count();
            assert_eq!(set, 1, "compare({a}, {b}) = {flags:?}");
        }
        assert!(Flags::compare(3, 3).equal);
        assert!(Flags::compare(3, 4).less);
        assert!(Flags::compare(4, 3).greater);
    }
}
