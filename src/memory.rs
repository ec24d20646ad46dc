//! The ram of the chip.
use crate::{
    definitions::{cpu, display::fontset, memory},
    opcode::{self, Opcode},
    LoadError, MemoryError, OpcodeError,
};

/// - `0x000-0x04F` - Used for the built in `4x5` pixel font set (`0-F`)
/// - `0x050-0x1FF` - Reserved for the interpreter, stays empty
/// - `0x200-0xFFF` - Program ROM and work RAM
#[derive(Clone)]
pub struct MemoryImage {
    cells: Box<[u8; memory::SIZE]>,
}

impl Default for MemoryImage {
    fn default() -> Self {
        let mut memory = Self {
            cells: Box::new([0; memory::SIZE]),
        };
        memory.reset();
        memory
    }
}

impl MemoryImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will zero the whole memory and write the font set back into place.
    pub fn reset(&mut self) {
        self.cells.fill(0);
        self.cells[fontset::LOCATION..(fontset::LOCATION + fontset::FONTSET.len())]
            .copy_from_slice(&fontset::FONTSET);
    }

    /// Will copy the rom into memory, starting at the program counter base.
    ///
    /// Memory is not reset before, a full reload is [`reset`](Self::reset) followed by
    /// `load`. If the rom does not fit nothing is written.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        Self::check_rom(rom)?;
        self.cells[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + rom.len())].copy_from_slice(rom);
        Ok(())
    }

    /// Checks if the rom fits between the program start and the end of memory.
    pub fn check_rom(rom: &[u8]) -> Result<(), LoadError> {
        if rom.len() > cpu::MAX_ROM_SIZE {
            return Err(LoadError::RomTooLarge {
                len: rom.len(),
                max: cpu::MAX_ROM_SIZE,
            });
        }
        Ok(())
    }

    /// will get the opcode stored at the pointer
    pub fn fetch(&self, pointer: usize) -> Result<Opcode, OpcodeError> {
        opcode::build_opcode(&self.cells[..], pointer)
    }

    /// Will return the `len` bytes starting at `address`.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8], MemoryError> {
        let end = Self::end(address, len)?;
        Ok(&self.cells[address..end])
    }

    /// Will return the `len` bytes starting at `address` for writing.
    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8], MemoryError> {
        let end = Self::end(address, len)?;
        Ok(&mut self.cells[address..end])
    }

    /// The whole memory as a slice
    pub fn as_slice(&self) -> &[u8] {
        &self.cells[..]
    }

    fn end(address: usize, len: usize) -> Result<usize, MemoryError> {
        match address.checked_add(len) {
            Some(end) if end <= memory::SIZE => Ok(end),
            _ => Err(MemoryError::OutOfBounds { address, len }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_loads_font() {
        let mut memory = MemoryImage::new();
        memory.slice_mut(0x300, 2).unwrap().copy_from_slice(&[0xAB, 0xCD]);
        memory.reset();

        let cells = memory.as_slice();
        assert_eq!(cells.len(), memory::SIZE);
        assert_eq!(&cells[..fontset::FONTSET.len()], &fontset::FONTSET[..]);
        assert!(cells[fontset::FONTSET.len()..].iter().all(|cell| *cell == 0));
    }

    #[test]
    fn test_load_keeps_bytes_unsigned() {
        let mut memory = MemoryImage::new();
        let rom = [0xFF, 0x80, 0x00, 0x7F];
        memory.load(&rom).unwrap();

        assert_eq!(memory.slice(cpu::PROGRAM_COUNTER, 4).unwrap(), &rom);
        assert_eq!(memory.fetch(cpu::PROGRAM_COUNTER), Ok(0xFF80));
    }

    #[test]
    fn test_load_does_not_reset() {
        let mut memory = MemoryImage::new();
        memory.load(&[1, 2, 3, 4]).unwrap();
        memory.load(&[9]).unwrap();

        assert_eq!(memory.slice(cpu::PROGRAM_COUNTER, 4).unwrap(), &[9, 2, 3, 4]);
    }

    #[test]
    fn test_load_largest_rom() {
        let mut memory = MemoryImage::new();
        let rom = vec![0x11; cpu::MAX_ROM_SIZE];
        assert!(memory.load(&rom).is_ok());
        assert_eq!(memory.as_slice()[memory::SIZE - 1], 0x11);
    }

    #[test]
    fn test_load_too_large() {
        let mut memory = MemoryImage::new();
        let rom = vec![0x11; cpu::MAX_ROM_SIZE + 1];

        match memory.load(&rom) {
            Err(LoadError::RomTooLarge { len, max }) => {
                assert_eq!(len, cpu::MAX_ROM_SIZE + 1);
                assert_eq!(max, cpu::MAX_ROM_SIZE);
            }
            other => panic!("unexpected result {:?}", other),
        }
        // nothing was written
        assert_eq!(memory.as_slice()[cpu::PROGRAM_COUNTER], 0);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut memory = MemoryImage::new();
        assert!(memory.slice(memory::SIZE - 3, 3).is_ok());
        assert_eq!(
            memory.slice(memory::SIZE - 2, 3),
            Err(MemoryError::OutOfBounds {
                address: memory::SIZE - 2,
                len: 3
            })
        );
        assert!(memory.slice_mut(usize::MAX, 2).is_err());
        assert_eq!(
            memory.fetch(memory::SIZE - 1),
            Err(OpcodeError::MemoryInvalid {
                pointer: memory::SIZE - 1,
                len: memory::SIZE
            })
        );
    }
}
