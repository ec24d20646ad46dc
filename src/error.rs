use thiserror::Error;

use crate::opcode::Opcode;

/// The fatal errors a single step of the chipset can run into.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'.")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
    #[error("Invalid memory access '{0}'.")]
    Memory(#[from] MemoryError),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
    #[error("Pointer location invalid there can not be an opcode at {pointer}, if data len is {len}")]
    MemoryInvalid { pointer: usize, len: usize },
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Full,
    #[error("Stack is empty!")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum MemoryError {
    #[error("Access of {len} bytes at {address:#06X} is out of bounds.")]
    OutOfBounds { address: usize, len: usize },
}

/// Errors that can happen while reading a rom and writing it into memory.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("The rom is {len} bytes long, but only {max} bytes fit into memory.")]
    RomTooLarge { len: usize, max: usize },
    #[error("Unable to read the rom '{0}'.")]
    Io(#[from] std::io::Error),
    #[error("Unable to read the rom archive '{0}'.")]
    Archive(#[from] zip::result::ZipError),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum KeyError {
    #[error("There is no key {0:#X}, only the keys 0x0 to 0xF exist.")]
    OutOfRange(u8),
}
