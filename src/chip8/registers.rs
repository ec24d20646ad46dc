use tinyvec::ArrayVec;

use crate::{
    definitions::cpu,
    opcode::{ProgramCounter, ProgramCounterStep},
    StackError,
};

/// The cpu registers of the chip.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterFile {
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions; thus, it should be avoided. In an addition operation, `VF` is the carry flag,
    /// while in subtraction, it is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub(crate) v: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub(crate) index: u16,
    /// The program counter is a CPU register in the computer processor which has the address of the
    /// next instruction to be executed from memory.
    pub(crate) program_counter: u16,
    /// The stack is only used to store return addresses when subroutines are called. The original
    /// [RCA 1802](https://de.wikipedia.org/wiki/RCA1802) version allocated `48` bytes for up to
    /// `12` levels of nesting; modern implementations usually have more.
    /// (here we are using `16`)
    ///
    /// The stack pointer is the length of the stack.
    pub(crate) stack: ArrayVec<[u16; cpu::stack::SIZE]>,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            v: [0; cpu::register::SIZE],
            index: 0,
            program_counter: cpu::PROGRAM_COUNTER as u16,
            stack: ArrayVec::new(),
        }
    }
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Will push the pointer to the stack
    pub(crate) fn push_stack(&mut self, pointer: u16) -> Result<(), StackError> {
        self.stack.try_push(pointer).map_or(Ok(()), |_| Err(StackError::Full))
    }

    /// Will pop the last pointer from the stack
    pub(crate) fn pop_stack(&mut self) -> Result<u16, StackError> {
        self.stack.pop().ok_or(StackError::Empty)
    }

    /// The amount of entries on the stack
    pub fn stack_pointer(&self) -> usize {
        self.stack.len()
    }

    /// Sets `VF`
    #[inline]
    pub(crate) fn set_flag(&mut self, flag: bool) {
        self.v[cpu::register::LAST] = flag as u8;
    }
}

impl ProgramCounter for RegisterFile {
    fn advance(&mut self, step: ProgramCounterStep) {
        match step {
            ProgramCounterStep::Next | ProgramCounterStep::Skip | ProgramCounterStep::None => {
                self.program_counter = self.program_counter.wrapping_add(step.step())
            }
            ProgramCounterStep::Jump(pointer) => self.program_counter = pointer,
        }
    }
}
