use std::convert::TryFrom;

use {
    super::RegisterFile,
    crate::{
        devices::{Framebuffer, InputLatch, Row},
        memory::MemoryImage,
        opcode::{ChipOpcodes, Opcode, Opcodes, Operation, ProgramCounter, ProgramCounterStep},
        resources::Rom,
        timer::TimerBank,
        LoadError, ProcessError,
    },
    rand::RngCore,
};

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// name of the loaded rom
    pub(super) name: String,
    /// the last fetched opcode, all two bytes long and stored big-endian
    pub(super) opcode: Opcode,
    /// The 4 KB ram
    pub(super) memory: MemoryImage,
    /// The `V0` to `VF`, `I`, program counter and stack registers
    pub(super) registers: RegisterFile,
    /// The delay and sound timers, shared with the ticker driving them.
    pub(super) timers: TimerBank,
    /// The monochrome `64 x 32` screen
    pub(super) display: Framebuffer,
    /// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
    /// `2` keys are typically used for directional input. Three opcodes are used to detect input.
    /// One skips an instruction if a specific key is pressed, while another does the same if a
    /// specific key is not pressed. The third waits for a key press, and then stores it in one of
    /// the data registers.
    pub(super) keyboard: InputLatch,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
}

impl Default for ChipSet {
    fn default() -> Self {
        Self::with_rng(Box::new(rand::rngs::OsRng))
    }
}

impl ChipSet {
    /// will create a new chipset object, with the font loaded and no program
    pub fn new() -> Self {
        Self::default()
    }

    /// will create a new chipset object that draws its random numbers from the given generator
    pub fn with_rng(rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            name: String::new(),
            opcode: 0,
            memory: MemoryImage::new(),
            registers: RegisterFile::new(),
            timers: TimerBank::new(),
            display: Framebuffer::new(),
            keyboard: InputLatch::new(),
            rng,
        }
    }

    /// Restores memory, registers, display and timers to the power on state.
    ///
    /// The keyboard latch is left untouched.
    pub fn reset(&mut self) {
        self.opcode = 0;
        self.memory.reset();
        self.registers.reset();
        self.display.clear();
        self.timers.reset();
    }

    /// Will write the rom into memory starting at the program counter base, without
    /// resetting before.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        self.memory.load(rom)
    }

    /// Will reset the chipset and load the given rom.
    pub fn load_rom(&mut self, rom: &Rom) -> Result<(), LoadError> {
        MemoryImage::check_rom(rom.get_data())?;
        self.reset();
        self.load(rom.get_data())?;
        self.name = rom.get_name().to_string();
        log::debug!("loaded rom {} with {} bytes", self.name, rom.get_data().len());
        Ok(())
    }

    /// will advance the program by a single step
    ///
    /// Opcodes that are not part of the instruction set get skipped.
    pub fn step(&mut self) -> Result<Operation, ProcessError> {
        let pc = self.registers.program_counter;
        self.opcode = self.memory.fetch(pc as usize)?;

        let opcode = match Opcodes::try_from(self.opcode) {
            Ok(opcode) => opcode,
            Err(err) => {
                log::warn!("{} Skipping it at {:#06X}.", err, pc);
                self.advance(ProgramCounterStep::Next);
                return Ok(Operation::None);
            }
        };

        log::debug!("pc {:#06X} opcode {:#06X} {:?}", pc, self.opcode, opcode);
        let operation = self.calc(&opcode)?;
        log::trace!("registers {:02X?} index {:#06X}", self.registers.v, self.registers.index);
        Ok(operation)
    }

    /// The name of the loaded rom
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last fetched opcode
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The `V0` to `VF` registers
    pub fn registers(&self) -> &[u8] {
        &self.registers.v
    }

    /// The index register `I`
    pub fn index(&self) -> u16 {
        self.registers.index
    }

    /// The address of the next opcode
    pub fn program_counter(&self) -> u16 {
        self.registers.program_counter
    }

    /// The amount of return addresses on the stack
    pub fn stack_pointer(&self) -> usize {
        self.registers.stack_pointer()
    }

    /// The saved return addresses, the last one is the top of the stack
    pub fn stack(&self) -> &[u16] {
        &self.registers.stack
    }

    /// The whole memory
    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    /// Will return a immutable slice of the current display configuration
    pub fn get_display(&self) -> &[Row] {
        self.display.rows()
    }

    /// The framebuffer behind the display rows
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.display
    }

    /// The timer handle, it can be cloned to drive the timers from an other thread.
    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    /// The keyboard handle, it can be cloned to write the keys from an other thread.
    pub fn keyboard(&self) -> &InputLatch {
        &self.keyboard
    }
}

impl ProgramCounter for ChipSet {
    fn advance(&mut self, step: ProgramCounterStep) {
        self.registers.advance(step)
    }
}
