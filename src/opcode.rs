//! Opcode abstractions, functionality and constants.
use std::convert::{TryFrom, TryInto};

use crate::{definitions::memory, OpcodeError, ProcessError};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bits
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bits
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a nibble
const NIBBLE_SIZE: u16 = 0x4;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// will build an opcode from data and the given point
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and `pointer + 1` make
/// the opcode up
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// # use chip::OpcodeError;
///  const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
///  const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
///  for (i, val) in OPCODES.iter().enumerate() {
///      let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///      assert_eq!(opcode, *val);
///  }
/// # let pointer = 3;
/// # let err = OpcodeError::MemoryInvalid {pointer, len: SPLIT_OPCODE.len() };
/// # assert_eq!(
/// #    Err(err),
/// #    build_opcode(&SPLIT_OPCODE, pointer)
/// # );
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, OpcodeError> {
    match (data.get(pointer), pointer.checked_add(1).and_then(|next| data.get(next))) {
        (Some(high), Some(low)) => Ok(Opcode::from_be_bytes([*high, *low])),
        _ => Err(OpcodeError::MemoryInvalid {
            pointer,
            len: data.len(),
        }),
    }
}

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// the instruction family, the top nibble `T` of `TNNN`
    fn t(&self) -> u8;

    /// this is an opcode extractor for the opcode type `TNNN`
    /// - `NNN` is an address
    fn nnn(&self) -> u16;

    /// this is an opcode extractor for the opcode type `TXNN`
    /// - `X` is a register index
    /// - `NN` is a constant
    fn xnn(&self) -> (usize, u8);

    /// this is an opcode extractor for the opcode type `TXYN`
    /// - `X` is a register index
    /// - `Y` is a register index
    /// - `N` is a constant or an opcode subtype
    fn xyn(&self) -> (usize, usize, u8);

    /// this is an opcode extractor for the opcode type `TXYT`
    fn xy(&self) -> (usize, usize);

    /// this is an opcode extractor for the opcode type `TXTT`
    fn x(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> u8 {
        ((self & OPCODE_MASK_F000) >> (3 * NIBBLE_SIZE)) as u8
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> u16 {
        self & OPCODE_MASK_0FFF
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xnn(), (0xE, 0xDA));
    /// ```
    fn xnn(&self) -> (usize, u8) {
        let x = self.x();
        let nn = (self & OPCODE_MASK_00FF) as u8;
        (x, nn)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
    /// ```
    fn xyn(&self) -> (usize, usize, u8) {
        let (x, y) = self.xy();
        let n = (self & OPCODE_MASK_000F) as u8;
        (x, y, n)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xy(), (0xE, 0xD));
    /// ```
    fn xy(&self) -> (usize, usize) {
        let x = self.x();
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        let y = ((self & MASK) >> NIBBLE_SIZE) as usize;
        (x, y)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> (2 * NIBBLE_SIZE)) as usize
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents the program steps that the chip
/// can take.
pub enum ProgramCounterStep {
    /// Will not change the program counter
    None,
    /// Will move the program counter to the next opcode
    Next,
    /// Will skip over the next opcode
    Skip,
    /// Will simply move the program counter to the given location.
    Jump(u16),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Maps the [`ProgramCounterStep`](ProgramCounterStep) to the corresponding movement distanz,
    /// or for a jump to the target address.
    #[inline]
    pub fn step(&self) -> u16 {
        const SIZE: u16 = memory::opcodes::SIZE as u16;
        match *self {
            ProgramCounterStep::Next => SIZE,
            ProgramCounterStep::Skip => 2 * SIZE,
            ProgramCounterStep::None => 0,
            ProgramCounterStep::Jump(pointer) => pointer,
        }
    }
}

/// Generates the conversion from the raw sub opcode bits into
/// the matching sub opcode enum.
macro_rules! implTryFromSubOpcode {
    ($type_name:ident : $type_from:ty : $( $key:literal => $val:ident ),+ $(,)? ) => {
        impl TryFrom<$type_from> for $type_name {
            type Error = ();

            fn try_from(value: $type_from) -> Result<Self, Self::Error> {
                match value {
                    $(
                        $key => Ok($type_name::$val),
                    )+
                    _ => Err(()),
                }
            }
        }
    };
}

/// The `0NNN` family, only the two display and flow variants are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum System {
    /// `00E0` clears the display
    Clear,
    /// `00EE` returns from the subroutine
    Return,
}

implTryFromSubOpcode!(System : Opcode :
    0x00E0 => Clear,
    0x00EE => Return,
);

/// Opcodes of the form `TNNN`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub nnn: u16,
}

impl From<Opcode> for Address {
    fn from(value: Opcode) -> Self {
        Self { nnn: value.nnn() }
    }
}

/// Opcodes of the form `TXNN`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterConst {
    pub x: usize,
    pub nn: u8,
}

impl From<Opcode> for RegisterConst {
    fn from(value: Opcode) -> Self {
        let (x, nn) = value.xnn();
        Self { x, nn }
    }
}

/// Opcodes of the form `TXY0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterPair {
    pub x: usize,
    pub y: usize,
}

impl TryFrom<Opcode> for RegisterPair {
    type Error = ();

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        match value.xyn() {
            (x, y, 0) => Ok(Self { x, y }),
            _ => Err(()),
        }
    }
}

/// The register to register operations of the `8XYN` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Assign,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    SubReverse,
    ShiftLeft,
}

implTryFromSubOpcode!(AluOp : u8 :
    // 8XY0
    0x0 => Assign,
    // 8XY1
    0x1 => Or,
    // 8XY2
    0x2 => And,
    // 8XY3
    0x3 => Xor,
    // 8XY4
    0x4 => Add,
    // 8XY5
    0x5 => Sub,
    // 8XY6
    0x6 => ShiftRight,
    // 8XY7
    0x7 => SubReverse,
    // 8XYE
    0xE => ShiftLeft,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alu {
    pub op: AluOp,
    pub x: usize,
    pub y: usize,
}

impl TryFrom<Opcode> for Alu {
    type Error = ();

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let (x, y, n) = value.xyn();
        let op = n.try_into()?;
        Ok(Self { op, x, y })
    }
}

/// Opcodes of the form `DXYN`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub x: usize,
    pub y: usize,
    /// the amount of sprite rows
    pub n: usize,
}

impl From<Opcode> for Sprite {
    fn from(value: Opcode) -> Self {
        let (x, y, n) = value.xyn();
        Self { x, y, n: n as usize }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    Pressed,
    NotPressed,
}

implTryFromSubOpcode!(KeyOp : u8 :
    // EX9E
    0x9E => Pressed,
    // EXA1
    0xA1 => NotPressed,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub op: KeyOp,
    pub x: usize,
}

impl TryFrom<Opcode> for Key {
    type Error = ();

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let (x, nn) = value.xnn();
        let op = nn.try_into()?;
        Ok(Self { op, x })
    }
}

/// The timer, keyboard and memory operations of the `FXNN` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscOp {
    GetDelayTimer,
    AwaitKeyPress,
    SetDelayTimer,
    SetSoundTimer,
    AddVxToI,
    SetIToSprite,
    StoreBcd,
    StoreV0ToVx,
    FillV0ToVx,
}

implTryFromSubOpcode!(MiscOp : u8 :
    // FX07
    0x07 => GetDelayTimer,
    // FX0A
    0x0A => AwaitKeyPress,
    // FX15
    0x15 => SetDelayTimer,
    // FX18
    0x18 => SetSoundTimer,
    // FX1E
    0x1E => AddVxToI,
    // FX29
    0x29 => SetIToSprite,
    // FX33
    0x33 => StoreBcd,
    // FX55
    0x55 => StoreV0ToVx,
    // FX65
    0x65 => FillV0ToVx,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Misc {
    pub op: MiscOp,
    pub x: usize,
}

impl TryFrom<Opcode> for Misc {
    type Error = ();

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let (x, nn) = value.xnn();
        let op = nn.try_into()?;
        Ok(Self { op, x })
    }
}

/// A decoded instruction, one variant per opcode family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcodes {
    /// `00E0`, `00EE`
    System(System),
    /// `1NNN`
    Jump(Address),
    /// `2NNN`
    Call(Address),
    /// `3XNN`
    SkipIfEqual(RegisterConst),
    /// `4XNN`
    SkipIfNotEqual(RegisterConst),
    /// `5XY0`
    SkipIfRegistersEqual(RegisterPair),
    /// `6XNN`
    Load(RegisterConst),
    /// `7XNN`
    Add(RegisterConst),
    /// `8XYN`
    Alu(Alu),
    /// `9XY0`
    SkipIfRegistersNotEqual(RegisterPair),
    /// `ANNN`
    SetIndex(Address),
    /// `BNNN`
    JumpOffset(Address),
    /// `CXNN`
    Random(RegisterConst),
    /// `DXYN`
    Draw(Sprite),
    /// `EX9E`, `EXA1`
    Key(Key),
    /// `FXNN`
    Misc(Misc),
}

impl TryFrom<Opcode> for Opcodes {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let invalid = |_| OpcodeError::InvalidOpcode(value);
        let res = match value.t() {
            0x0 => Opcodes::System(value.try_into().map_err(invalid)?),
            0x1 => Opcodes::Jump(value.into()),
            0x2 => Opcodes::Call(value.into()),
            0x3 => Opcodes::SkipIfEqual(value.into()),
            0x4 => Opcodes::SkipIfNotEqual(value.into()),
            0x5 => Opcodes::SkipIfRegistersEqual(value.try_into().map_err(invalid)?),
            0x6 => Opcodes::Load(value.into()),
            0x7 => Opcodes::Add(value.into()),
            0x8 => Opcodes::Alu(value.try_into().map_err(invalid)?),
            0x9 => Opcodes::SkipIfRegistersNotEqual(value.try_into().map_err(invalid)?),
            0xA => Opcodes::SetIndex(value.into()),
            0xB => Opcodes::JumpOffset(value.into()),
            0xC => Opcodes::Random(value.into()),
            0xD => Opcodes::Draw(value.into()),
            0xE => Opcodes::Key(value.try_into().map_err(invalid)?),
            0xF => Opcodes::Misc(value.try_into().map_err(invalid)?),
            _ => return Err(OpcodeError::InvalidOpcode(value)),
        };
        Ok(res)
    }
}

/// Represents a step of the program counter
/// this requires the enum ProgramCounterStep
/// to work.
pub trait ProgramCounter {
    /// will move the program counter forward by a step.
    fn advance(&mut self, step: ProgramCounterStep);
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents a command from the interpreter up to the driver.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// The display was cleared.
    Clear,
    /// The display changed and should be redrawn.
    Draw,
    /// The chip is polling for a key press, the program counter did not move.
    Wait,
}

/// These are the traits that have to be full filled for a working opcode
/// table.
///
/// This trait requires the implementation of the  [`ProgramCounter`](ProgramCounter) trait, as
/// [`calc`](ChipOpcodes::calc) applies the step every handler returns.
pub trait ChipOpcodes: ProgramCounter {
    /// will calculate the programs step by a single step
    fn calc(&mut self, opcode: &Opcodes) -> Result<Operation, ProcessError> {
        let mut operation = Operation::None;
        let step_op = |(step, op): (ProgramCounterStep, Operation)| {
            operation = op;
            step
        };

        let step = match opcode {
            Opcodes::System(opcode) => self.system(opcode).map(step_op),
            Opcodes::Jump(opcode) => self.jump(opcode),
            Opcodes::Call(opcode) => self.call(opcode),
            Opcodes::SkipIfEqual(opcode) => self.skip_if_equal(opcode),
            Opcodes::SkipIfNotEqual(opcode) => self.skip_if_not_equal(opcode),
            Opcodes::SkipIfRegistersEqual(opcode) => self.skip_if_registers_equal(opcode),
            Opcodes::Load(opcode) => self.load_const(opcode),
            Opcodes::Add(opcode) => self.add_const(opcode),
            Opcodes::Alu(opcode) => self.alu(opcode),
            Opcodes::SkipIfRegistersNotEqual(opcode) => self.skip_if_registers_not_equal(opcode),
            Opcodes::SetIndex(opcode) => self.set_index(opcode),
            Opcodes::JumpOffset(opcode) => self.jump_offset(opcode),
            Opcodes::Random(opcode) => self.random(opcode),
            Opcodes::Draw(opcode) => self.draw(opcode).map(step_op),
            Opcodes::Key(opcode) => self.key(opcode),
            Opcodes::Misc(opcode) => self.misc(opcode).map(step_op),
        }?;

        self.advance(step);
        Ok(operation)
    }

    /// - `00E0` - Display  - `disp_clear()`        - Clears the screen.
    /// - `00EE` - Flow     - `return;`             - Returns from a subroutine.
    fn system(&mut self, opcode: &System)
        -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `1NNN` - Flow     - `goto NNN;`           - Jumps to address `NNN`.
    fn jump(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `2NNN` - Flow     - `*(0xNNN)()`          - Calls subroutine at `NNN`.
    fn call(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `3XNN` - Cond     - `if(Vx==NN)`          - Skips the next instruction if `VX` equals `NN`.
    fn skip_if_equal(&self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `4XNN` - Cond     - `if(Vx!=NN)`          - Skips the next instruction if `VX` doesn't equal `NN`.
    fn skip_if_not_equal(&self, opcode: &RegisterConst)
        -> Result<ProgramCounterStep, ProcessError>;

    /// - `5XY0` - Cond     - `if(Vx==Vy)`          - Skips the next instruction if `VX` equals `VY`.
    fn skip_if_registers_equal(
        &self,
        opcode: &RegisterPair,
    ) -> Result<ProgramCounterStep, ProcessError>;

    /// - `6XNN` - Const    - `Vx = NN`             - Sets `VX` to `NN`.
    fn load_const(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `7XNN` - Const    - `Vx += NN`            - Adds `NN` to `VX`. (Carry flag is not changed)
    fn add_const(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// The `8XYN` family, `N` selects the operation.
    ///
    /// - `8XY0` - Assign   - `Vx=Vy`               - Sets `VX` to the value of `VY`.
    /// - `8XY1` - BitOp    - `Vx=Vx|Vy`            - Sets `VX` to `VX` or `VY`.
    /// - `8XY2` - BitOp    - `Vx=Vx&Vy`            - Sets `VX` to `VX` and `VY`.
    /// - `8XY3` - BitOp    - `Vx=Vx^Vy`            - Sets `VX` to `VX` xor `VY`.
    /// - `8XY4` - Math     - `Vx += Vy`            - Adds `VY` to `VX`. `VF` is set to `1` when there's a carry, and to `0` when there isn't.
    /// - `8XY5` - Math     - `Vx -= Vy`            - `VY` is subtracted from `VX`. `VF` is set to `1` when `VX >= VY`, and to `0` otherwise.
    /// - `8XY6` - BitOp    - `Vx=Vy>>1`            - Stores the least significant bit of `VY` in `VF` and stores `VY` shifted right by `1` in `VX`.
    /// - `8XY7` - Math     - `Vx=Vy-Vx`            - Sets `VX` to `VY` minus `VX`. `VF` is set to `1` when `VY >= VX`, and to `0` otherwise.
    /// - `8XYE` - BitOp    - `Vx=Vy<<1`            - Stores the most significant bit of `VY` in `VF` and stores `VY` shifted left by `1` in `VX`.
    ///
    /// `VF` is written before `VX`, so with `X == F` the result wins over the flag.
    fn alu(&mut self, opcode: &Alu) -> Result<ProgramCounterStep, ProcessError>;

    /// - `9XY0` - Cond     - `if(Vx!=Vy)`          - Skips the next instruction if `VX` doesn't equal `VY`.
    fn skip_if_registers_not_equal(
        &self,
        opcode: &RegisterPair,
    ) -> Result<ProgramCounterStep, ProcessError>;

    /// - `ANNN` - MEM      - `I = NNN`             - Sets `I` to the address `NNN`.
    fn set_index(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `BNNN` - Flow     - `PC=V0+NNN`           - Jumps to the address `NNN` plus `V0`.
    fn jump_offset(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `CXNN` - Rand     - `Vx=rand()&NN`        - Sets `VX` to the result of a bitwise and operation on a random byte and `NN`.
    fn random(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `DXYN` - Disp     - `draw(Vx,Vy,N)`       - Draws a sprite at coordinate `(VX, VY)` that has a width of `8` pixels and a height of `N` pixels. Each row of `8` pixels is read as bit-coded starting from memory location `I`; `I` value doesn’t change after the execution of this instruction. `VF` is set to `1` if any screen pixels are flipped from set to unset when the sprite is drawn, and to `0` if that doesn’t happen. Pixels outside of the screen wrap around.
    fn draw(&mut self, opcode: &Sprite) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `EX9E` - KeyOp    - `if(key()==Vx)`       - Skips the next instruction if the key stored in `VX` is pressed.
    /// - `EXA1` - KeyOp    - `if(key()!=Vx)`       - Skips the next instruction if the key stored in `VX` isn't pressed.
    fn key(&self, opcode: &Key) -> Result<ProgramCounterStep, ProcessError>;

    /// The `FXNN` family, `NN` selects the operation.
    ///
    /// - `FX07` - Timer    - `Vx = get_delay()`    - Sets `VX` to the value of the delay timer.
    /// - `FX0A` - KeyOp    - `Vx = get_key()`      - A key press is awaited, and then stored in `VX`. The program counter stays on this opcode until a key is latched.
    /// - `FX15` - Timer    - `delay_timer(Vx)`     - Sets the delay timer to `VX`.
    /// - `FX18` - Sound    - `sound_timer(Vx)`     - Sets the sound timer to `VX`.
    /// - `FX1E` - MEM      - `I +=Vx`              - Adds `VX` to `I`. `VF` is not affected.
    /// - `FX29` - MEM      - `I=sprite_addr[Vx]`   - Sets `I` to the location of the sprite for the character in `VX`.
    /// - `FX33` - BCD      - `set_BCD(Vx)`         - Stores the [binary-coded decimal](https://en.wikipedia.org/wiki/Binary-coded_decimal) representation of `VX` at `I`, `I+1` and `I+2`.
    /// - `FX55` - MEM      - `reg_dump(Vx,&I)`     - Stores `V0` to `VX` (including `VX`) in memory starting at address `I`, then increments `I` by `X+1`.
    /// - `FX65` - MEM      - `reg_load(Vx,&I)`     - Fills `V0` to `VX` (including `VX`) from memory starting at address `I`, then increments `I` by `X+1`.
    fn misc(&mut self, opcode: &Misc) -> Result<(ProgramCounterStep, Operation), ProcessError>;
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use super::*;

    #[test]
    fn test_tryfrom_opcode_simple() {
        let value: Opcode = 0x00E0;
        let res = Ok(Opcodes::System(System::Clear));
        let conv = value.try_into();
        assert_eq!(conv, res);
    }

    #[test]
    fn test_tryfrom_opcode_simple_fail() {
        let value: Opcode = 0x00E1;
        let conv: Result<Opcodes, _> = value.try_into();
        assert_eq!(conv, Err(OpcodeError::InvalidOpcode(value)));
    }

    #[test]
    fn test_build_opcode_out_of_bounds() {
        let data = [0x12, 0x34, 0x56];
        assert_eq!(build_opcode(&data, 1), Ok(0x3456));
        assert_eq!(
            build_opcode(&data, 2),
            Err(OpcodeError::MemoryInvalid { pointer: 2, len: 3 })
        );
        assert_eq!(
            build_opcode(&data, usize::MAX),
            Err(OpcodeError::MemoryInvalid {
                pointer: usize::MAX,
                len: 3
            })
        );
    }

    #[test]
    fn test_step_distance() {
        assert_eq!(ProgramCounterStep::None.step(), 0);
        assert_eq!(ProgramCounterStep::Next.step(), 2);
        assert_eq!(ProgramCounterStep::Skip.step(), 4);
        assert_eq!(ProgramCounterStep::Jump(0x345).step(), 0x345);
    }

    #[test]
    fn test_tryfrom_opcode_multiple() {
        let alu = |op| Ok(Opcodes::Alu(Alu { op, x: 0x1, y: 0x2 }));
        let misc = |op| Ok(Opcodes::Misc(Misc { op, x: 0x3 }));
        let tests: Vec<(Opcode, Result<Opcodes, ()>)> = vec![
            (0x00E0, Ok(Opcodes::System(System::Clear))),
            (0x00EE, Ok(Opcodes::System(System::Return))),
            (0x00E1, Err(())),
            // machine code routines are not supported
            (0x0123, Err(())),
            (0x1919, Ok(Opcodes::Jump(Address { nnn: 0x919 }))),
            (0x2222, Ok(Opcodes::Call(Address { nnn: 0x222 }))),
            (0x3123, Ok(Opcodes::SkipIfEqual(RegisterConst { x: 0x1, nn: 0x23 }))),
            (0x4123, Ok(Opcodes::SkipIfNotEqual(RegisterConst { x: 0x1, nn: 0x23 }))),
            (0x5120, Ok(Opcodes::SkipIfRegistersEqual(RegisterPair { x: 0x1, y: 0x2 }))),
            (0x5121, Err(())),
            (0x6123, Ok(Opcodes::Load(RegisterConst { x: 0x1, nn: 0x23 }))),
            (0x7123, Ok(Opcodes::Add(RegisterConst { x: 0x1, nn: 0x23 }))),
            (0x8120, alu(AluOp::Assign)),
            (0x8121, alu(AluOp::Or)),
            (0x8122, alu(AluOp::And)),
            (0x8123, alu(AluOp::Xor)),
            (0x8124, alu(AluOp::Add)),
            (0x8125, alu(AluOp::Sub)),
            (0x8126, alu(AluOp::ShiftRight)),
            (0x8127, alu(AluOp::SubReverse)),
            (0x812E, alu(AluOp::ShiftLeft)),
            (0x8128, Err(())),
            (0x9120, Ok(Opcodes::SkipIfRegistersNotEqual(RegisterPair { x: 0x1, y: 0x2 }))),
            (0x9121, Err(())),
            (0xA222, Ok(Opcodes::SetIndex(Address { nnn: 0x222 }))),
            (0xB222, Ok(Opcodes::JumpOffset(Address { nnn: 0x222 }))),
            (0xC123, Ok(Opcodes::Random(RegisterConst { x: 0x1, nn: 0x23 }))),
            (0xD123, Ok(Opcodes::Draw(Sprite { x: 0x1, y: 0x2, n: 0x3 }))),
            (0xE19E, Ok(Opcodes::Key(Key { op: KeyOp::Pressed, x: 0x1 }))),
            (0xE1A1, Ok(Opcodes::Key(Key { op: KeyOp::NotPressed, x: 0x1 }))),
            (0xE111, Err(())),
            (0xF307, misc(MiscOp::GetDelayTimer)),
            (0xF30A, misc(MiscOp::AwaitKeyPress)),
            (0xF315, misc(MiscOp::SetDelayTimer)),
            (0xF318, misc(MiscOp::SetSoundTimer)),
            (0xF31E, misc(MiscOp::AddVxToI)),
            (0xF329, misc(MiscOp::SetIToSprite)),
            (0xF333, misc(MiscOp::StoreBcd)),
            (0xF355, misc(MiscOp::StoreV0ToVx)),
            (0xF365, misc(MiscOp::FillV0ToVx)),
            (0xF3AA, Err(())),
        ];
        for (value, res) in tests {
            let conv: Result<Opcodes, _> = value.try_into();
            assert_eq!(conv, res.map_err(|_| OpcodeError::InvalidOpcode(value)));
        }
    }
}
