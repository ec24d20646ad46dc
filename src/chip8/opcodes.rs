use crate::{
    definitions::display::fontset,
    opcode::{
        Address, Alu, AluOp, ChipOpcodes, Key, KeyOp, Misc, MiscOp, Operation, ProgramCounterStep,
        RegisterConst, RegisterPair, Sprite, System,
    },
    ProcessError,
};

use super::ChipSet;

impl ChipOpcodes for ChipSet {
    fn system(&mut self, opcode: &System) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        match opcode {
            System::Clear => {
                self.display.clear();
                Ok((ProgramCounterStep::Next, Operation::Clear))
            }
            System::Return => {
                // Return from sub routine => pop from stack
                let pc = self.registers.pop_stack()?;
                log::debug!("return to {:#06X}", pc);
                Ok((ProgramCounterStep::Jump(pc), Operation::None))
            }
        }
    }

    fn jump(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        Ok(ProgramCounterStep::Jump(opcode.nnn))
    }

    fn call(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        // the return address is the opcode after the call
        let next = self
            .registers
            .program_counter
            .wrapping_add(ProgramCounterStep::Next.step());
        self.registers.push_stack(next)?;
        Ok(ProgramCounterStep::Jump(opcode.nnn))
    }

    fn skip_if_equal(&self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        Ok(ProgramCounterStep::cond(
            self.registers.v[opcode.x] == opcode.nn,
        ))
    }

    fn skip_if_not_equal(
        &self,
        opcode: &RegisterConst,
    ) -> Result<ProgramCounterStep, ProcessError> {
        Ok(ProgramCounterStep::cond(
            self.registers.v[opcode.x] != opcode.nn,
        ))
    }

    fn skip_if_registers_equal(
        &self,
        opcode: &RegisterPair,
    ) -> Result<ProgramCounterStep, ProcessError> {
        let v = &self.registers.v;
        Ok(ProgramCounterStep::cond(v[opcode.x] == v[opcode.y]))
    }

    fn load_const(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        self.registers.v[opcode.x] = opcode.nn;
        Ok(ProgramCounterStep::Next)
    }

    fn add_const(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        // let VX overflow, but ignore carry
        let x = opcode.x;
        self.registers.v[x] = self.registers.v[x].wrapping_add(opcode.nn);
        Ok(ProgramCounterStep::Next)
    }

    fn alu(&mut self, opcode: &Alu) -> Result<ProgramCounterStep, ProcessError> {
        let Alu { op, x, y } = *opcode;
        let vx = self.registers.v[x];
        let vy = self.registers.v[y];

        let (result, flag) = match op {
            AluOp::Assign => (vy, None),
            AluOp::Or => (vx | vy, None),
            AluOp::And => (vx & vy, None),
            AluOp::Xor => (vx ^ vy, None),
            AluOp::Add => {
                let (result, carry) = vx.overflowing_add(vy);
                (result, Some(carry))
            }
            // the flag is "no borrow"
            AluOp::Sub => (vx.wrapping_sub(vy), Some(vx >= vy)),
            AluOp::SubReverse => (vy.wrapping_sub(vx), Some(vy >= vx)),
            AluOp::ShiftRight => (vy >> 1, Some(vy & 0x01 == 0x01)),
            AluOp::ShiftLeft => (vy << 1, Some(vy & 0x80 == 0x80)),
        };

        if let Some(flag) = flag {
            self.registers.set_flag(flag);
        }
        self.registers.v[x] = result;
        Ok(ProgramCounterStep::Next)
    }

    fn skip_if_registers_not_equal(
        &self,
        opcode: &RegisterPair,
    ) -> Result<ProgramCounterStep, ProcessError> {
        let v = &self.registers.v;
        Ok(ProgramCounterStep::cond(v[opcode.x] != v[opcode.y]))
    }

    fn set_index(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        self.registers.index = opcode.nnn;
        Ok(ProgramCounterStep::Next)
    }

    fn jump_offset(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        let v0 = self.registers.v[0] as u16;
        Ok(ProgramCounterStep::Jump(opcode.nnn + v0))
    }

    fn random(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        // using a fill bytes call here, as the trait RngCore does not
        // support random u8.
        let mut rand: [u8; 1] = [0];
        self.rng.fill_bytes(&mut rand);
        self.registers.v[opcode.x] = opcode.nn & rand[0];
        Ok(ProgramCounterStep::Next)
    }

    fn draw(&mut self, opcode: &Sprite) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        // see https://tobiasvl.github.io/blog/write-a-chip-8-emulator/
        const BYTE: usize = 8;

        let coorx = self.registers.v[opcode.x] as usize;
        let coory = self.registers.v[opcode.y] as usize;
        let sprite = self
            .memory
            .slice(self.registers.index as usize, opcode.n)?;

        let mut collision = false;
        for (i, row) in sprite.iter().enumerate() {
            for j in 0..BYTE {
                // most significant bit first
                let mask: u8 = 0x80 >> j;
                if *row & mask == 0 {
                    continue;
                }
                // erasing an already set pixel is a collision
                collision |= self.display.toggle(coorx + j, coory + i);
            }
        }

        // VF only ever goes from 0 to 1 during the draw
        self.registers.set_flag(collision);
        Ok((ProgramCounterStep::Next, Operation::Draw))
    }

    fn key(&self, opcode: &Key) -> Result<ProgramCounterStep, ProcessError> {
        let pressed = self.keyboard.is_pressed(self.registers.v[opcode.x]);
        let step = match opcode.op {
            KeyOp::Pressed => ProgramCounterStep::cond(pressed),
            KeyOp::NotPressed => ProgramCounterStep::cond(!pressed),
        };
        Ok(step)
    }

    fn misc(&mut self, opcode: &Misc) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        let x = opcode.x;
        let index = self.registers.index;
        match opcode.op {
            MiscOp::GetDelayTimer => {
                self.registers.v[x] = self.timers.delay();
            }
            MiscOp::AwaitKeyPress => match self.keyboard.get() {
                Some(key) => self.registers.v[x] = key,
                None => {
                    // don't move the counter, the opcode is repeated until a key is latched
                    return Ok((ProgramCounterStep::None, Operation::Wait));
                }
            },
            MiscOp::SetDelayTimer => {
                self.timers.set_delay(self.registers.v[x]);
            }
            MiscOp::SetSoundTimer => {
                self.timers.set_sound(self.registers.v[x]);
            }
            MiscOp::AddVxToI => {
                // VF is not affected
                self.registers.index = index.wrapping_add(self.registers.v[x] as u16);
            }
            MiscOp::SetIToSprite => {
                let glyph = self.registers.v[x] as usize;
                self.registers.index = (fontset::LOCATION + fontset::GLYPH_SIZE * glyph) as u16;
            }
            MiscOp::StoreBcd => {
                let r = self.registers.v[x];
                let bcd = [r / 100, r / 10 % 10, r % 10];
                self.memory
                    .slice_mut(index as usize, bcd.len())?
                    .copy_from_slice(&bcd);
            }
            MiscOp::StoreV0ToVx => {
                self.memory
                    .slice_mut(index as usize, x + 1)?
                    .copy_from_slice(&self.registers.v[..=x]);
                self.registers.index = index.wrapping_add(x as u16 + 1);
            }
            MiscOp::FillV0ToVx => {
                let data = self.memory.slice(index as usize, x + 1)?;
                self.registers.v[..=x].copy_from_slice(data);
                self.registers.index = index.wrapping_add(x as u16 + 1);
            }
        }
        Ok((ProgramCounterStep::Next, Operation::None))
    }
}
