//! The pretty print implementation of the [`ChipSet`](super::ChipSet).
//! This implementation was split up into this file for smaller file sizes and higher
//! cohesion.

use std::fmt::{self, Write};

use once_cell::sync::Lazy;

use super::ChipSet;
use crate::definitions::cpu;

/// The length of the pretty print data
/// as a single instruction is u16 the octa
/// size will show how often the block shall
/// be repeated has to be bigger then 0
const HEX_PRINT_STEP: usize = 8;

const END_OF_LINE: char = '\n';
const INDENT_FILLAMENT: char = '\t';
const INDENT_SIZE: usize = 2;

/// Will add an indent post processing
fn indent_helper(text: &mut String, indent: usize) {
    for _ in 0..indent {
        text.push(INDENT_FILLAMENT);
    }
}

macro_rules! intformat {
    () => {
        // The formatted string will be 2 sysbols for the prefix (0x)
        // and 4 for the rest long.
        "{:#06X}"
    };
}

static POINTER_LEN: Lazy<usize> = Lazy::new(|| pointer_print::format(0, 0).len());
static INTEGER_LEN: Lazy<usize> = Lazy::new(|| format!(intformat!(), 0u8).len());
// calculate a line lenght (This is a bit bigger then the actual line will be)
static LENLINE: Lazy<usize> =
    Lazy::new(|| INDENT_SIZE + HEX_PRINT_STEP * (*INTEGER_LEN + 1) + 1 + *POINTER_LEN);

/// Handles all the printing of the pointer values.
mod pointer_print {
    use std::fmt::{self, Write};

    /// will formatt the pointers according to definition
    pub(super) fn formatter(line: &mut String, from: usize, to: usize) -> fmt::Result {
        write!(line, concat!(intformat!(), " - ", intformat!(), " :"), from, to)
    }

    pub(super) fn format(from: usize, to: usize) -> String {
        format!(concat!(intformat!(), " - ", intformat!(), " :"), from, to)
    }
}

/// Handles all the opcode prints
mod opcode_print {
    use std::fmt::{self, Write};

    use once_cell::sync::Lazy;

    use super::{integer_print, pointer_print, END_OF_LINE, HEX_PRINT_STEP};
    use crate::{definitions::memory, opcode::Opcode};

    /// The internal length of the given data
    /// as the data is stored as u8 and an opcode
    /// is u16 long
    const POINTER_INCREMENT: usize = HEX_PRINT_STEP * memory::opcodes::SIZE;
    /// The values that are used when there are at lease two rows of zeros.
    const FILLER_BASE: &str = "...";

    /// Prepares the line that will be used, in the case that there is a row of only zeros.
    static ZERO_FILLER: Lazy<String> = Lazy::new(|| {
        let formatted = format!(intformat!(), 0u16);
        let lenght =
            formatted.len() * (HEX_PRINT_STEP - 2) + (HEX_PRINT_STEP - 1) - FILLER_BASE.len();
        let filler = " ".repeat(lenght / 2);
        format!("{0}{1}{2}{1}{0}", formatted, filler, FILLER_BASE)
    });

    /// this struct will simulate a single row of opcodes (only in this context)
    struct Row {
        from: usize,
        to: usize,
        data: [Opcode; HEX_PRINT_STEP],
        only_null: bool,
    }

    impl fmt::Display for Row {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut res = String::with_capacity(*super::LENLINE);
            pointer_print::formatter(&mut res, self.from, self.to)?;
            res.push(' ');

            if self.only_null {
                res.push_str(&ZERO_FILLER)
            } else {
                for entry in self.data.iter() {
                    integer_print::formatter(&mut res, *entry)?;
                    res.push(' ');
                }
                res.truncate(res.trim_end().len());
            }
            f.write_str(&res)
        }
    }

    /// will pretty print the content of the raw memory, consecutive rows of zeros are
    /// collapsed into a single one
    ///
    /// this functions assumes the full data to be passed
    /// as the offset is calculated from the beginning of the
    /// memory block
    pub(super) fn printer(memory: &[u8], indent: usize) -> Result<String, fmt::Error> {
        let mut rows: Vec<Row> = Vec::with_capacity(memory.len() / POINTER_INCREMENT);

        for (chunk_index, chunk) in memory.chunks(POINTER_INCREMENT).enumerate() {
            let from = chunk_index * POINTER_INCREMENT;
            let to = from + chunk.len() - 1;

            let mut data = [0; HEX_PRINT_STEP];
            for (entry, pair) in data.iter_mut().zip(chunk.chunks(memory::opcodes::SIZE)) {
                // an odd trailing byte is the high half of the opcode
                let low = pair.get(1).copied().unwrap_or(0);
                *entry = Opcode::from_be_bytes([pair[0], low]);
            }
            let only_null = data.iter().all(|opcode| *opcode == 0);

            if only_null {
                if let Some(last_row) = rows.last_mut() {
                    if last_row.only_null {
                        last_row.to = to;
                        continue;
                    }
                }
            }

            rows.push(Row {
                from,
                to,
                data,
                only_null,
            })
        }

        let mut string = String::with_capacity((*super::LENLINE + 1) * rows.len());
        for row in rows {
            super::indent_helper(&mut string, indent);
            write!(string, "{}{}", row, END_OF_LINE)?;
        }
        string.truncate(string.trim_end_matches(END_OF_LINE).len());
        Ok(string)
    }
}

/// handles printting of any and all of intergers.
mod integer_print {
    use std::fmt::{self, Write};

    use num_traits::Unsigned;

    use super::{pointer_print, END_OF_LINE, HEX_PRINT_STEP};

    /// will format all integer types
    pub(super) fn formatter<T>(line: &mut String, data: T) -> fmt::Result
    where
        T: fmt::Display + fmt::UpperHex + Unsigned + Copy,
    {
        write!(line, intformat!(), data)
    }

    /// will pretty print all the integer data given
    pub(super) fn printer<T>(data: &[T], indent: usize) -> Result<String, fmt::Error>
    where
        T: fmt::Display + fmt::UpperHex + Unsigned + Copy,
    {
        let result_size = *super::LENLINE * (data.len() / HEX_PRINT_STEP + 1);

        let mut res = String::with_capacity(result_size);
        for (chunk_index, chunk) in data.chunks(HEX_PRINT_STEP).enumerate() {
            let from = chunk_index * HEX_PRINT_STEP;

            super::indent_helper(&mut res, indent);
            pointer_print::formatter(&mut res, from, from + chunk.len() - 1)?;

            for entry in chunk {
                res.push(' ');
                formatter(&mut res, *entry)?;
            }
            res.push(END_OF_LINE);
        }

        // Remove unneded new line
        res.truncate(res.trim_end_matches(END_OF_LINE).len());
        Ok(res)
    }
}

/// Writes the line indented
fn single_line(value: &str) -> String {
    let mut line = String::with_capacity(INDENT_SIZE + value.len());
    indent_helper(&mut line, INDENT_SIZE);
    line.push_str(value);
    line
}

impl fmt::Display for ChipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nam = single_line(&self.name);
        let opc = single_line(&format!(intformat!(), self.opcode));
        let prc = single_line(&format!(intformat!(), self.registers.program_counter));
        let ind = single_line(&format!(intformat!(), self.registers.index));

        let mem = opcode_print::printer(self.memory.as_slice(), INDENT_SIZE)?;
        let reg = integer_print::printer(&self.registers.v, INDENT_SIZE)?;

        // handle stack specially as it needes to be filled up if empty
        let mut stack = [0u16; cpu::stack::SIZE];
        stack[..self.registers.stack.len()].copy_from_slice(&self.registers.stack);
        let sta = integer_print::printer(&stack, INDENT_SIZE)?;

        let key = match self.keyboard.get() {
            Some(key) => single_line(&format!(intformat!(), key)),
            None => single_line("none"),
        };

        let mut tim = String::with_capacity(*LENLINE);
        indent_helper(&mut tim, INDENT_SIZE);
        write!(
            tim,
            concat!("delay ", intformat!(), " sound ", intformat!()),
            self.timers.delay(),
            self.timers.sound()
        )?;

        write!(
            f,
            "Chipset {{\n\
                \tProgram Name :\n{}\n\
                \tOpcode :\n{}\n\
                \tProgram Counter :\n{}\n\
                \tIndex :\n{}\n\
                \tMemory :\n{}\n\
                \tKeyboard :\n{}\n\
                \tStack :\n{}\n\
                \tRegister :\n{}\n\
                \tTimers :\n{}\n\
                }}",
            nam, opc, prc, ind, mem, key, sta, reg, tim
        )
    }
}
