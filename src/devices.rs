use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use crate::{
    definitions::{display, keyboard},
    KeyError,
};

/// A single row of the display
pub type Row = [bool; display::WIDTH];

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will clear the display
    fn clear_display(&mut self);
    /// Will display all from the pixels
    fn display(&mut self, pixels: &[Row]);
}

/// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
/// `(64 x 32)`. Every pixel is either on or off, the rows are stored top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    rows: Box<[Row; display::HEIGHT]>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            rows: Box::new([[false; display::WIDTH]; display::HEIGHT]),
        }
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will turn off every pixel.
    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.fill(false);
        }
    }

    /// Will flip the pixel at the given coordinates, both of them wrap around
    /// the screen edges.
    ///
    /// Returns `true` if the pixel was on before, so it got erased.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.rows[y % display::HEIGHT][x % display::WIDTH];
        let was_set = *pixel;
        *pixel = !was_set;
        was_set
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.rows[y % display::HEIGHT][x % display::WIDTH]
    }

    /// Will return the rows of the display, `(0, 0)` is the top left corner.
    pub fn rows(&self) -> &[Row] {
        &self.rows[..]
    }

    /// Checks if there is any pixel turned on.
    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|pixel| !*pixel))
    }
}

/// Will store the last pressed key, or that there is none.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The latch is shared between
/// the chip and the input side, the handle can be cloned and written from any thread. The chip
/// will see a written key at the latest during the next step.
#[derive(Debug, Clone)]
pub struct InputLatch {
    key: Arc<AtomicU8>,
}

impl Default for InputLatch {
    fn default() -> Self {
        Self {
            key: Arc::new(AtomicU8::new(keyboard::NO_KEY)),
        }
    }
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will latch the given key, `None` releases the latch.
    pub fn set(&self, key: Option<u8>) -> Result<(), KeyError> {
        let value = match key {
            Some(key) if key as usize >= keyboard::SIZE => {
                log::warn!("rejecting key {:#X}", key);
                return Err(KeyError::OutOfRange(key));
            }
            Some(key) => key,
            None => keyboard::NO_KEY,
        };
        self.key.store(value, Ordering::Release);
        Ok(())
    }

    /// Will return the currently latched key.
    pub fn get(&self) -> Option<u8> {
        match self.key.load(Ordering::Acquire) {
            keyboard::NO_KEY => None,
            key => Some(key),
        }
    }

    /// Checks if the given key is the one latched.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.get() == Some(key)
    }
}
