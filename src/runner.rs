use std::{sync::Arc, time::Duration};

use parking_lot::{Mutex, MutexGuard};

use crate::{
    chip8::ChipSet,
    definitions::cpu,
    devices::DisplayCommands,
    opcode::Operation,
    timer::{TimedWorker, TimerCallback, TimerTicker, Worker},
    ProcessError,
};

/// Runs a chipset on a worker thread, while a second worker drives its timers.
///
/// The display is informed about every change of the screen, the keyboard is written through the
/// [`InputLatch`](crate::devices::InputLatch) handle of the chip.
pub struct Runner<W: TimedWorker = Worker> {
    chip: Arc<Mutex<ChipSet>>,
    error: Arc<Mutex<Option<ProcessError>>>,
    worker: W,
    ticker: TimerTicker<W>,
}

impl<W: TimedWorker> Runner<W> {
    /// Will start the chip at the default cpu rate.
    pub fn start<D, S>(chip: ChipSet, display: D, sound: S) -> Self
    where
        D: DisplayCommands + Send + 'static,
        S: TimerCallback + Send + 'static,
    {
        Self::with_interval(
            chip,
            display,
            sound,
            Duration::from_millis(cpu::INTERVAL),
        )
    }

    /// Will start the chip, one opcode is run per interval.
    pub fn with_interval<D, S>(chip: ChipSet, mut display: D, sound: S, interval: Duration) -> Self
    where
        D: DisplayCommands + Send + 'static,
        S: TimerCallback + Send + 'static,
    {
        let ticker = TimerTicker::start(chip.timers().clone(), sound);

        let chip = Arc::new(Mutex::new(chip));
        let error = Arc::new(Mutex::new(None));

        let cchip = chip.clone();
        let cerror = error.clone();
        let mut failed = false;

        let inner_run = move || {
            if failed {
                return;
            }

            let mut chip = cchip.lock();
            match chip.step() {
                Ok(Operation::Draw) => display.display(chip.get_display()),
                Ok(Operation::Clear) => display.clear_display(),
                Ok(Operation::None) | Ok(Operation::Wait) => {}
                Err(err) => {
                    log::error!(
                        "Stopping {} at {:#06X}: {}",
                        chip.name(),
                        chip.program_counter(),
                        err
                    );
                    *cerror.lock() = Some(err);
                    failed = true;
                }
            }
        };

        let mut worker = W::new();
        worker.start(inner_run, interval);

        Self {
            chip,
            error,
            worker,
            ticker,
        }
    }

    /// Will lock the chip, the runner can't advance while the guard is held.
    pub fn chip(&self) -> MutexGuard<'_, ChipSet> {
        self.chip.lock()
    }

    /// The error that stopped the execution.
    pub fn error(&self) -> Option<ProcessError> {
        self.error.lock().clone()
    }

    /// Will stop running the chip and its timers.
    pub fn stop(&mut self) {
        self.worker.stop();
        self.ticker.stop();
    }

    pub fn is_alive(&self) -> bool {
        self.worker.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{devices::MockDisplayCommands, timer::NoCallback, StackError};

    fn chip(rom: &[u8]) -> ChipSet {
        let mut chip = ChipSet::new();
        chip.load(rom).unwrap();
        chip
    }

    fn start(chip: ChipSet, display: MockDisplayCommands) -> Runner {
        Runner::with_interval(chip, display, NoCallback, Duration::from_millis(1))
    }

    #[test]
    fn test_runner_draws() {
        // clear, V0 = 0, I = font of 0, draw it, loop forever
        let rom = [0x00, 0xE0, 0x60, 0x00, 0xA0, 0x00, 0xD0, 0x05, 0x12, 0x08];
        let pixels = Arc::new(AtomicUsize::new(0));
        let cpixels = pixels.clone();

        let mut display = MockDisplayCommands::new();
        display.expect_clear_display().times(1).return_const(());
        display.expect_display().times(1).returning(move |rows| {
            let on = rows.iter().flatten().filter(|pixel| **pixel).count();
            cpixels.store(on, Ordering::SeqCst);
        });

        let mut runner = start(chip(&rom), display);
        assert!(runner.is_alive());

        std::thread::sleep(Duration::from_millis(200));
        // an unexpected call would have panicked the worker
        assert!(runner.is_alive());
        runner.stop();
        assert!(!runner.is_alive());

        // the glyph 0 has 14 pixels
        assert_eq!(pixels.load(Ordering::SeqCst), 14);
        assert_eq!(runner.chip().program_counter(), 0x208);
        assert_eq!(runner.error(), None);
    }

    #[test]
    fn test_runner_stops_on_error() {
        let rom = [0x00, 0xEE];

        let mut display = MockDisplayCommands::new();
        display.expect_display().never();
        display.expect_clear_display().never();

        let mut runner = start(chip(&rom), display);

        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(
            runner.error(),
            Some(ProcessError::Stack(StackError::Empty))
        );
        assert_eq!(runner.chip().program_counter(), 0x200);
        assert!(runner.is_alive());
        runner.stop();
    }

    #[test]
    fn test_runner_waits_for_key() {
        // V1 = key, then loop forever
        let rom = [0xF1, 0x0A, 0x12, 0x02];
        let chip = chip(&rom);
        let keyboard = chip.keyboard().clone();

        let mut runner = start(chip, MockDisplayCommands::new());

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(runner.chip().program_counter(), 0x200);

        keyboard.set(Some(0x9)).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert!(runner.is_alive());
        runner.stop();

        let chip = runner.chip();
        assert_eq!(chip.program_counter(), 0x202);
        assert_eq!(chip.registers()[0x1], 0x9);
    }
}
