use {
    crate::definitions::timer,
    parking_lot::Mutex,
    std::{
        sync::{
            mpsc::{self, RecvTimeoutError, SyncSender},
            Arc,
        },
        thread::{self, JoinHandle},
        time::{Duration, Instant},
    },
};

#[cfg_attr(test, mockall::automock)]
/// Will be notified by the [`TimerTicker`](TimerTicker) when the sound timer changes its state.
pub trait TimerCallback {
    /// `active` is `true` once the sound timer holds a non zero value, and `false` after it ran
    /// down to zero.
    fn sound_changed(&mut self, active: bool);
}

/// A callback that ignores all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCallback;

impl TimerCallback for NoCallback {
    fn sound_changed(&mut self, _active: bool) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counters {
    delay: u8,
    sound: u8,
}

/// The two count down timers of the chip.
///
/// - Delay timer: This timer is intended to be used for timing the events of games. Its value
///   can be set and read.
/// - Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
///   sound is made.
///
/// Both count down at 60 hertz, until they reach 0. The handle can be cloned, all clones share
/// the same counters.
#[derive(Debug, Clone, Default)]
pub struct TimerBank {
    counters: Arc<Mutex<Counters>>,
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will get the value that the delay timer is currently at.
    pub fn delay(&self) -> u8 {
        self.counters.lock().delay
    }

    /// Will get the value that the sound timer is currently at.
    pub fn sound(&self) -> u8 {
        self.counters.lock().sound
    }

    /// Will set the value from which the delay timer shall count down from.
    pub fn set_delay(&self, value: u8) {
        self.counters.lock().delay = value;
    }

    /// Will set the value from which the sound timer shall count down from.
    pub fn set_sound(&self, value: u8) {
        self.counters.lock().sound = value;
    }

    /// Decrements both timers by one, a timer at zero stays at zero.
    ///
    /// Returns if the sound timer is still running after the tick.
    pub fn tick(&self) -> bool {
        let mut counters = self.counters.lock();
        counters.delay = counters.delay.saturating_sub(1);
        counters.sound = counters.sound.saturating_sub(1);
        counters.sound > 0
    }

    /// Sets both timers to zero.
    pub fn reset(&self) {
        *self.counters.lock() = Counters::default();
    }
}

/// Is the worker used to drive a callback periodically.
pub trait TimedWorker {
    /// Will initialize the new worker.
    fn new() -> Self;

    /// Will start the worker that will run the callback function
    /// every interval.
    fn start<T>(&mut self, callback: T, interval: Duration)
    where
        T: Send + FnMut() + 'static;

    /// Will stop the worker.
    fn stop(&mut self);

    /// Checks if the worker is running.
    fn is_alive(&self) -> bool;
}

/// Is the internal worker, that exists on the
/// second thread.
#[derive(Debug)]
pub struct Worker {
    /// Contains the actuall thread, that is running.
    thread: Option<JoinHandle<()>>,
    /// Contains the sync sender used to gracefull shutdown the thread.
    shutdown: Option<SyncSender<()>>,
    /// Counts the threads holding onto it. It uses an `()` so that it doesn't use
    /// up too much memory.
    alive: Arc<()>,
}

impl TimedWorker for Worker {
    fn new() -> Self {
        Self {
            thread: None,
            shutdown: None,
            alive: Arc::new(()),
        }
    }

    /// Attention the worker assumes the callback will finish
    /// faster then the interval.
    fn start<T>(&mut self, mut callback: T, interval: Duration)
    where
        T: Send + FnMut() + 'static,
    {
        // a running worker gets replaced
        self.stop();

        let (send, recv) = mpsc::sync_channel::<()>(1);
        let alive = self.alive.clone();
        let thread = thread::spawn(move || {
            let _alive = alive;
            let mut timeout = interval;
            loop {
                match recv.recv_timeout(timeout) {
                    Err(RecvTimeoutError::Timeout) => {
                        let start = Instant::now();

                        callback();

                        // make sure the system will at most wait the interval
                        timeout = interval.saturating_sub(start.elapsed());
                    }
                    Ok(_) | Err(_) => break, // shutdown
                }
            }
        });

        self.thread = Some(thread);
        self.shutdown = Some(send);
    }

    fn stop(&mut self) {
        // Will stop the worker, in two steps one by sending an empty message
        // and second by droping the only sender for the given receiver.
        if let Some(sender) = self.shutdown.take() {
            // the thread might already be gone
            let _ = sender.try_send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("The worker thread panicked.");
            }
        }
    }

    fn is_alive(&self) -> bool {
        Arc::strong_count(&self.alive) > 1
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Counts the timers down once per tick and reports the edges of the sound timer.
struct SoundEdge<S: TimerCallback> {
    timers: TimerBank,
    callback: S,
    active: bool,
}

impl<S: TimerCallback> SoundEdge<S> {
    fn new(timers: TimerBank, callback: S) -> Self {
        Self {
            timers,
            callback,
            active: false,
        }
    }

    fn tick(&mut self) {
        // a value written since the last tick counts as switched on
        if !self.active && self.timers.sound() > 0 {
            self.callback.sound_changed(true);
            self.active = true;
        }

        let active = self.timers.tick();
        if self.active && !active {
            self.callback.sound_changed(false);
        }
        self.active = active;
    }
}

/// Drives a [`TimerBank`](TimerBank) at 60 hertz.
pub struct TimerTicker<W: TimedWorker = Worker> {
    worker: W,
}

impl<W: TimedWorker> TimerTicker<W> {
    /// Will start counting down the timers, the callback is informed about the sound state.
    pub fn start<S>(timers: TimerBank, callback: S) -> Self
    where
        S: TimerCallback + Send + 'static,
    {
        let mut edge = SoundEdge::new(timers, callback);
        let mut worker = W::new();
        worker.start(
            move || edge.tick(),
            Duration::from_millis(timer::INTERVAL),
        );
        Self { worker }
    }

    pub fn stop(&mut self) {
        self.worker.stop();
    }

    pub fn is_alive(&self) -> bool {
        self.worker.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mockall::{predicate::eq, Sequence};

    use super::*;

    #[test]
    fn test_bank_tick_saturates() {
        let timers = TimerBank::new();
        timers.set_delay(2);
        timers.set_sound(1);

        assert!(!timers.tick());
        assert_eq!((timers.delay(), timers.sound()), (1, 0));

        assert!(!timers.tick());
        assert!(!timers.tick());
        assert_eq!((timers.delay(), timers.sound()), (0, 0));
    }

    #[test]
    fn test_bank_shared_and_reset() {
        let timers = TimerBank::new();
        let other = timers.clone();
        other.set_delay(0x42);
        other.set_sound(0x24);
        assert_eq!(timers.delay(), 0x42);
        assert_eq!(timers.sound(), 0x24);

        timers.reset();
        assert_eq!(other.delay(), 0);
        assert_eq!(other.sound(), 0);
    }

    #[test]
    fn test_worker() {
        let counter = Arc::new(AtomicUsize::new(0));
        let ccounter = counter.clone();

        let mut worker = Worker::new();
        assert!(!worker.is_alive());

        worker.start(
            move || {
                ccounter.fetch_add(1, Ordering::SeqCst);
            },
            Duration::from_millis(5),
        );
        assert!(worker.is_alive());

        std::thread::sleep(Duration::from_millis(100));
        worker.stop();
        assert!(!worker.is_alive());

        let count = counter.load(Ordering::SeqCst);
        assert!(count > 0);

        // no more calls after stopping
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(count, counter.load(Ordering::SeqCst));
    }

    #[test]
    fn test_sound_edges() {
        let timers = TimerBank::new();
        let mut callback = MockTimerCallback::new();
        let mut seq = Sequence::new();
        callback
            .expect_sound_changed()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        callback
            .expect_sound_changed()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut edge = SoundEdge::new(timers.clone(), callback);
        // nothing to report
        edge.tick();

        timers.set_sound(3);
        edge.tick();
        edge.tick();
        assert_eq!(timers.sound(), 1);
        edge.tick();
        assert_eq!(timers.sound(), 0);
        edge.tick();
    }

    #[test]
    fn test_sound_single_tick() {
        let timers = TimerBank::new();
        let mut callback = MockTimerCallback::new();
        let mut seq = Sequence::new();
        callback
            .expect_sound_changed()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        callback
            .expect_sound_changed()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut edge = SoundEdge::new(timers.clone(), callback);
        timers.set_sound(1);
        edge.tick();
        edge.tick();
    }

    #[test]
    fn test_ticker() {
        let timers = TimerBank::new();
        timers.set_delay(timer::HERZ / 10);
        timers.set_sound(timer::HERZ / 10);

        let mut ticker: TimerTicker = TimerTicker::start(timers.clone(), NoCallback);
        assert!(ticker.is_alive());

        std::thread::sleep(Duration::from_millis(500));
        assert_eq!(timers.delay(), 0);
        assert_eq!(timers.sound(), 0);

        ticker.stop();
        assert!(!ticker.is_alive());
    }
}
