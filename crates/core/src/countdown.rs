//! Restartable one-second countdown with a single-fire expiry.
//!
//! The countdown does not own a clock. A driver (tokio interval, UI sleep loop,
//! or a test) calls [`Countdown::tick`] once per elapsed second. Because every
//! transition happens inside `&mut self` methods, a tick and a `stop()` can never
//! interleave: after `stop()` returns, no callback of that run fires again.

use std::fmt;

type TickFn = Box<dyn FnMut(u32) + Send>;
type ExpireFn = Box<dyn FnOnce() + Send>;

/// Observable countdown state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub remaining_seconds: u32,
    pub is_running: bool,
}

/// What a single `start`/`tick` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Nothing is running (stopped, expired, or a stale generation).
    Idle,
    /// A tick with the new remaining value.
    Ticked(u32),
    /// Reached zero; `on_expire` has fired.
    Expired,
}

#[derive(Default)]
pub struct Countdown {
    state: CountdownState,
    generation: u64,
    on_tick: Option<TickFn>,
    on_expire: Option<ExpireFn>,
}

impl Countdown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new run, stopping any previous one first.
    ///
    /// `on_tick` fires immediately with `total_seconds`. A zero-length run
    /// ticks `0` and expires right away.
    pub fn start<T, E>(&mut self, total_seconds: u32, on_tick: T, on_expire: E) -> CountdownTick
    where
        T: FnMut(u32) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        self.stop();
        self.generation = self.generation.wrapping_add(1);
        self.state = CountdownState {
            remaining_seconds: total_seconds,
            is_running: true,
        };
        self.on_tick = Some(Box::new(on_tick));
        self.on_expire = Some(Box::new(on_expire));

        self.emit_tick(total_seconds);
        if total_seconds == 0 {
            self.expire();
            return CountdownTick::Expired;
        }
        CountdownTick::Ticked(total_seconds)
    }

    /// `start` without observers, for drivers that only read return values.
    pub fn start_quiet(&mut self, total_seconds: u32) -> CountdownTick {
        self.start(total_seconds, |_| {}, || {})
    }

    /// Advance by one elapsed second.
    pub fn tick(&mut self) -> CountdownTick {
        if !self.state.is_running {
            return CountdownTick::Idle;
        }

        let remaining = self.state.remaining_seconds.saturating_sub(1);
        self.state.remaining_seconds = remaining;
        self.emit_tick(remaining);

        if remaining == 0 {
            self.expire();
            return CountdownTick::Expired;
        }
        CountdownTick::Ticked(remaining)
    }

    /// Tick only if `generation` is still the current run.
    pub fn tick_generation(&mut self, generation: u64) -> CountdownTick {
        if generation != self.generation {
            return CountdownTick::Idle;
        }
        self.tick()
    }

    /// Cancel the current run. Safe to call any number of times.
    ///
    /// Returns `true` if a run was actually cancelled.
    pub fn stop(&mut self) -> bool {
        let was_running = self.state.is_running;
        self.state.is_running = false;
        self.on_tick = None;
        self.on_expire = None;
        was_running
    }

    #[must_use]
    pub fn state(&self) -> CountdownState {
        self.state
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.state.remaining_seconds
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Identifier of the latest `start`; bumps on every restart.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn emit_tick(&mut self, remaining: u32) {
        if let Some(on_tick) = self.on_tick.as_mut() {
            on_tick(remaining);
        }
    }

    fn expire(&mut self) {
        self.state.is_running = false;
        self.on_tick = None;
        if let Some(on_expire) = self.on_expire.take() {
            on_expire();
        }
    }
}

impl fmt::Debug for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Countdown")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    struct Observer {
        ticks: Arc<Mutex<Vec<u32>>>,
        expired: Arc<AtomicU32>,
    }

    impl Observer {
        fn new() -> Self {
            Self {
                ticks: Arc::new(Mutex::new(Vec::new())),
                expired: Arc::new(AtomicU32::new(0)),
            }
        }

        fn start(&self, countdown: &mut Countdown, secs: u32) -> CountdownTick {
            let ticks = Arc::clone(&self.ticks);
            let expired = Arc::clone(&self.expired);
            countdown.start(
                secs,
                move |s| ticks.lock().unwrap().push(s),
                move || {
                    expired.fetch_add(1, Ordering::SeqCst);
                },
            )
        }

        fn ticks(&self) -> Vec<u32> {
            self.ticks.lock().unwrap().clone()
        }

        fn expired(&self) -> u32 {
            self.expired.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn ticks_strictly_down_to_zero_then_expires_once() {
        let observer = Observer::new();
        let mut countdown = Countdown::new();
        assert_eq!(observer.start(&mut countdown, 3), CountdownTick::Ticked(3));

        assert_eq!(countdown.tick(), CountdownTick::Ticked(2));
        assert_eq!(countdown.tick(), CountdownTick::Ticked(1));
        assert_eq!(observer.expired(), 0);
        assert_eq!(countdown.tick(), CountdownTick::Expired);

        assert_eq!(observer.ticks(), vec![3, 2, 1, 0]);
        assert_eq!(observer.expired(), 1);
        assert!(!countdown.is_running());

        assert_eq!(countdown.tick(), CountdownTick::Idle);
        assert_eq!(observer.ticks(), vec![3, 2, 1, 0]);
        assert_eq!(observer.expired(), 1);
    }

    #[test]
    fn stop_prevents_expiry_and_is_idempotent() {
        let observer = Observer::new();
        let mut countdown = Countdown::new();
        assert!(!countdown.stop());

        observer.start(&mut countdown, 2);
        countdown.tick();
        assert!(countdown.stop());
        assert!(!countdown.stop());

        assert_eq!(countdown.tick(), CountdownTick::Idle);
        assert_eq!(observer.ticks(), vec![2, 1]);
        assert_eq!(observer.expired(), 0);
    }

    #[test]
    fn stop_after_expiry_never_refires() {
        let observer = Observer::new();
        let mut countdown = Countdown::new();
        observer.start(&mut countdown, 1);
        assert_eq!(countdown.tick(), CountdownTick::Expired);
        countdown.stop();
        countdown.stop();
        assert_eq!(observer.expired(), 1);
    }

    #[test]
    fn restart_cancels_previous_run() {
        let first = Observer::new();
        let second = Observer::new();
        let mut countdown = Countdown::new();

        first.start(&mut countdown, 5);
        let stale = countdown.generation();
        countdown.tick();
        second.start(&mut countdown, 2);

        assert_eq!(countdown.tick_generation(stale), CountdownTick::Idle);
        assert_eq!(countdown.tick(), CountdownTick::Ticked(1));
        assert_eq!(countdown.tick(), CountdownTick::Expired);

        assert_eq!(first.ticks(), vec![5, 4]);
        assert_eq!(first.expired(), 0);
        assert_eq!(second.ticks(), vec![2, 1, 0]);
        assert_eq!(second.expired(), 1);
    }

    #[test]
    fn zero_length_run_expires_immediately() {
        let observer = Observer::new();
        let mut countdown = Countdown::new();
        assert_eq!(observer.start(&mut countdown, 0), CountdownTick::Expired);
        assert_eq!(observer.ticks(), vec![0]);
        assert_eq!(observer.expired(), 1);
    }

    #[test]
    fn quiet_start_tracks_state() {
        let mut countdown = Countdown::new();
        countdown.start_quiet(20);
        countdown.tick();
        assert_eq!(
            countdown.state(),
            CountdownState {
                remaining_seconds: 19,
                is_running: true
            }
        );
    }
}
