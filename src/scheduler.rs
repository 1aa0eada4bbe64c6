//! Frame scheduling.
//!
//! One update+render per iteration, until a cancellation token fires. Time
//! comes from a `Clock` so tests can drive the loop without sleeping.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    /// Time since the clock started.
    fn now(&self) -> Duration;
    /// Block (or pretend to) until `deadline`.
    fn wait_until(&self, deadline: Duration);
}

/// Wall clock backed by `Instant`.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn wait_until(&self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

/// Virtual clock; waiting jumps straight to the deadline.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn wait_until(&self, deadline: Duration) {
        if deadline > self.now.get() {
            self.now.set(deadline);
        }
    }
}

/// Shared stop flag for the frame loop.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run `frame` once per `interval` until `token` is cancelled.
///
/// `frame` receives the seconds elapsed since the previous frame started.
/// The token is checked before every iteration; an error from `frame` ends
/// the loop and is returned. Returns the number of frames run.
pub fn run_frames<C, F, E>(
    clock: &C,
    token: &CancelToken,
    interval: Duration,
    mut frame: F,
) -> Result<u64, E>
where
    C: Clock,
    F: FnMut(f64) -> Result<(), E>,
{
    let mut last = clock.now();
    let mut frames = 0;

    while !token.is_cancelled() {
        let frame_start = clock.now();
        let delta_time = (frame_start - last).as_secs_f64();
        last = frame_start;

        frame(delta_time)?;
        frames += 1;

        clock.wait_until(frame_start + interval);
    }

    Ok(frames)
}
