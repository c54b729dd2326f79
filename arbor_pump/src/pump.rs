// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame pump loop and its configuration.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll, Waker};

use crate::{Sleep, Timers, Updatable};

/// Configuration for an [`UpdateLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PumpConfig {
    /// Logical step passed to every update and timer advance, in milliseconds.
    pub step_ms: i32,
    /// How long the loop yields between ticks, in milliseconds.
    pub idle_sleep_ms: u32,
}

impl PumpConfig {
    /// A 10 ms step with a 1 ms yield. Suited to tests and scripted sequences.
    #[must_use]
    pub const fn coarse() -> Self {
        Self {
            step_ms: 10,
            idle_sleep_ms: 1,
        }
    }

    /// A 16 ms step paced at roughly 60 ticks per second.
    #[must_use]
    pub const fn fixed_60hz() -> Self {
        Self {
            step_ms: 16,
            idle_sleep_ms: 16,
        }
    }
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self::coarse()
    }
}

/// Shared cancellation flag for an [`UpdateLoop`].
///
/// Cancelling is idempotent. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    /// Creates an uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// A [`Sleep`] that returns immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSleep;

impl Sleep for NoSleep {
    fn sleep(&mut self, _ms: u32) {}
}

/// A [`Sleep`] that parks the current thread.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug, Default)]
pub struct StdSleep;

#[cfg(feature = "std")]
impl Sleep for StdSleep {
    fn sleep(&mut self, ms: u32) {
        if ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
        }
    }
}

/// Single-threaded cooperative frame pump.
///
/// See the [crate docs](crate) for the tick structure.
#[derive(Debug)]
pub struct UpdateLoop<S: Sleep> {
    config: PumpConfig,
    sleeper: S,
    cancel: CancelToken,
    ticks: u64,
}

impl<S: Sleep> UpdateLoop<S> {
    /// Creates a pump with the given configuration and sleep primitive.
    pub fn new(config: PumpConfig, sleeper: S) -> Self {
        Self {
            config,
            sleeper,
            cancel: CancelToken::new(),
            ticks: 0,
        }
    }

    /// The pump's configuration.
    pub fn config(&self) -> PumpConfig {
        self.config
    }

    /// A handle that stops the pump at the start of its next iteration.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Total ticks pumped over the lifetime of this loop.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Pumps `target` and `timers` until `task` completes.
    ///
    /// Each iteration polls `task` once; if it is ready the loop ends and its
    /// output is returned. Otherwise the loop checks for cancellation, then
    /// updates `target`, steps `timers` and sleeps, all with the configured
    /// step.
    ///
    /// `target` is borrowed mutably only for the duration of each update, so
    /// `task` may hold a shared reference to the same cell and borrow it
    /// between awaits.
    ///
    /// Returns `None` if the loop was cancelled before `task` completed. A
    /// panic inside an update or inside `task` unwinds out of this call.
    pub fn run_until<U, T, F>(&mut self, target: &RefCell<U>, timers: &mut T, task: F) -> Option<F::Output>
    where
        U: Updatable + ?Sized,
        T: Timers + ?Sized,
        F: Future,
    {
        let mut task = pin!(task);
        let mut cx = Context::from_waker(Waker::noop());
        let step = self.config.step_ms;
        let start = self.ticks;
        loop {
            if let Poll::Ready(out) = task.as_mut().poll(&mut cx) {
                log::debug!("pump task finished after {} ticks", self.ticks - start);
                return Some(out);
            }
            if self.cancel.is_cancelled() {
                log::warn!("pump cancelled after {} ticks", self.ticks - start);
                return None;
            }
            match target.try_borrow_mut() {
                Ok(mut target) => target.update(step),
                Err(_) => log::warn!("pump target is still borrowed by the task; update skipped"),
            }
            timers.step(step);
            self.ticks += 1;
            log::trace!("pump tick {} (step {step} ms)", self.ticks);
            self.sleeper.sleep(self.config.idle_sleep_ms);
        }
    }
}
