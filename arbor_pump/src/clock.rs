// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A manually advanced clock with awaitable delays.

use alloc::rc::Rc;
use core::cell::Cell;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use crate::Timers;

/// A clock that only moves when it is stepped.
///
/// Clones share the same time. The pump steps the clock once per tick, so
/// scripted tasks awaiting a [`Delay`] observe simulated time rather than wall
/// time.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    now_ms: Rc<Cell<i64>>,
}

impl FrameClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in milliseconds since creation.
    #[must_use]
    pub fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }

    /// Moves the clock forward. Negative steps are ignored.
    pub fn advance(&self, dt_ms: i32) {
        if dt_ms > 0 {
            self.now_ms.set(self.now_ms.get() + i64::from(dt_ms));
        }
    }

    /// Returns a future that completes once the clock has advanced `ms`
    /// milliseconds past the current time.
    ///
    /// The deadline is fixed at call time, not at first poll.
    #[must_use]
    pub fn delay(&self, ms: u32) -> Delay {
        Delay {
            clock: self.clone(),
            deadline: self.now_ms() + i64::from(ms),
        }
    }
}

impl Timers for FrameClock {
    fn step(&mut self, dt_ms: i32) {
        self.advance(dt_ms);
    }
}

/// Future returned by [`FrameClock::delay`].
///
/// It registers no waker: it is meant to be re-polled by the pump every tick.
#[derive(Debug)]
#[must_use = "futures do nothing unless awaited"]
pub struct Delay {
    clock: FrameClock,
    deadline: i64,
}

impl Delay {
    /// Time at which the delay completes.
    #[must_use]
    pub fn deadline_ms(&self) -> i64 {
        self.deadline
    }
}

impl Future for Delay {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.clock.now_ms() >= self.deadline {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}
