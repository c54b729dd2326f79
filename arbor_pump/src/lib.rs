// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Pump: a single-threaded cooperative frame pump.
//!
//! ## Overview
//!
//! A frame pump drives a scene forward in logical ticks. Each tick it
//! 1) updates the target (usually a scene) with the step,
//! 2) advances the timer substrate by the same step, and
//! 3) yields briefly through an injectable [`Sleep`] primitive.
//!
//! A second cooperative task, a plain [`Future`](core::future::Future), runs alongside the
//! pump. It is polled once per tick and may await simulated time through a
//! [`FrameClock`]. The pump stops as soon as that task completes, or when its
//! [`CancelToken`] is cancelled.
//!
//! The pump does not spawn threads and needs no async runtime. Tasks are
//! polled with a no-op waker, so any future that only depends on pumped state
//! works.
//!
//! ## Seams
//!
//! - [`Updatable`]: whatever receives `update(dt_ms)` each tick.
//! - [`Timers`]: the timer substrate advanced after each update.
//! - [`Sleep`]: how the loop yields. [`StdSleep`] parks the thread; [`NoSleep`]
//!   runs the loop flat out (tests, headless batch runs).
//!
//! ## Minimal usage
//!
//! ```
//! use core::cell::RefCell;
//! use arbor_pump::{FrameClock, NoSleep, PumpConfig, UpdateLoop, Updatable};
//!
//! #[derive(Default)]
//! struct Counter {
//!     elapsed: i64,
//! }
//!
//! impl Updatable for Counter {
//!     fn update(&mut self, dt_ms: i32) {
//!         self.elapsed += i64::from(dt_ms);
//!     }
//! }
//!
//! let counter = RefCell::new(Counter::default());
//! let mut clock = FrameClock::new();
//! let delay = clock.delay(100);
//!
//! let mut pump = UpdateLoop::new(PumpConfig::default(), NoSleep);
//! let out = pump.run_until(&counter, &mut clock, async move {
//!     delay.await;
//!     "done"
//! });
//!
//! assert_eq!(out, Some("done"));
//! assert_eq!(counter.borrow().elapsed, 100);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod clock;
mod pump;

pub use clock::{Delay, FrameClock};
pub use pump::{CancelToken, NoSleep, PumpConfig, UpdateLoop};
#[cfg(feature = "std")]
pub use pump::StdSleep;

/// Something driven forward by the pump once per tick.
pub trait Updatable {
    /// Advances by `dt_ms` milliseconds.
    fn update(&mut self, dt_ms: i32);
}

/// A timer substrate advanced in lockstep with the update target.
pub trait Timers {
    /// Advances all timers by `dt_ms` milliseconds.
    fn step(&mut self, dt_ms: i32);
}

/// The suspension primitive the pump uses between ticks.
pub trait Sleep {
    /// Yields for roughly `ms` milliseconds.
    fn sleep(&mut self, ms: u32);
}

impl<T: Updatable + ?Sized> Updatable for &mut T {
    fn update(&mut self, dt_ms: i32) {
        (**self).update(dt_ms);
    }
}

impl<T: Timers + ?Sized> Timers for &mut T {
    fn step(&mut self, dt_ms: i32) {
        (**self).step(dt_ms);
    }
}
