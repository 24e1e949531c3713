/*
 * SPDX-FileCopyrightText: 2025 The webrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::time::{Duration, Instant};

/// A stopwatch accumulating elapsed time over many start/stop pairs.
///
/// Starting a running stopwatch, or stopping a stopped one, does nothing, so
/// that timing code can be sprinkled around without bookkeeping.
///
/// ```
/// use webrank_algo::utils::Stopwatch;
///
/// let mut sw = Stopwatch::new();
/// sw.start();
/// sw.start(); // no-op
/// sw.stop();
/// let first = sw.elapsed();
/// sw.stop(); // no-op
/// assert_eq!(sw.elapsed(), first);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    started: Option<Instant>,
    elapsed: Duration,
}

impl Stopwatch {
    /// Creates a stopped stopwatch with no elapsed time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the stopwatch, unless it is already running.
    #[inline]
    pub fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    /// Stops the stopwatch, unless it is already stopped, adding the time
    /// since the last start to the elapsed time.
    #[inline]
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed += started.elapsed();
        }
    }

    /// Stops the stopwatch and clears the elapsed time.
    pub fn reset(&mut self) {
        self.started = None;
        self.elapsed = Duration::ZERO;
    }

    /// Returns whether the stopwatch is running.
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Returns the elapsed time, including the current run if the stopwatch
    /// is running.
    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(started) => self.elapsed + started.elapsed(),
            None => self.elapsed,
        }
    }
}
