//! Fixed-rate frame clock for the simulation thread.
//!
//! The clock is synchronous: [`FrameClock::wait`] sleeps the calling thread
//! until the next frame is due. It never runs inside the tokio runtime, so
//! the tick loop stays on its own thread while network I/O runs on the
//! runtime's workers.
//!
//! Missed frames are skipped, not replayed. If a frame fires late by more
//! than a tenth of its budget it is reported as an overrun and the next
//! deadline is scheduled from now, so one slow frame never turns into a
//! burst of catch-up frames.

use std::time::{Duration, Instant};

use crate::ClientConfig;

/// One frame handed out by [`FrameClock::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Fixed frame duration (`1 / tick_rate_hz`).
    pub dt: Duration,
    /// Whether this frame fired late.
    pub overrun: bool,
    /// Frames dropped before this one because of the overrun.
    pub skipped: u64,
}

#[derive(Debug)]
pub struct FrameClock {
    budget: Duration,
    frame: u64,
    next: Instant,
    frame_start: Option<Instant>,
}

impl FrameClock {
    /// A clock firing `tick_rate_hz` times per second. The rate is clamped
    /// to `1..=ClientConfig::MAX_TICK_RATE_HZ`.
    pub fn new(tick_rate_hz: u32) -> Self {
        let tick_rate_hz = tick_rate_hz.clamp(1, ClientConfig::MAX_TICK_RATE_HZ);
        let budget = Duration::from_secs_f64(1.0 / f64::from(tick_rate_hz));
        tracing::debug!(
            rate_hz = tick_rate_hz,
            budget_ms = budget.as_secs_f64() * 1000.0,
            "frame clock created"
        );
        Self {
            budget,
            frame: 0,
            next: Instant::now() + budget,
            frame_start: None,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Frames handed out so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Blocks until the next frame is due and returns it.
    pub fn wait(&mut self) -> FrameTick {
        let now = Instant::now();
        if let Some(remaining) = self.next.checked_duration_since(now) {
            std::thread::sleep(remaining);
        }

        let now = Instant::now();
        let late_by = now.saturating_duration_since(self.next);
        let overrun = late_by > self.budget / 10;
        let mut skipped = 0;

        self.frame += 1;
        self.frame_start = Some(now);

        if overrun {
            skipped = late_by
                .as_nanos()
                .checked_div(self.budget.as_nanos())
                .map_or(0, |n| n as u64);
            if skipped > 0 {
                tracing::warn!(
                    frame = self.frame,
                    skipped,
                    late_ms = late_by.as_secs_f64() * 1000.0,
                    "frame overrun, skipping ahead"
                );
            }
            self.next = now + self.budget;
        } else {
            self.next += self.budget;
        }

        tracing::trace!(frame = self.frame, overrun, "frame");
        FrameTick {
            frame: self.frame,
            dt: self.budget,
            overrun,
            skipped,
        }
    }

    /// Records that the work for the current frame is done and warns if it
    /// took longer than the frame budget. Returns the time the frame took.
    pub fn end_frame(&mut self) -> Option<Duration> {
        let elapsed = self.frame_start.take()?.elapsed();
        if elapsed >= self.budget {
            tracing::warn!(
                frame = self.frame,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                budget_ms = self.budget.as_secs_f64() * 1000.0,
                "frame exceeded budget"
            );
        }
        Some(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_from_rate() {
        assert_eq!(FrameClock::new(50).budget(), Duration::from_millis(20));
        assert_eq!(FrameClock::new(0).budget(), Duration::from_secs(1));
    }

    #[test]
    fn test_rate_is_clamped_to_maximum() {
        let clock = FrameClock::new(u32::MAX);
        assert_eq!(
            clock.budget(),
            FrameClock::new(ClientConfig::MAX_TICK_RATE_HZ).budget()
        );
        assert!(clock.budget() > Duration::ZERO);
    }

    #[test]
    fn test_huge_rate_after_stall_does_not_panic() {
        let mut clock = FrameClock::new(u32::MAX);
        std::thread::sleep(Duration::from_millis(20));
        let tick = clock.wait();
        assert!(tick.overrun);
        assert!(tick.skipped >= 1);
    }

    #[test]
    fn test_frames_are_numbered_from_one() {
        let mut clock = FrameClock::new(200);
        let first = clock.wait();
        let second = clock.wait();
        assert_eq!(first.frame, 1);
        assert_eq!(second.frame, 2);
        assert_eq!(second.dt, Duration::from_millis(5));
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_wait_paces_frames() {
        let mut clock = FrameClock::new(100);
        let start = Instant::now();
        for _ in 0..3 {
            clock.wait();
        }
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn test_slow_frame_is_skipped_not_replayed() {
        let mut clock = FrameClock::new(100);
        clock.wait();
        std::thread::sleep(Duration::from_millis(45));

        let late = clock.wait();
        assert!(late.overrun);
        assert!(late.skipped >= 2);

        let before = Instant::now();
        let next = clock.wait();
        assert!(before.elapsed() >= Duration::from_millis(5));
        assert_eq!(next.frame, late.frame + 1);
    }

    #[test]
    fn test_end_frame_without_wait() {
        let mut clock = FrameClock::new(60);
        assert_eq!(clock.end_frame(), None);
        clock.wait();
        assert!(clock.end_frame().is_some());
        assert_eq!(clock.end_frame(), None);
    }
}
