/*
    RetroFB

    Copyright 2025 RetroFB Contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    ---------------------------------------------------------------------------

    frontend_common::frame_scheduler.rs

    Per-frame admission: pause suppression and fast-forward frame dropping.

    The display refreshes at a fixed 60Hz, so frames pushed faster than that while
    fast-forwarding are dropped. Normal playback composites every delivered frame.
*/

use retrofb_common::HistoryBuffer;
use web_time::{Duration, Instant};

pub const DEFAULT_FF_FRAME_TIME_MIN: Duration = Duration::from_micros(16667);
pub const DEFAULT_HISTORY_LEN: usize = 60;

/// Global run state supplied by the host with every frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameFlags {
    pub paused: bool,
    /// Non-blocking playback.
    pub fast_forward: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    Accept,
    Drop,
    Paused,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub accepted: u64,
    pub dropped:  u64,
    pub paused:   u64,
}

pub struct FrameScheduler {
    ff_frame_time_min: Duration,
    last_frame_time: Option<Instant>, // Last frame accepted in fast-forward
    last_accepted: Option<Instant>,
    intervals: HistoryBuffer<Duration>,
    stats: SchedulerStats,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FF_FRAME_TIME_MIN, DEFAULT_HISTORY_LEN)
    }
}

impl FrameScheduler {
    pub fn new(ff_frame_time_min: Duration, history_len: usize) -> Self {
        Self {
            ff_frame_time_min,
            last_frame_time: None,
            last_accepted: None,
            intervals: HistoryBuffer::new(history_len),
            stats: Default::default(),
        }
    }

    pub fn ff_frame_time_min(&self) -> Duration {
        self.ff_frame_time_min
    }

    pub fn set_ff_frame_time_min(&mut self, min: Duration) {
        self.ff_frame_time_min = min;
    }

    /// Decide whether a frame delivered at `now` should be composited.
    pub fn admit(&mut self, now: Instant, flags: FrameFlags) -> Admission {
        if flags.paused {
            self.stats.paused += 1;
            return Admission::Paused;
        }

        if flags.fast_forward {
            if let Some(last) = self.last_frame_time {
                if now.saturating_duration_since(last) < self.ff_frame_time_min {
                    self.stats.dropped += 1;
                    return Admission::Drop;
                }
            }
            self.last_frame_time = Some(now);
        }

        if let Some(last) = self.last_accepted {
            self.intervals.push(now.saturating_duration_since(last));
        }
        self.last_accepted = Some(now);
        self.stats.accepted += 1;
        Admission::Accept
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Intervals between accepted frames, oldest first.
    pub fn frame_history(&self) -> Vec<Duration> {
        self.intervals.to_vec()
    }

    /// Interval between the two most recently accepted frames.
    pub fn last_interval(&self) -> Option<Duration> {
        self.intervals.latest()
    }

    /// Average interval between recently accepted frames.
    pub fn average_interval(&self) -> Option<Duration> {
        if self.intervals.is_empty() {
            return None;
        }
        let total: Duration = self.intervals.iter().sum();
        Some(total / self.intervals.len() as u32)
    }

    pub fn reset(&mut self) {
        self.last_frame_time = None;
        self.last_accepted = None;
        self.intervals.clear();
        self.stats = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FF: FrameFlags = FrameFlags {
        paused: false,
        fast_forward: true,
    };
    const NORMAL: FrameFlags = FrameFlags {
        paused: false,
        fast_forward: false,
    };

    #[test]
    fn test_ff_spacing() {
        let mut sched = FrameScheduler::default();
        let start = Instant::now();
        let min = sched.ff_frame_time_min();

        // Frames arrive every 5ms, well above 60Hz.
        let mut accepted = Vec::new();
        for i in 0..100u64 {
            let t = start + Duration::from_millis(5 * i);
            if sched.admit(t, FF) == Admission::Accept {
                accepted.push(t);
            }
        }

        assert!(accepted.len() > 1);
        for pair in accepted.windows(2) {
            assert!(pair[1] - pair[0] >= min);
        }
        let stats = sched.stats();
        assert_eq!(stats.accepted + stats.dropped, 100);
        assert!(stats.dropped > 0);
    }

    #[test]
    fn test_normal_accepts_everything() {
        let mut sched = FrameScheduler::default();
        let start = Instant::now();
        for i in 0..50u64 {
            let t = start + Duration::from_micros(100 * i);
            assert_eq!(sched.admit(t, NORMAL), Admission::Accept);
        }
        assert_eq!(sched.stats().dropped, 0);
        assert_eq!(sched.stats().accepted, 50);
    }

    #[test]
    fn test_pause() {
        let mut sched = FrameScheduler::default();
        let paused = FrameFlags {
            paused: true,
            fast_forward: true,
        };
        let now = Instant::now();
        assert_eq!(sched.admit(now, paused), Admission::Paused);
        assert_eq!(sched.admit(now, paused), Admission::Paused);
        assert_eq!(sched.stats().paused, 2);
        assert_eq!(sched.stats().accepted, 0);
        // Pausing does not start the fast-forward interval.
        assert_eq!(sched.admit(now, FF), Admission::Accept);
    }

    #[test]
    fn test_history() {
        let mut sched = FrameScheduler::new(DEFAULT_FF_FRAME_TIME_MIN, 4);
        let start = Instant::now();
        for i in 0..10u64 {
            sched.admit(start + Duration::from_millis(10 * i), NORMAL);
        }
        let history = sched.frame_history();
        assert_eq!(history.len(), 4);
        assert!(history.iter().all(|d| *d == Duration::from_millis(10)));
        assert_eq!(sched.average_interval(), Some(Duration::from_millis(10)));
        assert_eq!(sched.last_interval(), Some(Duration::from_millis(10)));

        sched.admit(start + Duration::from_millis(125), NORMAL);
        assert_eq!(sched.last_interval(), Some(Duration::from_millis(35)));

        sched.reset();
        assert!(sched.frame_history().is_empty());
        assert_eq!(sched.average_interval(), None);
        assert_eq!(sched.last_interval(), None);
    }
}
