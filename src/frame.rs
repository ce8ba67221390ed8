use std::time::Instant;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pacing {
    /// Wall-clock deltas
    RealTime { start: Instant, last: Instant },
    /// Constant delta, for headless runs and tests
    Fixed { dt: f32 },
}

/// Infinite iterator that yields frame information
/// Use this in a loop: `for frame in frames { ... }`
#[derive(Debug, Clone)]
pub struct FrameIterator {
    frame_number: u64,
    elapsed: f32,
    pacing: Pacing,
}

impl FrameIterator {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            elapsed: 0.0,
            pacing: Pacing::RealTime { start: now, last: now },
        }
    }

    pub fn fixed(dt: f32) -> Self {
        Self {
            frame_number: 0,
            elapsed: 0.0,
            pacing: Pacing::Fixed { dt },
        }
    }

    /// Start counting again from frame 0 as if created now.
    /// Real-time pacing measures its next delta from this call.
    pub fn restart(&mut self) {
        self.frame_number = 0;
        self.elapsed = 0.0;
        if let Pacing::RealTime { start, last } = &mut self.pacing {
            let now = Instant::now();
            *start = now;
            *last = now;
        }
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let delta = match &mut self.pacing {
            Pacing::RealTime { start, last } => {
                let now = Instant::now();
                let delta = now.duration_since(*last).as_secs_f32();
                *last = now;
                self.elapsed = now.duration_since(*start).as_secs_f32();
                delta
            }
            Pacing::Fixed { dt } => {
                self.elapsed += *dt;
                *dt
            }
        };

        let info = FrameInfo::new(self.frame_number, self.elapsed, delta);
        self.frame_number += 1;

        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_frames_step_evenly() {
        let frames: Vec<_> = FrameIterator::fixed(0.5).take(3).collect();
        assert_eq!(frames[0], FrameInfo::new(0, 0.5, 0.5));
        assert_eq!(frames[2], FrameInfo::new(2, 1.5, 0.5));
    }

    #[test]
    fn real_time_frames_count_up() {
        let mut frames = FrameIterator::new();
        let a = frames.next().unwrap();
        let b = frames.next().unwrap();
        assert_eq!((a.number, b.number), (0, 1));
        assert!(b.delta >= 0.0);
        assert!(b.time >= a.time);
    }

    #[test]
    fn restart_forgets_time_spent_before_it() {
        let mut frames = FrameIterator::new();
        frames.next();
        std::thread::sleep(std::time::Duration::from_millis(60));

        frames.restart();
        let first = frames.next().unwrap();
        assert_eq!(first.number, 0);
        assert!(first.delta < 0.05, "delta {} includes the wait", first.delta);
        assert!(first.time < 0.05);
    }

    #[test]
    fn restart_keeps_fixed_step() {
        let mut frames = FrameIterator::fixed(0.25);
        frames.by_ref().take(4).for_each(drop);
        frames.restart();
        assert_eq!(frames.next(), Some(FrameInfo::new(0, 0.25, 0.25)));
    }
}
