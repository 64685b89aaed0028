//! Frame timing supplied by the host loop.
//!
//! Timestamps are milliseconds on the host's monotonic clock. The controller
//! never reads a clock itself; it only sees [`FrameTime`] values, which keeps
//! replay and tests deterministic.

use tracing::warn;

use crate::config::Hardening;

/// Host timestamp and elapsed time for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    pub now_ms: f64,
    pub delta_ms: f64,
}

impl FrameTime {
    pub const fn new(now_ms: f64, delta_ms: f64) -> Self {
        Self { now_ms, delta_ms }
    }

    /// Frame delta in seconds.
    pub fn delta_secs(&self) -> f32 {
        (self.delta_ms / 1000.0) as f32
    }
}

/// Elapsed milliseconds from `then` to `now`, floored at zero when
/// `clamp_negative` is set.
pub fn elapsed_ms(now: f64, then: f64, clamp_negative: bool) -> f64 {
    let elapsed = now - then;
    if clamp_negative {
        elapsed.max(0.0)
    } else {
        elapsed
    }
}

/// Applies [`Hardening`] to raw host frame times.
///
/// With hardening off this is the identity.
#[derive(Debug, Clone, Default)]
pub struct FrameGuard {
    last_now_ms: Option<f64>,
}

impl FrameGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the frame the controller should use.
    pub fn sanitize(&mut self, frame: FrameTime, hardening: &Hardening) -> FrameTime {
        let mut out = frame;

        // A cap that is not a positive finite number means no cap.
        let cap = hardening
            .max_frame_delta_ms
            .filter(|cap| cap.is_finite() && *cap > 0.0);
        if let Some(cap) = cap {
            let clamped = out.delta_ms.min(cap).max(0.0);
            if clamped != out.delta_ms {
                warn!(
                    delta_ms = out.delta_ms,
                    clamped_ms = clamped,
                    "frame_delta_clamped"
                );
                out.delta_ms = clamped;
            }
        }

        if hardening.clamp_negative_elapsed {
            if let Some(last) = self.last_now_ms {
                if out.now_ms < last {
                    warn!(now_ms = out.now_ms, last_ms = last, "clock_went_backwards");
                    out.now_ms = last;
                }
            }
            if out.delta_ms < 0.0 {
                out.delta_ms = 0.0;
            }
        }

        self.last_now_ms = Some(match self.last_now_ms {
            Some(last) if hardening.clamp_negative_elapsed => last.max(out.now_ms),
            _ => out.now_ms,
        });
        out
    }

    /// Forgets the last seen timestamp, e.g. after a respawn or clock reset.
    pub fn reset(&mut self) {
        self.last_now_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_without_hardening() {
        let mut guard = FrameGuard::new();
        let off = Hardening::default();
        let a = guard.sanitize(FrameTime::new(1000.0, 16.0), &off);
        let b = guard.sanitize(FrameTime::new(900.0, 2000.0), &off);
        assert_eq!(a, FrameTime::new(1000.0, 16.0));
        assert_eq!(b, FrameTime::new(900.0, 2000.0));
    }

    #[test]
    fn caps_oversized_delta() {
        let mut guard = FrameGuard::new();
        let hardening = Hardening {
            max_frame_delta_ms: Some(50.0),
            clamp_negative_elapsed: false,
        };
        let frame = guard.sanitize(FrameTime::new(5000.0, 1200.0), &hardening);
        assert_eq!(frame.delta_ms, 50.0);
        assert_eq!(frame.now_ms, 5000.0);
    }

    #[test]
    fn invalid_cap_is_ignored() {
        let mut guard = FrameGuard::new();
        for cap in [-5.0, 0.0, f64::NAN, f64::INFINITY] {
            let hardening = Hardening {
                max_frame_delta_ms: Some(cap),
                clamp_negative_elapsed: false,
            };
            let frame = guard.sanitize(FrameTime::new(100.0, 40.0), &hardening);
            assert_eq!(frame.delta_ms, 40.0, "cap {cap}");
        }
    }

    #[test]
    fn holds_time_when_clock_runs_backwards() {
        let mut guard = FrameGuard::new();
        let hardening = Hardening::strict(100.0);
        guard.sanitize(FrameTime::new(1000.0, 16.0), &hardening);
        let frame = guard.sanitize(FrameTime::new(980.0, -20.0), &hardening);
        assert_eq!(frame.now_ms, 1000.0);
        assert_eq!(frame.delta_ms, 0.0);

        let frame = guard.sanitize(FrameTime::new(1016.0, 16.0), &hardening);
        assert_eq!(frame.now_ms, 1016.0);
    }

    #[test]
    fn elapsed_floors_only_when_asked() {
        assert_eq!(elapsed_ms(10.0, 30.0, false), -20.0);
        assert_eq!(elapsed_ms(10.0, 30.0, true), 0.0);
        assert_eq!(elapsed_ms(30.0, 10.0, true), 20.0);
    }

    #[test]
    fn delta_secs_converts_ms() {
        assert!((FrameTime::new(0.0, 16.0).delta_secs() - 0.016).abs() < 1e-6);
    }
}
