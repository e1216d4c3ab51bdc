/// Timestamp-delta gating for per-frame work.
///
/// The virtualizer recomputes on every event and never throttles. Consumers that repaint on
/// every animation frame (spectrum panels, visualizers) use a gate so they do not starve the
/// scroll and resize handlers sharing the UI thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameGate {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl FrameGate {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// A gate targeting `fps` frames per second (`0` is treated as `1`).
    pub fn from_fps(fps: u32) -> Self {
        Self::new(1000 / fps.max(1) as u64)
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Returns `true` (and records `now_ms`) when at least one interval has elapsed since the
    /// last accepted frame. The first call always runs.
    pub fn should_run(&mut self, now_ms: u64) -> bool {
        match self.last_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
