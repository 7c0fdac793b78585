//! The shared dwell timer: hover for a duration, then fire.
//!
//! One primitive serves every dwell in the system — the per-level hover
//! fill, the open-hand unlock hold, and the idle relock ring — each call
//! site supplying its own duration and bypass predicate.

/// Wall-clock dwell accumulator.
///
/// Lifecycle: unset → started (first qualifying frame, progress stays 0) →
/// progressing (linear elapsed/duration) → complete (progress == 1). The
/// timer resets the instant its holding condition breaks; completion is
/// latched by the caller's own `triggered` flag, not here.
#[derive(Debug, Clone, Default)]
pub struct DwellTimer {
    start: Option<f64>,
    pub progress: f64,
}

impl DwellTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the timer one frame.
    ///
    /// * `condition_holds` — the hover/hold condition; false resets the
    ///   timer and returns false.
    /// * `bypass` — override predicate (grab gesture, or the caller's
    ///   already-triggered latch). Forces progress to 1 once the timer has
    ///   started; the first qualifying frame still only arms the timer.
    ///
    /// Returns true while progress is complete. Callers that dispatch an
    /// action must pair this with their own triggered flag so the action
    /// fires once, not every frame.
    pub fn evaluate(
        &mut self,
        condition_holds: bool,
        bypass: bool,
        now_ms: f64,
        duration_ms: f64,
    ) -> bool {
        if !condition_holds {
            self.reset();
            return false;
        }

        let start = match self.start {
            Some(s) => s,
            None => {
                self.start = Some(now_ms);
                self.progress = 0.0;
                return false;
            }
        };

        if bypass {
            self.progress = 1.0;
            return true;
        }

        if duration_ms <= 0.0 {
            self.progress = 1.0;
            return true;
        }

        self.progress = ((now_ms - start) / duration_ms).min(1.0);
        self.progress >= 1.0
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.progress = 0.0;
    }

    /// Whether the timer has started accumulating.
    pub fn running(&self) -> bool {
        self.start.is_some()
    }

    /// Whether the fill is visibly underway but not complete.
    pub fn in_progress(&self) -> bool {
        self.progress > 0.0 && self.progress < 1.0
    }
}
