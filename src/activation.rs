//! Menu activation: the open-hand unlock hold and the idle relock cycle.
//!
//! While locked, every other part of the overlay is inert; a sustained
//! open hand unlocks it. While unlocked, losing the hand for the idle
//! tolerance starts the relock ring, and completing that dwell locks the
//! menu again instead of firing anything.

use tracing::info;

use crate::config::TimingConfig;
use crate::dwell::DwellTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationEvent {
    Unlocked,
    Locked,
}

#[derive(Debug, Clone)]
pub struct ActivationState {
    pub menu_unlocked: bool,
    /// No-hand idle stage preceding the relock ring.
    idle_start: Option<f64>,
    /// The visible relock ring.
    pub relock: DwellTimer,
    /// Sustained open-hand unlock hold.
    pub unlock: DwellTimer,
}

impl ActivationState {
    pub fn new() -> Self {
        Self {
            menu_unlocked: false,
            idle_start: None,
            relock: DwellTimer::new(),
            unlock: DwellTimer::new(),
        }
    }

    /// One frame of the activation cycle.
    pub fn update(
        &mut self,
        hand_detected: bool,
        open_hand: bool,
        now_ms: f64,
        timing: &TimingConfig,
    ) -> Option<ActivationEvent> {
        if !self.menu_unlocked {
            self.idle_start = None;
            self.relock.reset();
            if self.unlock.evaluate(open_hand, false, now_ms, timing.unlock_hold_ms) {
                self.menu_unlocked = true;
                self.unlock.reset();
                info!("menu unlocked by open-hand hold");
                return Some(ActivationEvent::Unlocked);
            }
            return None;
        }

        self.unlock.reset();

        if hand_detected {
            // Any detected hand breaks the idle condition and with it the
            // relock ring.
            self.idle_start = None;
            self.relock.reset();
            return None;
        }

        let idle_start = *self.idle_start.get_or_insert(now_ms);
        if now_ms - idle_start < timing.idle_before_dwell_ms {
            return None;
        }

        if self.relock.evaluate(true, false, now_ms, timing.dwell_ms) {
            self.menu_unlocked = false;
            self.idle_start = None;
            self.relock.reset();
            info!("menu re-locked after idle dwell");
            return Some(ActivationEvent::Locked);
        }
        None
    }

    /// Progress of whichever activation ring is currently showing.
    pub fn ring_progress(&self) -> Option<f64> {
        if !self.menu_unlocked && self.unlock.in_progress() {
            return Some(self.unlock.progress);
        }
        if self.menu_unlocked && self.relock.in_progress() {
            return Some(self.relock.progress);
        }
        None
    }
}

impl Default for ActivationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> TimingConfig {
        TimingConfig::default()
    }

    #[test]
    fn test_sustained_open_hand_unlocks() {
        let mut state = ActivationState::new();
        let t = timing();

        assert!(state.update(true, true, 0.0, &t).is_none()); // arming frame
        assert!(state.update(true, true, 1000.0, &t).is_none());
        assert!(!state.menu_unlocked);
        assert!(state.ring_progress().is_some());

        let event = state.update(true, true, 3000.0, &t);
        assert_eq!(event, Some(ActivationEvent::Unlocked));
        assert!(state.menu_unlocked);
    }

    #[test]
    fn test_broken_open_hand_restarts_unlock() {
        let mut state = ActivationState::new();
        let t = timing();

        state.update(true, true, 0.0, &t);
        state.update(true, true, 2000.0, &t);
        // The hand closes briefly: hold resets.
        state.update(true, false, 2100.0, &t);
        assert_eq!(state.unlock.progress, 0.0);

        state.update(true, true, 2200.0, &t);
        assert!(state.update(true, true, 4000.0, &t).is_none());
        assert_eq!(state.update(true, true, 5200.0, &t), Some(ActivationEvent::Unlocked));
    }

    #[test]
    fn test_idle_then_relock() {
        let mut state = ActivationState::new();
        state.menu_unlocked = true;
        let t = timing();

        // Idle stage: no ring yet.
        assert!(state.update(false, false, 0.0, &t).is_none());
        assert!(state.update(false, false, 4999.0, &t).is_none());
        assert!(state.ring_progress().is_none());

        // Ring arms, then fills over the dwell duration.
        assert!(state.update(false, false, 5000.0, &t).is_none());
        assert!(state.update(false, false, 6500.0, &t).is_none());
        assert!(state.ring_progress().is_some());

        let event = state.update(false, false, 9500.0, &t);
        assert_eq!(event, Some(ActivationEvent::Locked));
        assert!(!state.menu_unlocked);
    }

    #[test]
    fn test_hand_reappearing_resets_relock_cycle() {
        let mut state = ActivationState::new();
        state.menu_unlocked = true;
        let t = timing();

        state.update(false, false, 0.0, &t);
        state.update(false, false, 5000.0, &t);
        state.update(false, false, 6500.0, &t);
        assert!(state.relock.in_progress());

        // A hand shows up: both stages reset, menu stays unlocked.
        state.update(true, false, 6600.0, &t);
        assert!(!state.relock.running());
        assert!(state.menu_unlocked);

        // Losing the hand again starts the idle tolerance from scratch.
        assert!(state.update(false, false, 6700.0, &t).is_none());
        assert!(state.update(false, false, 11000.0, &t).is_none());
        assert!(state.ring_progress().is_none());
    }

    #[test]
    fn test_locked_menu_ignores_idle_cycle() {
        let mut state = ActivationState::new();
        let t = timing();
        // Long no-hand stretches while locked never produce events.
        for step in 0..20 {
            assert!(state.update(false, false, step as f64 * 1000.0, &t).is_none());
        }
        assert!(!state.menu_unlocked);
    }
}
