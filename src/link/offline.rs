//! Offline presentation controller.
//!
//! Stands in for the real backend when the transport is absent or has
//! failed: outbound messages are answered through the same inbound queue
//! the live link would fill, and a fixed-rate clock advances the simulated
//! playback position so seeking and play/pause stay testable end to end.

use std::collections::VecDeque;

use tracing::debug;

use super::protocol::{Inbound, Outbound, PresentationAction, SliderTarget};

/// Local stand-in state plus the echo queue.
#[derive(Debug, Clone)]
pub struct OfflineController {
    volume: f64,
    brightness: f64,
    vibration: f64,
    duration_s: f64,
    current_s: f64,
    playing: bool,
    pending: VecDeque<Inbound>,
}

impl OfflineController {
    pub fn new() -> Self {
        Self {
            volume: 0.3,
            brightness: 0.7,
            vibration: 0.1,
            duration_s: 750.0,
            current_s: 0.0,
            playing: false,
            pending: VecDeque::new(),
        }
    }

    /// Queue the connection-time state burst the real backend sends.
    pub fn queue_initial_state(&mut self) {
        self.pending.push_back(Inbound::PresentationState {
            duration: self.duration_s,
            current_time: self.current_s,
            playing: self.playing,
        });
        for (target, value) in [
            (SliderTarget::Volume, self.volume),
            (SliderTarget::Brightness, self.brightness),
            (SliderTarget::Vibration, self.vibration),
        ] {
            self.pending.push_back(Inbound::SliderUpdate { target, value });
        }
    }

    /// Handle an outbound message locally and echo the result back.
    pub fn handle(&mut self, message: &Outbound) {
        match message {
            Outbound::SliderUpdate { target, value } => {
                let value = value.clamp(0.0, 1.0);
                match target {
                    SliderTarget::Volume => self.volume = value,
                    SliderTarget::Brightness => self.brightness = value,
                    SliderTarget::Vibration => self.vibration = value,
                    SliderTarget::Presentation => {
                        self.current_s = value * self.duration_s;
                    }
                }
                self.pending.push_back(Inbound::SliderUpdate {
                    target: *target,
                    value,
                });
            }
            Outbound::PresentationCommand { action } => {
                self.playing = *action == PresentationAction::Play;
                debug!(playing = self.playing, "offline playback command");
                self.push_playback_state();
            }
        }
    }

    /// Advance the simulated playback clock. Runs at ~30 Hz from the
    /// playback timer; a no-op while paused.
    pub fn tick(&mut self, dt_s: f64) {
        if !self.playing {
            return;
        }
        self.current_s += dt_s;
        if self.current_s >= self.duration_s {
            self.current_s = self.duration_s;
            self.playing = false;
        }
        self.push_playback_state();
    }

    fn push_playback_state(&mut self) {
        self.pending.push_back(Inbound::PresentationState {
            duration: self.duration_s,
            current_time: self.current_s,
            playing: self.playing,
        });
    }

    /// Take everything queued since the last frame.
    pub fn drain(&mut self) -> Vec<Inbound> {
        self.pending.drain(..).collect()
    }
}

impl Default for OfflineController {
    fn default() -> Self {
        Self::new()
    }
}
