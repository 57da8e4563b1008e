//! Long-press recognition on the map.
//!
//! ```text
//! Idle --down--> Pending --up before threshold--> Idle (discarded)
//!                Pending --threshold reached-----> Idle + LongPressTriggered
//! ```
//!
//! The position reported is the one captured on pointer-down. Moving the
//! pointer (or dragging the map) does not cancel the press. Opening a modal
//! dialog does.

use std::time::Duration;

use bevy::prelude::*;

use crate::constants::LONG_PRESS_THRESHOLD_MS;
use crate::map::{LatLng, MapPointerEvent};
use crate::ui::DialogState;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PressState {
    #[default]
    Idle,
    Pending { pressed_at: Duration, origin: LatLng },
}

#[derive(Resource, Debug, Clone)]
pub struct LongPressRecognizer {
    threshold: Duration,
    state: PressState,
}

impl Default for LongPressRecognizer {
    fn default() -> Self {
        Self::new(Duration::from_millis(LONG_PRESS_THRESHOLD_MS))
    }
}

impl LongPressRecognizer {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            state: PressState::Idle,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: Duration) {
        self.threshold = threshold;
    }

    /// Pointer went down at `origin`. A press already pending is replaced.
    pub fn press(&mut self, now: Duration, origin: LatLng) {
        self.state = PressState::Pending {
            pressed_at: now,
            origin,
        };
    }

    /// Drop a pending press without firing.
    pub fn cancel(&mut self) {
        self.state = PressState::Idle;
    }

    /// Pointer went up. Returns the press origin if the threshold had already
    /// been reached (the timer fired first), otherwise the press is discarded.
    pub fn release(&mut self, now: Duration) -> Option<LatLng> {
        let fired = self.tick(now);
        self.state = PressState::Idle;
        fired
    }

    /// Advance time. Returns the press origin once, when the threshold is reached.
    pub fn tick(&mut self, now: Duration) -> Option<LatLng> {
        match self.state {
            PressState::Pending { pressed_at, origin }
                if now.saturating_sub(pressed_at) >= self.threshold =>
            {
                self.state = PressState::Idle;
                Some(origin)
            }
            _ => None,
        }
    }
}

/// A press on the map was held long enough.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct LongPressTriggered {
    pub position: LatLng,
}

pub fn recognize_long_press(
    time: Res<Time>,
    dialog_state: Res<DialogState>,
    mut pointer_events: MessageReader<MapPointerEvent>,
    mut recognizer: ResMut<LongPressRecognizer>,
    mut triggered: MessageWriter<LongPressTriggered>,
) {
    if dialog_state.any_modal_open {
        if recognizer.state != PressState::Idle {
            debug!("Dialog opened, dropping pending long press");
        }
        recognizer.cancel();
        pointer_events.clear();
        return;
    }

    let now = time.elapsed();

    // A timer that ran out since last frame fires before this frame's input
    if let Some(position) = recognizer.tick(now) {
        triggered.write(LongPressTriggered { position });
    }

    for event in pointer_events.read() {
        match *event {
            MapPointerEvent::Down { position } => recognizer.press(now, position),
            MapPointerEvent::Up => {
                if let Some(position) = recognizer.release(now) {
                    triggered.write(LongPressTriggered { position });
                }
            }
        }
    }
}
