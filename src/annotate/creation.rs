//! Turning a long press into a categorized marker.
//!
//! The two questions are asked one after the other in modal prompts:
//!
//! ```text
//! Idle -> AwaitingTime -> AwaitingNotes -> Committing -> Idle
//! ```

use bevy::prelude::*;

use crate::map::{IconSpec, LatLng, PlaceMarkerRequest};
use crate::ui::ShowNotice;

use super::category::EventCategory;
use super::long_press::LongPressTriggered;
use super::record::MarkerRecord;
use super::selection::SelectedCategory;

pub const TIME_PROMPT: &str = "Please enter the event time (e.g., \"2025-05-10 14:00\"):";
pub const NOTES_PROMPT: &str = "Please add any additional notes for the event:";
pub const NO_CATEGORY_NOTICE: &str = "Please select an event type first.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FlowStep {
    #[default]
    Idle,
    AwaitingTime {
        position: LatLng,
        category: EventCategory,
    },
    AwaitingNotes {
        position: LatLng,
        category: EventCategory,
        time: String,
    },
    Committing(MarkerRecord),
}

/// What happened to a long press handed to the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    NoCategory,
    /// A marker is already being created
    Busy,
}

#[derive(Resource, Debug, Default)]
pub struct CreationFlow {
    step: FlowStep,
    /// Text the user is typing into the open prompt
    pub input: String,
}

impl CreationFlow {
    pub fn step(&self) -> &FlowStep {
        &self.step
    }

    /// True while a prompt is open or a record waits to be committed.
    pub fn is_active(&self) -> bool {
        self.step != FlowStep::Idle
    }

    /// Start asking about a marker at `position`. The category is captured now;
    /// changing the selection mid-flow does not affect this marker.
    pub fn begin(&mut self, position: LatLng, selected: Option<EventCategory>) -> TriggerOutcome {
        if self.is_active() {
            return TriggerOutcome::Busy;
        }
        let Some(category) = selected else {
            return TriggerOutcome::NoCategory;
        };
        self.input.clear();
        self.step = FlowStep::AwaitingTime { position, category };
        TriggerOutcome::Started
    }

    /// Prompt text for the current step, if a prompt should be shown.
    pub fn prompt(&self) -> Option<&'static str> {
        match self.step {
            FlowStep::AwaitingTime { .. } => Some(TIME_PROMPT),
            FlowStep::AwaitingNotes { .. } => Some(NOTES_PROMPT),
            FlowStep::Idle | FlowStep::Committing(_) => None,
        }
    }

    /// Confirm the open prompt with the typed text.
    pub fn submit(&mut self) {
        let answer = std::mem::take(&mut self.input);
        self.answer(answer);
    }

    /// Dismiss the open prompt; counts as an empty answer.
    pub fn cancel(&mut self) {
        self.input.clear();
        self.answer(String::new());
    }

    fn answer(&mut self, answer: String) {
        self.step = match std::mem::take(&mut self.step) {
            FlowStep::AwaitingTime { position, category } => FlowStep::AwaitingNotes {
                position,
                category,
                time: answer,
            },
            FlowStep::AwaitingNotes {
                position,
                category,
                time,
            } => FlowStep::Committing(MarkerRecord::new(position, category, time, answer)),
            other => other,
        };
    }

    /// Take the finished record and return to idle.
    pub fn take_committed(&mut self) -> Option<MarkerRecord> {
        match std::mem::take(&mut self.step) {
            FlowStep::Committing(record) => Some(record),
            other => {
                self.step = other;
                None
            }
        }
    }
}

pub fn start_marker_creation(
    mut triggers: MessageReader<LongPressTriggered>,
    selected: Res<SelectedCategory>,
    mut flow: ResMut<CreationFlow>,
    mut notices: MessageWriter<ShowNotice>,
) {
    for trigger in triggers.read() {
        match flow.begin(trigger.position, selected.get()) {
            TriggerOutcome::Started => {
                debug!("Long press at {}, asking for details", trigger.position.format_short());
            }
            TriggerOutcome::NoCategory => {
                notices.write(ShowNotice::new(NO_CATEGORY_NOTICE));
            }
            TriggerOutcome::Busy => {
                debug!("Ignoring long press while a marker is being created");
            }
        }
    }
}

pub fn commit_marker(
    mut flow: ResMut<CreationFlow>,
    mut place_requests: MessageWriter<PlaceMarkerRequest>,
) {
    let Some(record) = flow.take_committed() else {
        return;
    };

    let popup = record.popup_content();
    info!("Adding marker: {}", popup.to_html());

    place_requests.write(PlaceMarkerRequest {
        position: record.position,
        icon: IconSpec::category(record.category),
        popup,
        open_popup: false,
        category: Some(record.category),
    });
}
