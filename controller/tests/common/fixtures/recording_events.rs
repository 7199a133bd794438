//! Event recorder that keeps every event in memory

use controller::events::{EventKind, EventRecorder};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub node_name: String,
    pub kind: EventKind,
    pub reason: String,
    pub message: String,
}

#[derive(Default)]
pub struct RecordingEventRecorder {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingEventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn reasons_for(&self, node_name: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.node_name == node_name)
            .map(|event| event.reason)
            .collect()
    }
}

impl EventRecorder for RecordingEventRecorder {
    fn event(&self, node_name: &str, kind: EventKind, reason: &str, message: String) {
        self.events.lock().unwrap().push(RecordedEvent {
            node_name: node_name.to_string(),
            kind,
            reason: reason.to_string(),
            message,
        });
    }
}
