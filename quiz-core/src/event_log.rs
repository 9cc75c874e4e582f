//! # Event Log Module
//!
//! Append-only record of what happened during a quiz session. The engine
//! writes to an [`EventSink`]; the default sink keeps every event in memory
//! so the front end can print the session history on exit.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Destination for session events.
pub trait EventSink {
    fn record(&mut self, description: &str, timestamp: SystemTime);
}

/// A single logged event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    description: String,
    timestamp: SystemTime,
}

impl Event {
    pub fn new(description: impl Into<String>, timestamp: SystemTime) -> Self {
        Self {
            description: description.into(),
            timestamp,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let since_epoch = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        write!(
            f,
            "{}.{:03}: {}",
            since_epoch.as_secs(),
            since_epoch.subsec_millis(),
            self.description
        )
    }
}

/// In-memory event log. Every event is also forwarded to the `log` facade.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn record(&mut self, description: &str, timestamp: SystemTime) {
        log::info!(target: "quiz_core::events", "{}", description);
        self.events.push(Event::new(description, timestamp));
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn keeps_events_in_order() {
        let mut log = EventLog::new();
        let t0 = UNIX_EPOCH + Duration::from_secs(10);
        log.record("first", t0);
        log.record("second", t0 + Duration::from_millis(5));

        let descriptions: Vec<&str> = log.iter().map(Event::description).collect();
        assert_eq!(descriptions, ["first", "second"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn display_includes_timestamp() {
        let event = Event::new("Quiz started", UNIX_EPOCH + Duration::from_millis(1_500));
        assert_eq!(event.to_string(), "1.500: Quiz started");
    }
}
