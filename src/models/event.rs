use super::event_type::EventType;
use serde::{Deserialize, Serialize};

/// A single clock event as stored in the attendance document and sent over
/// the wire. The timestamp is kept verbatim as an ISO 8601 string; parsing
/// happens lazily wherever a calculation needs an instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceEvent {
    #[serde(rename = "type")]
    pub kind: EventType, // ⇔ "type" ('entry' | 'exit')
    pub timestamp: String, // ⇔ ISO 8601, e.g. "2024-05-04T14:23:45.123Z"
}

impl AttendanceEvent {
    pub fn new(kind: EventType, timestamp: String) -> Self {
        Self { kind, timestamp }
    }
}
