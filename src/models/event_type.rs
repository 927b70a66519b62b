use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Entry,
    Exit,
}

impl EventType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(Self::Entry),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Entry => "entry",
            EventType::Exit => "exit",
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, EventType::Entry)
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, EventType::Exit)
    }
}
