pub mod event;
pub mod event_type;
pub mod stats;
pub mod user;
