pub mod backup;
pub mod clock;
pub mod duration;
pub mod stats;
