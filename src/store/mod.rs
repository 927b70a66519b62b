//! JSON document stores.
//!
//! Both documents live in the configured data directory and are read and
//! rewritten whole on every mutation. The single server process is the only
//! writer.

pub mod records;
pub mod users;

pub const USERS_FILE: &str = "users.json";
pub const RECORDS_FILE: &str = "attendance.json";
