//! Response types of the HTTP API.
//!
//! Request bodies are validated field by field in [`super::validation`]
//! instead of being deserialized into structs, so only the response side
//! lives here.

use crate::models::event::AttendanceEvent;
use crate::models::user::Claims;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: Claims,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: Claims,
}

#[derive(Debug, Serialize)]
pub struct RecordCreated {
    pub success: bool,
    pub record: AttendanceEvent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdated {
    pub success: bool,
    pub updated_record: AttendanceEvent,
}

#[derive(Debug, Serialize)]
pub struct RecordDeleted {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTime {
    pub current_time: String,
}
