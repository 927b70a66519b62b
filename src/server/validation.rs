//! Request validation for the JSON endpoints.
//!
//! Bodies are inspected as loose JSON so that each failure mode keeps its
//! own error code instead of collapsing into a generic deserialization
//! error.

use crate::core::duration::parse_timestamp;
use crate::models::event::AttendanceEvent;
use crate::models::event_type::EventType;
use crate::server::error::ApiError;
use regex::Regex;
use serde_json::Value;

/// Shape check for ISO 8601 timestamps: date, time, optional fraction of up
/// to seven digits, optional offset.
fn looks_like_iso(ts: &str) -> bool {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,7})?(Z|[+-]\d{2}:\d{2})?$")
        .unwrap()
        .is_match(ts)
}

/// A field counts as blank when it is absent or one of the empty-ish JSON
/// forms clients tend to send: null, "", false, 0.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

pub fn validate_login(body: &Value) -> Result<(String, String), ApiError> {
    if is_blank(body.get("username")) || is_blank(body.get("password")) {
        return Err(ApiError::bad_request(
            "Username and password are required",
            "missing_credentials",
        ));
    }

    let (Some(username), Some(password)) = (
        body.get("username").and_then(Value::as_str),
        body.get("password").and_then(Value::as_str),
    ) else {
        return Err(ApiError::bad_request(
            "Username and password must be strings",
            "invalid_type",
        ));
    };

    Ok((username.to_string(), password.to_string()))
}

pub fn validate_record_type(body: &Value) -> Result<EventType, ApiError> {
    if is_blank(body.get("type")) {
        return Err(ApiError::bad_request("Type is required", "missing_type"));
    }

    body.get("type")
        .and_then(Value::as_str)
        .and_then(EventType::parse)
        .ok_or_else(|| {
            ApiError::bad_request("Type must be either \"entry\" or \"exit\"", "invalid_type")
        })
}

pub fn validate_record_update(body: &Value) -> Result<AttendanceEvent, ApiError> {
    if is_blank(body.get("type")) || is_blank(body.get("timestamp")) {
        return Err(ApiError::bad_request(
            "Type and timestamp are required",
            "missing_fields",
        ));
    }

    let kind = body
        .get("type")
        .and_then(Value::as_str)
        .and_then(EventType::parse)
        .ok_or_else(|| {
            ApiError::bad_request("Type must be either \"entry\" or \"exit\"", "invalid_type")
        })?;

    let timestamp = body
        .get("timestamp")
        .and_then(Value::as_str)
        .filter(|ts| looks_like_iso(ts))
        .ok_or_else(|| {
            ApiError::bad_request(
                "Timestamp must be an ISO 8601 date-time",
                "invalid_timestamp_format",
            )
        })?;

    // A well-shaped string can still name an impossible instant.
    if parse_timestamp(timestamp).is_none() {
        return Err(ApiError::bad_request(
            "Timestamp is not a valid instant",
            "invalid_timestamp",
        ));
    }

    Ok(AttendanceEvent::new(kind, timestamp.to_string()))
}

pub fn parse_index(raw: &str) -> Result<usize, ApiError> {
    raw.parse::<usize>()
        .map_err(|_| ApiError::bad_request("Index must be a non-negative integer", "invalid_index"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_requires_both_fields() {
        for body in [
            json!({}),
            json!({"username": "anna"}),
            json!({"username": "anna", "password": ""}),
            json!({"username": null, "password": "pw"}),
            json!({"username": 0, "password": "pw"}),
        ] {
            let err = validate_login(&body).unwrap_err();
            assert_eq!(err.code, Some("missing_credentials"), "body: {body}");
        }
    }

    #[test]
    fn login_rejects_non_string_fields() {
        let err = validate_login(&json!({"username": 42, "password": "pw"})).unwrap_err();
        assert_eq!(err.code, Some("invalid_type"));
    }

    #[test]
    fn login_passes_through_valid_credentials() {
        let (u, p) = validate_login(&json!({"username": "anna", "password": "pw"})).unwrap();
        assert_eq!(u, "anna");
        assert_eq!(p, "pw");
    }

    #[test]
    fn record_type_must_be_present_and_known() {
        let err = validate_record_type(&json!({})).unwrap_err();
        assert_eq!(err.code, Some("missing_type"));

        let err = validate_record_type(&json!({"type": "lunch"})).unwrap_err();
        assert_eq!(err.code, Some("invalid_type"));

        let err = validate_record_type(&json!({"type": 7})).unwrap_err();
        assert_eq!(err.code, Some("invalid_type"));

        let kind = validate_record_type(&json!({"type": "exit"})).unwrap();
        assert_eq!(kind, EventType::Exit);
    }

    #[test]
    fn update_requires_both_fields() {
        let err = validate_record_update(&json!({"type": "entry"})).unwrap_err();
        assert_eq!(err.code, Some("missing_fields"));

        let err = validate_record_update(&json!({"timestamp": "2024-05-04T10:00:00Z"}))
            .unwrap_err();
        assert_eq!(err.code, Some("missing_fields"));
    }

    #[test]
    fn update_checks_the_timestamp_shape() {
        for ts in [
            "04.05.2024 10:00",
            "2024-05-04",
            "2024-05-04T10:00",
            "2024-05-04T10:00:00.12345678Z",
            "2024-05-04T10:00:00+0200",
        ] {
            let err =
                validate_record_update(&json!({"type": "entry", "timestamp": ts})).unwrap_err();
            assert_eq!(err.code, Some("invalid_timestamp_format"), "ts: {ts}");
        }
    }

    #[test]
    fn update_accepts_the_usual_shapes() {
        for ts in [
            "2024-05-04T10:00:00",
            "2024-05-04T10:00:00Z",
            "2024-05-04T10:00:00.123Z",
            "2024-05-04T10:00:00.1234567",
            "2024-05-04T10:00:00+02:00",
        ] {
            let ev = validate_record_update(&json!({"type": "exit", "timestamp": ts})).unwrap();
            assert_eq!(ev.timestamp, ts);
        }
    }

    #[test]
    fn update_rejects_well_shaped_nonsense() {
        let err = validate_record_update(
            &json!({"type": "entry", "timestamp": "2024-13-40T99:99:99Z"}),
        )
        .unwrap_err();
        assert_eq!(err.code, Some("invalid_timestamp"));
    }

    #[test]
    fn index_must_be_a_plain_number() {
        assert_eq!(parse_index("0").unwrap(), 0);
        assert_eq!(parse_index("17").unwrap(), 17);
        for raw in ["", "abc", "-1", "3.5", "3abc"] {
            let err = parse_index(raw).unwrap_err();
            assert_eq!(err.code, Some("invalid_index"), "raw: {raw}");
        }
    }
}
