use super::event::AttendanceEvent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated attendance figures for one user. All stay times are whole
/// minutes. Field names follow the JSON convention of the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub username: String,
    pub total_records: usize,
    pub entries: usize,
    pub exits: usize,
    pub average_stay_minutes: i64,
    pub longest_stay_minutes: i64,
    pub shortest_stay_minutes: i64,
    /// Events per calendar month, keyed "YYYY-MM".
    pub monthly_stats: BTreeMap<String, usize>,
    /// The most recently inserted event, regardless of its timestamp.
    pub last_record: Option<AttendanceEvent>,
    pub balance_issue: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_fields_are_camel_case() {
        let stats = UserStats {
            username: "anna".to_string(),
            total_records: 2,
            entries: 1,
            exits: 1,
            average_stay_minutes: 30,
            longest_stay_minutes: 30,
            shortest_stay_minutes: 30,
            monthly_stats: BTreeMap::new(),
            last_record: None,
            balance_issue: false,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"totalRecords\":2"));
        assert!(json.contains("\"averageStayMinutes\":30"));
        assert!(json.contains("\"longestStayMinutes\":30"));
        assert!(json.contains("\"shortestStayMinutes\":30"));
        assert!(json.contains("\"monthlyStats\":{}"));
        assert!(json.contains("\"lastRecord\":null"));
        assert!(json.contains("\"balanceIssue\":false"));
    }
}
