//! Per-user attendance statistics.

use crate::core::duration::{duration_minutes, parse_timestamp};
use crate::models::event::AttendanceEvent;
use crate::models::stats::UserStats;
use std::collections::BTreeMap;

/// Aggregate one user's events into [`UserStats`].
///
/// Events are paired on a sorted copy: an `entry` immediately followed by an
/// `exit` forms a stay. Pairs with a non-positive duration are dropped, and
/// an `entry` shadowed by a later `entry` stays unpaired. The input order is
/// preserved for `last_record`, which refers to insertion order.
pub fn calculate_user_stats(username: &str, events: &[AttendanceEvent]) -> UserStats {
    let entries = events.iter().filter(|e| e.kind.is_entry()).count();
    let exits = events.iter().filter(|e| e.kind.is_exit()).count();

    // -----------------------------
    // Sort a copy chronologically
    // -----------------------------
    // Unparseable timestamps sort first; the sort is stable, so ties keep
    // their insertion order.
    let mut sorted: Vec<&AttendanceEvent> = events.iter().collect();
    sorted.sort_by_key(|e| sort_instant(e));

    // -----------------------------
    // Pair entries with exits
    // -----------------------------
    // State-threaded scan: an entry opens a stay, the next exit closes it.
    // A later entry replaces an unclosed one, and a non-positive duration
    // drops the pair without counting it.
    let mut total_stay = 0i64;
    let mut stay_count = 0i64;
    let mut longest = 0i64;
    let mut shortest = i64::MAX;

    let mut pending: Option<&AttendanceEvent> = None;
    for &ev in &sorted {
        if ev.kind.is_entry() {
            pending = Some(ev);
        } else if let Some(entry) = pending.take() {
            let stay = duration_minutes(&entry.timestamp, &ev.timestamp);
            if stay > 0 {
                total_stay += stay;
                stay_count += 1;
                longest = longest.max(stay);
                shortest = shortest.min(stay);
            }
        }
    }

    let average = if stay_count > 0 {
        (total_stay as f64 / stay_count as f64).round() as i64
    } else {
        0
    };

    // -----------------------------
    // Monthly histogram
    // -----------------------------
    let mut monthly: BTreeMap<String, usize> = BTreeMap::new();
    for ev in events {
        if let Some(dt) = parse_timestamp(&ev.timestamp) {
            *monthly.entry(dt.format("%Y-%m").to_string()).or_insert(0) += 1;
        }
    }

    UserStats {
        username: username.to_string(),
        total_records: events.len(),
        entries,
        exits,
        average_stay_minutes: average,
        longest_stay_minutes: longest,
        shortest_stay_minutes: if shortest == i64::MAX { 0 } else { shortest },
        monthly_stats: monthly,
        last_record: events.last().cloned(),
        balance_issue: entries != exits,
    }
}

fn sort_instant(ev: &AttendanceEvent) -> i64 {
    parse_timestamp(&ev.timestamp)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(i64::MIN)
}
