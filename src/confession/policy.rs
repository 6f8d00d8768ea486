// Lifecycle policy: pure functions deciding what happens to a confession.
//
// Grade → status mapping, retention expiry and feed visibility. Nothing here
// touches the store or the clock; callers pass `now` explicitly so expiry is
// re-evaluated on every sweep.

use chrono::{DateTime, Utc};

use super::models::{Confession, ConfessionStatus};

/// Milliseconds in one retention day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Map a moderation grade to the status a new confession starts with.
///
/// `X` maps to `Rejected`, which means "discard, never store". Anything the
/// classifier invents falls back to `Pending` so a human looks at it.
pub fn classify_grade(grade: &str) -> ConfessionStatus {
    match grade {
        "A1" => ConfessionStatus::Approved,
        "B2" => ConfessionStatus::Pending,
        "C4" => ConfessionStatus::Flagged,
        "X" => ConfessionStatus::Rejected,
        _ => ConfessionStatus::Pending,
    }
}

/// True once the confession is at least `retention_days` old at `now`.
/// Exact equality counts as expired.
pub fn is_expired(confession: &Confession, retention_days: u32, now: DateTime<Utc>) -> bool {
    let age_ms = (now - confession.created_at).num_milliseconds();
    age_ms >= i64::from(retention_days) * MS_PER_DAY
}

/// Approved, and not a read-once confession that has already been revealed.
pub fn is_visible_in_feed(confession: &Confession) -> bool {
    confession.status == ConfessionStatus::Approved
        && !(confession.is_read_once && confession.has_been_read)
}
