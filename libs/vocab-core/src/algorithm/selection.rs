//! Choosing which item to review next.

use crate::types::ReviewProgress;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Review priority of two progress records at `now`.
///
/// Due items first, then earlier due time, bucket priority, lower last
/// quality, least recently reviewed, and finally word id so the order is
/// total.
pub fn review_order(a: &ReviewProgress, b: &ReviewProgress, now: DateTime<Utc>) -> Ordering {
    b.is_due(now)
        .cmp(&a.is_due(now))
        .then_with(|| a.next_due_at.cmp(&b.next_due_at))
        .then_with(|| a.bucket.priority().cmp(&b.bucket.priority()))
        .then_with(|| a.last_quality.cmp(&b.last_quality))
        .then_with(|| a.last_reviewed_at.cmp(&b.last_reviewed_at))
        .then_with(|| a.word_id.cmp(&b.word_id))
}

/// Pick the next item to review, or `None` for an empty pool.
///
/// Callers filter out suspended items beforehand.
pub fn select_next_candidate(pool: &[ReviewProgress], now: DateTime<Utc>) -> Option<&ReviewProgress> {
    pool.iter().min_by(|a, b| review_order(a, b, now))
}

/// The whole pool in review order.
pub fn review_queue(pool: &[ReviewProgress], now: DateTime<Utc>) -> Vec<&ReviewProgress> {
    let mut queue: Vec<&ReviewProgress> = pool.iter().collect();
    queue.sort_by(|a, b| review_order(a, b, now));
    queue
}
