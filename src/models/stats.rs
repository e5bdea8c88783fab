//! Dashboard statistics shapes, computed fresh on every request.

use crate::models::StudySession;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_sessions: i64,
    /// Sum of all session durations, in minutes.
    pub total_minutes: i64,
    /// Mean session duration in minutes; 0 when there are no sessions.
    pub average_minutes: f64,
    /// Most recent session by date (creation time as tiebreak).
    pub last_session: Option<StudySession>,
    /// Top 3 categories by session count.
    pub top_categories: Vec<CategoryCount>,
    /// Per-day totals for every day with at least one session, in
    /// chronological order.
    pub daily_minutes: Vec<DailyTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    /// Human-readable category label; "Uncategorized" for skills without a
    /// category.
    pub category: String,
    pub sessions: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyTotal {
    pub date: String,
    /// Total study minutes that day, rounded to one decimal place.
    pub minutes: f64,
}
