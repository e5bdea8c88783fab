//! Study session entity: a dated, timed study event tied to one skill.

use crate::error::{AppError, FieldErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Duration choices offered to the user, in minutes.
pub const DURATION_CHOICES: [i64; 8] = [15, 30, 45, 60, 90, 120, 150, 180];

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudySession {
    pub id: String,
    pub user_id: String,
    pub skill_id: String,
    /// Day the session took place, as "YYYY-MM-DD".
    pub date: String,
    pub duration_minutes: i64,
    pub notes: Option<String>,
    pub created_at: String,
    /// Name of the session's skill, joined in for display.
    pub skill_name: String,
}

/// Payload for both create (POST) and full update (PUT), and for the HTML
/// session form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub skill_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SessionRequest {
    /// Notes with the empty textarea normalized to None.
    pub fn notes_trimmed(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Field checks that do not need the database. Whether `skill_id` names
    /// a skill owned by the caller is checked at the handler, against the
    /// store.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();

        if self.skill_id.trim().is_empty() {
            errors.add("skill_id", "This field is required");
        }

        if NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            errors.add("date", "Enter a valid date (YYYY-MM-DD)");
        }

        if !DURATION_CHOICES.contains(&self.duration_minutes) {
            errors.add("duration_minutes", "Select a valid duration");
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SessionRequest {
        SessionRequest {
            skill_id: "skill-1".to_string(),
            date: "2026-03-14".to_string(),
            duration_minutes: 45,
            notes: Some("  ".to_string()),
        }
    }

    #[test]
    fn valid_session_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn blank_notes_normalize_to_none() {
        assert_eq!(valid_request().notes_trimmed(), None);
    }

    #[test]
    fn durations_outside_choices_fail() {
        for bad in [0, -30, 17, 200] {
            let req = SessionRequest {
                duration_minutes: bad,
                ..valid_request()
            };
            match req.validate() {
                Err(AppError::Validation(fields)) => {
                    assert!(fields.get("duration_minutes").is_some());
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn malformed_date_fails() {
        let req = SessionRequest {
            date: "14/03/2026".to_string(),
            ..valid_request()
        };
        match req.validate() {
            Err(AppError::Validation(fields)) => {
                assert!(fields.get("date").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
