//! Skill entity: a user-defined learning topic with an optional category tag.

use crate::error::{AppError, FieldErrors};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Skill {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    /// One of the [`Category`] slugs, or None for an uncategorized skill.
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fixed set of skill category tags.
///
/// Stored in the database as the snake_case slug; rendered with the
/// human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Cognitive,
    Programming,
    DataAnalysis,
    Languages,
    Writing,
    PublicSpeaking,
    ProjectManagement,
    Design,
    Math,
    Science,
    History,
    TimeManagement,
    Communication,
    Productivity,
    CriticalThinking,
    MemoryTraining,
    Music,
    Art,
    SoftSkills,
    Mindfulness,
    Other,
}

impl Category {
    pub const ALL: [Category; 21] = [
        Category::Cognitive,
        Category::Programming,
        Category::DataAnalysis,
        Category::Languages,
        Category::Writing,
        Category::PublicSpeaking,
        Category::ProjectManagement,
        Category::Design,
        Category::Math,
        Category::Science,
        Category::History,
        Category::TimeManagement,
        Category::Communication,
        Category::Productivity,
        Category::CriticalThinking,
        Category::MemoryTraining,
        Category::Music,
        Category::Art,
        Category::SoftSkills,
        Category::Mindfulness,
        Category::Other,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Category::Cognitive => "cognitive",
            Category::Programming => "programming",
            Category::DataAnalysis => "data_analysis",
            Category::Languages => "languages",
            Category::Writing => "writing",
            Category::PublicSpeaking => "public_speaking",
            Category::ProjectManagement => "project_management",
            Category::Design => "design",
            Category::Math => "math",
            Category::Science => "science",
            Category::History => "history",
            Category::TimeManagement => "time_management",
            Category::Communication => "communication",
            Category::Productivity => "productivity",
            Category::CriticalThinking => "critical_thinking",
            Category::MemoryTraining => "memory_training",
            Category::Music => "music",
            Category::Art => "art",
            Category::SoftSkills => "soft_skills",
            Category::Mindfulness => "mindfulness",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Cognitive => "Cognitive Skills",
            Category::Programming => "Programming / Coding",
            Category::DataAnalysis => "Data Analysis",
            Category::Languages => "Foreign Languages",
            Category::Writing => "Writing & Composition",
            Category::PublicSpeaking => "Public Speaking",
            Category::ProjectManagement => "Project Management",
            Category::Design => "Design & Creativity",
            Category::Math => "Mathematics",
            Category::Science => "Science & Engineering",
            Category::History => "History & Culture",
            Category::TimeManagement => "Time Management",
            Category::Communication => "Communication Skills",
            Category::Productivity => "Productivity Techniques",
            Category::CriticalThinking => "Critical Thinking",
            Category::MemoryTraining => "Memory Training",
            Category::Music => "Music & Instruments",
            Category::Art => "Art & Drawing",
            Category::SoftSkills => "Soft Skills",
            Category::Mindfulness => "Mindfulness & Well-being",
            Category::Other => "Other",
        }
    }

    pub fn parse(slug: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.slug() == slug)
    }

    /// Display label for a stored category value; NULL is "Uncategorized".
    pub fn label_for(slug: Option<&str>) -> &'static str {
        match slug {
            None => "Uncategorized",
            Some(s) => Category::parse(s).map(Category::label).unwrap_or("Other"),
        }
    }
}

/// Payload for both create (POST) and full update (PUT), and for the HTML
/// skill form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Category slug; empty string (from an HTML select) counts as None.
    #[serde(default)]
    pub category: Option<String>,
}

impl SkillRequest {
    /// Normalized category: trims and maps the empty select option to None.
    pub fn category_slug(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "This field is required");
        } else if self.name.chars().count() > 50 {
            errors.add("name", "Ensure this value has at most 50 characters");
        }

        if self.description.trim().is_empty() {
            errors.add("description", "This field is required");
        }

        if let Some(slug) = self.category_slug() {
            if Category::parse(slug).is_none() {
                errors.add("category", "Select a valid category");
            }
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_slugs_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.slug()), Some(category));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert_eq!(Category::parse("knitting"), None);
    }

    #[test]
    fn null_category_labels_as_uncategorized() {
        assert_eq!(Category::label_for(None), "Uncategorized");
        assert_eq!(Category::label_for(Some("data_analysis")), "Data Analysis");
    }

    #[test]
    fn valid_skill_request_passes() {
        let req = SkillRequest {
            name: "Rust".to_string(),
            description: "Systems programming".to_string(),
            category: Some("programming".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_category_counts_as_none() {
        let req = SkillRequest {
            name: "Rust".to_string(),
            description: "Systems programming".to_string(),
            category: Some("".to_string()),
        };
        assert_eq!(req.category_slug(), None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn name_cap_counts_characters_not_bytes() {
        // 50 two-byte characters must pass; the cap is on characters.
        let req = SkillRequest {
            name: "é".repeat(50),
            description: "accents".to_string(),
            category: None,
        };
        assert!(req.validate().is_ok());

        let req = SkillRequest {
            name: "é".repeat(51),
            ..req
        };
        match req.validate() {
            Err(AppError::Validation(fields)) => assert!(fields.get("name").is_some()),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn missing_fields_collect_errors() {
        let req = SkillRequest {
            name: "".to_string(),
            description: "".to_string(),
            category: Some("not-a-category".to_string()),
        };
        match req.validate() {
            Err(AppError::Validation(fields)) => {
                assert!(fields.get("name").is_some());
                assert!(fields.get("description").is_some());
                assert!(fields.get("category").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
