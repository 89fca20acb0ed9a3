//! Record and request types for the content tables.
//!
//! Record structs mirror table columns one-to-one; their JSON field names are
//! the column names, which is the wire format the frontend expects. Request
//! types (`New*`, `*Update`, `*Patch`) model what clients may submit: fields
//! backing NOT NULL columns are required, everything else is optional.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// =============================================================================
// Records
// =============================================================================

/// The singleton profile row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub about_text: Option<String>,
    pub projects_completed: Option<i64>,
    pub technologies_learned: Option<i64>,
    pub learning_mindset: Option<i64>,
}

/// One entry of the skills grid.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: i64,
    pub icon: String,
    pub title: String,
    pub description: Option<String>,
}

/// One portfolio project card.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Ordered technology tags, stored as a JSON array.
    pub tech_tags: Option<Json<Vec<String>>>,
    pub modal_content: Option<String>,
    pub github_link: Option<String>,
    pub image: Option<String>,
}

/// One education timeline entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Education {
    pub id: i64,
    pub title: String,
    pub details: Option<String>,
    pub grade: Option<String>,
}

/// One social media link.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SocialLink {
    pub id: i64,
    pub platform: String,
    pub url: String,
    pub icon: Option<String>,
}

/// A stored visitor message.
///
/// Append-only: no route ever serializes these back out, so there is no
/// `Serialize` impl to reach for by accident.
#[derive(Debug, Clone, FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    /// Assigned by the database at insert time.
    pub created_at: NaiveDateTime,
}

// =============================================================================
// Request types
// =============================================================================

/// A skill as submitted to the replace-all endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSkill {
    pub icon: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A project as submitted to the replace-all endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_tags: Option<Json<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// An education entry as submitted to the replace-all endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEducation {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

/// A social link as submitted to the replace-all endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSocialLink {
    pub platform: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Partial profile update. Absent fields keep their stored value.
///
/// Top-level text fields plus an optional nested `stats` block for the
/// counters, matching the admin frontend's payload shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub about_text: Option<String>,
    pub stats: Option<StatsUpdate>,
}

/// Counter block of a [`ProfileUpdate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsUpdate {
    pub projects_completed: Option<i64>,
    pub technologies_learned: Option<i64>,
    pub learning_mindset: Option<i64>,
}

impl ProfileUpdate {
    /// True when the payload carries no usable field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.about_text.is_none()
            && self.stats.as_ref().map_or(true, StatsUpdate::is_empty)
    }
}

impl StatsUpdate {
    pub fn is_empty(&self) -> bool {
        self.projects_completed.is_none()
            && self.technologies_learned.is_none()
            && self.learning_mindset.is_none()
    }
}

/// Partial update for a single skill. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillPatch {
    pub icon: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl SkillPatch {
    /// True when the payload carries no usable field at all.
    pub fn is_empty(&self) -> bool {
        self.icon.is_none() && self.title.is_none() && self.description.is_none()
    }
}

/// A visitor message as submitted by the contact form.
///
/// All fields are optional; the endpoint only rejects payloads with no
/// recognized field at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl NewContactMessage {
    /// True when the payload carries no usable field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }
}

// =============================================================================
// Tests
// =============================================================================
