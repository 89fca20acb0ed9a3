//! Repositories for the content tables.
//!
//! Thin static-method wrappers over `sqlx` queries, one unit struct per
//! table. The replace-all operations are DESTRUCTIVE: they delete every
//! existing row and insert the submitted list, inside a single transaction.
//! A failed insert rolls the delete back, so readers only ever observe the
//! old list or the new one.

use sqlx::SqlitePool;

use crate::db::models::{
    ContactMessage, Education, NewContactMessage, NewEducation, NewProject, NewSkill,
    NewSocialLink, Profile, Project, ProfileUpdate, Skill, SkillPatch, SocialLink,
};

/// Column list shared across profile queries.
const PROFILE_COLUMNS: &str =
    "id, name, role, about_text, projects_completed, technologies_learned, learning_mindset";

/// Column list shared across skill queries.
const SKILL_COLUMNS: &str = "id, icon, title, description";

/// Column list shared across project queries.
const PROJECT_COLUMNS: &str =
    "id, title, description, tech_tags, modal_content, github_link, image";

/// Column list shared across education queries.
const EDUCATION_COLUMNS: &str = "id, title, details, grade";

/// Column list shared across social link queries.
const SOCIAL_LINK_COLUMNS: &str = "id, platform, url, icon";

// =============================================================================
// Profile
// =============================================================================

/// Read and merge operations for the singleton profile row.
///
/// The table is a singleton by convention: the row with the lowest id is the
/// profile, and no operation here creates a second one.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Fetch the profile, if one has been created.
    pub async fn first(pool: &SqlitePool) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profile ORDER BY id LIMIT 1");
        sqlx::query_as::<_, Profile>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Merge the provided fields into the profile row.
    ///
    /// Only non-`None` fields are applied; everything else keeps its stored
    /// value. Returns `None` when no profile row exists yet.
    pub async fn update_first(
        pool: &SqlitePool,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let stats = update.stats.as_ref();
        let query = format!(
            "UPDATE profile SET
                name = COALESCE(?, name),
                role = COALESCE(?, role),
                about_text = COALESCE(?, about_text),
                projects_completed = COALESCE(?, projects_completed),
                technologies_learned = COALESCE(?, technologies_learned),
                learning_mindset = COALESCE(?, learning_mindset)
             WHERE id = (SELECT MIN(id) FROM profile)
             RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(&update.name)
            .bind(&update.role)
            .bind(&update.about_text)
            .bind(stats.and_then(|s| s.projects_completed))
            .bind(stats.and_then(|s| s.technologies_learned))
            .bind(stats.and_then(|s| s.learning_mindset))
            .fetch_optional(pool)
            .await
    }
}

// =============================================================================
// Skills
// =============================================================================

/// CRUD operations for the skills grid.
pub struct SkillRepo;

impl SkillRepo {
    /// List all skills ordered by id (insertion order).
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!("SELECT {SKILL_COLUMNS} FROM skills ORDER BY id");
        sqlx::query_as::<_, Skill>(&query).fetch_all(pool).await
    }

    /// Find one skill by id.
    pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = ?");
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Merge the provided fields into one skill.
    ///
    /// Only non-`None` fields are applied. Returns `None` when no row with
    /// the given id exists.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        patch: &SkillPatch,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!(
            "UPDATE skills SET
                icon = COALESCE(?, icon),
                title = COALESCE(?, title),
                description = COALESCE(?, description)
             WHERE id = ?
             RETURNING {SKILL_COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(&patch.icon)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the whole skill set with the submitted list.
    ///
    /// DESTRUCTIVE: deletes every existing skill. Atomic: delete and inserts
    /// share one transaction. Ids are assigned in submission order.
    pub async fn replace_all(pool: &SqlitePool, skills: &[NewSkill]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM skills").execute(&mut *tx).await?;
        for skill in skills {
            sqlx::query("INSERT INTO skills (icon, title, description) VALUES (?, ?, ?)")
                .bind(&skill.icon)
                .bind(&skill.title)
                .bind(&skill.description)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await
    }
}

// =============================================================================
// Projects
// =============================================================================

/// List and replace operations for project cards.
pub struct ProjectRepo;

impl ProjectRepo {
    /// List all projects ordered by id (insertion order).
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Replace the whole project list with the submitted one.
    ///
    /// DESTRUCTIVE: deletes every existing project. Atomic: delete and
    /// inserts share one transaction. Ids are assigned in submission order,
    /// and `tech_tags` keeps the submitted tag order byte-for-byte.
    pub async fn replace_all(
        pool: &SqlitePool,
        projects: &[NewProject],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM projects").execute(&mut *tx).await?;
        for project in projects {
            sqlx::query(
                "INSERT INTO projects (title, description, tech_tags, modal_content, github_link, image)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&project.title)
            .bind(&project.description)
            .bind(&project.tech_tags)
            .bind(&project.modal_content)
            .bind(&project.github_link)
            .bind(&project.image)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }
}

// =============================================================================
// Education
// =============================================================================

/// List and replace operations for education entries.
pub struct EducationRepo;

impl EducationRepo {
    /// List all education entries ordered by id (insertion order).
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Education>, sqlx::Error> {
        let query = format!("SELECT {EDUCATION_COLUMNS} FROM education ORDER BY id");
        sqlx::query_as::<_, Education>(&query).fetch_all(pool).await
    }

    /// Replace the whole education list with the submitted one.
    ///
    /// DESTRUCTIVE: deletes every existing entry. Atomic: delete and inserts
    /// share one transaction. Ids are assigned in submission order.
    pub async fn replace_all(
        pool: &SqlitePool,
        entries: &[NewEducation],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM education").execute(&mut *tx).await?;
        for entry in entries {
            sqlx::query("INSERT INTO education (title, details, grade) VALUES (?, ?, ?)")
                .bind(&entry.title)
                .bind(&entry.details)
                .bind(&entry.grade)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await
    }
}

// =============================================================================
// Social links
// =============================================================================

/// List and replace operations for social links.
pub struct SocialLinkRepo;

impl SocialLinkRepo {
    /// List all social links ordered by id (insertion order).
    pub async fn list(pool: &SqlitePool) -> Result<Vec<SocialLink>, sqlx::Error> {
        let query = format!("SELECT {SOCIAL_LINK_COLUMNS} FROM social_links ORDER BY id");
        sqlx::query_as::<_, SocialLink>(&query).fetch_all(pool).await
    }

    /// Replace the whole link list with the submitted one.
    ///
    /// DESTRUCTIVE: deletes every existing link. Atomic: delete and inserts
    /// share one transaction. Ids are assigned in submission order.
    pub async fn replace_all(
        pool: &SqlitePool,
        links: &[NewSocialLink],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM social_links")
            .execute(&mut *tx)
            .await?;
        for link in links {
            sqlx::query("INSERT INTO social_links (platform, url, icon) VALUES (?, ?, ?)")
                .bind(&link.platform)
                .bind(&link.url)
                .bind(&link.icon)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await
    }
}

// =============================================================================
// Contact messages
// =============================================================================

/// Append-only store for visitor messages.
///
/// There is intentionally no list or get here: messages are written by the
/// public contact endpoint and read by the site owner outside this API.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert a message. `created_at` is assigned by the database.
    pub async fn insert(
        pool: &SqlitePool,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, sqlx::Error> {
        sqlx::query_as::<_, ContactMessage>(
            "INSERT INTO contact_messages (name, email, message) VALUES (?, ?, ?)
             RETURNING id, name, email, message, created_at",
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.message)
        .fetch_one(pool)
        .await
    }
}

// =============================================================================
// Tests
// =============================================================================
