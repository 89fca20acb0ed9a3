//! Database layer: pool construction, schema bootstrap, and repositories.
//!
//! # Architecture
//!
//! The database layer sits between the HTTP handlers and SQLite:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │       Repositories (static methods)     │
//! │  ProfileRepo, SkillRepo, ProjectRepo,   │
//! │  EducationRepo, SocialLinkRepo,         │
//! │  ContactRepo                            │
//! └────────────────────┬────────────────────┘
//! ┌─────────────────────────────────────────┐
//! │            SqlitePool (sqlx)            │
//! │    (schema created before serving)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! There are no migrations: `init_schema` issues `CREATE TABLE IF NOT EXISTS`
//! for every table at launch, and that is the whole schema story.
//!
//! # Usage
//!
//! ```ignore
//! use portfolio_backend::db::{self, SkillRepo};
//!
//! let pool = db::connect("sqlite://portfolio.db").await?;
//! db::init_schema(&pool).await?;
//!
//! let skills = SkillRepo::list(&pool).await?;
//! ```

mod models;
mod repo;

pub use models::{
    ContactMessage, Education, NewContactMessage, NewEducation, NewProject, NewSkill,
    NewSocialLink, Profile, ProfileUpdate, Project, Skill, SkillPatch, SocialLink, StatsUpdate,
};
pub use repo::{
    ContactRepo, EducationRepo, ProfileRepo, ProjectRepo, SkillRepo, SocialLinkRepo,
};

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Pool size for file-backed databases.
const MAX_CONNECTIONS: u32 = 5;

/// Statements run by [`init_schema`]. Idempotent by construction.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS profile (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        role TEXT NOT NULL,
        about_text TEXT,
        projects_completed INTEGER,
        technologies_learned INTEGER,
        learning_mindset INTEGER
    )",
    "CREATE TABLE IF NOT EXISTS skills (
        id INTEGER PRIMARY KEY,
        icon TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT
    )",
    "CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        tech_tags TEXT,
        modal_content TEXT,
        github_link TEXT,
        image TEXT
    )",
    "CREATE TABLE IF NOT EXISTS education (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        details TEXT,
        grade TEXT
    )",
    "CREATE TABLE IF NOT EXISTS social_links (
        id INTEGER PRIMARY KEY,
        platform TEXT NOT NULL,
        url TEXT NOT NULL,
        icon TEXT
    )",
    "CREATE TABLE IF NOT EXISTS contact_messages (
        id INTEGER PRIMARY KEY,
        name TEXT,
        email TEXT,
        message TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
];

/// Open a connection pool for the given SQLite URL.
///
/// The database file is created if it does not exist. In-memory databases
/// are capped at a single connection: each in-memory connection gets its own
/// private database, so a larger pool would scatter tables across them.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let max_connections = if is_in_memory(database_url) {
        1
    } else {
        MAX_CONNECTIONS
    };
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Create every content table that does not exist yet.
///
/// Called once at launch, before the server starts accepting requests.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

// =============================================================================
// Tests
// =============================================================================
