//! List repository
//!
//! find/all/create/update/destroy over the `lists` table.
//! Names are validated here, so a rejected write never touches the database.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{List, ListName, ListParams, ValidationError};

const LIST_COLUMNS: &str = "id, name, created_at, updated_at";

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("database schema version {db_version} is newer than supported version {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: i64,
        latest_supported: i64,
    },
}

impl DbError {
    fn list_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "list",
            id: id.to_string(),
        }
    }
}

/// List repository
pub struct ListRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ListRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All lists, newest first.
    pub async fn all(&self) -> Result<Vec<List>, DbError> {
        let lists = sqlx::query_as::<_, List>(&format!(
            "SELECT {LIST_COLUMNS} FROM lists ORDER BY id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(lists)
    }

    /// Get a single list by id.
    pub async fn find(&self, id: i64) -> Result<List, DbError> {
        sqlx::query_as::<_, List>(&format!("SELECT {LIST_COLUMNS} FROM lists WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::list_not_found(id))
    }

    /// Validate and insert a new list.
    pub async fn create(&self, params: &ListParams) -> Result<List, DbError> {
        let name = ListName::new(params.name.as_deref().unwrap_or_default())?;
        let now = Utc::now();

        let list = sqlx::query_as::<_, List>(&format!(
            "INSERT INTO lists (name, created_at, updated_at) VALUES (?, ?, ?) RETURNING {LIST_COLUMNS}"
        ))
        .bind(name.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;
        Ok(list)
    }

    /// Overwrite the permitted attributes of an existing list.
    ///
    /// Params without a name leave the row untouched.
    pub async fn update(&self, id: i64, params: &ListParams) -> Result<List, DbError> {
        let Some(raw) = params.name.as_deref() else {
            return self.find(id).await;
        };
        let name = ListName::new(raw)?;

        sqlx::query_as::<_, List>(&format!(
            "UPDATE lists SET name = ?, updated_at = ? WHERE id = ? RETURNING {LIST_COLUMNS}"
        ))
        .bind(name.as_str())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::list_not_found(id))
    }

    /// Delete a list, returning the removed record.
    pub async fn destroy(&self, id: i64) -> Result<List, DbError> {
        sqlx::query_as::<_, List>(&format!(
            "DELETE FROM lists WHERE id = ? RETURNING {LIST_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::list_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_in_memory_pool, migrations};

    async fn pool() -> SqlitePool {
        let pool = create_in_memory_pool().await.unwrap();
        migrations::run(&pool).await.unwrap();
        pool
    }

    fn named(name: &str) -> ListParams {
        ListParams {
            name: Some(name.to_owned()),
        }
    }

    #[tokio::test]
    async fn all_is_newest_first() {
        let pool = pool().await;
        let repo = ListRepo::new(&pool);
        for name in ["first", "second", "third"] {
            repo.create(&named(name)).await.unwrap();
        }

        let names: Vec<_> = repo.all().await.unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamps() {
        let pool = pool().await;
        let list = ListRepo::new(&pool).create(&named("Groceries")).await.unwrap();

        assert!(list.id > 0);
        assert_eq!(list.name, "Groceries");
        assert_eq!(list.created_at, list.updated_at);
    }

    #[tokio::test]
    async fn create_rejects_blank_without_writing() {
        let pool = pool().await;
        let repo = ListRepo::new(&pool);

        let err = repo.create(&named("  ")).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::Empty { .. })));

        let err = repo.create(&ListParams::default()).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        assert!(repo.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_missing_is_not_found() {
        let pool = pool().await;
        let err = ListRepo::new(&pool).find(42).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "list", ref id } if id == "42"));
    }

    #[tokio::test]
    async fn update_overwrites_name() {
        let pool = pool().await;
        let repo = ListRepo::new(&pool);
        let list = repo.create(&named("Old")).await.unwrap();

        let updated = repo.update(list.id, &named("New")).await.unwrap();
        assert_eq!(updated.id, list.id);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.created_at, list.created_at);
        assert_eq!(repo.find(list.id).await.unwrap().name, "New");
    }

    #[tokio::test]
    async fn update_rejects_blank_and_keeps_stored_name() {
        let pool = pool().await;
        let repo = ListRepo::new(&pool);
        let list = repo.create(&named("Keep me")).await.unwrap();

        let err = repo.update(list.id, &named("")).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(repo.find(list.id).await.unwrap().name, "Keep me");
    }

    #[tokio::test]
    async fn update_without_name_is_noop() {
        let pool = pool().await;
        let repo = ListRepo::new(&pool);
        let list = repo.create(&named("Same")).await.unwrap();

        let unchanged = repo.update(list.id, &ListParams::default()).await.unwrap();
        assert_eq!(unchanged, list);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let pool = pool().await;
        let err = ListRepo::new(&pool)
            .update(7, &named("Nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn destroy_removes_row() {
        let pool = pool().await;
        let repo = ListRepo::new(&pool);
        let keep = repo.create(&named("keep")).await.unwrap();
        let gone = repo.create(&named("gone")).await.unwrap();

        let removed = repo.destroy(gone.id).await.unwrap();
        assert_eq!(removed.name, "gone");
        assert!(matches!(repo.find(gone.id).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.destroy(gone.id).await, Err(DbError::NotFound { .. })));
        assert_eq!(repo.all().await.unwrap(), vec![keep]);
    }
}
