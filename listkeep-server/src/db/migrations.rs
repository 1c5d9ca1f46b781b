//! Versioned schema migrations
//!
//! Migrations are listed in strictly increasing version order. Pending ones
//! are applied in one transaction and recorded in `schema_migrations`.

use chrono::Utc;
use sqlx::SqlitePool;

use super::repos::DbError;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 20240330120000,
        name: "create_lists",
        sql: r#"
        CREATE TABLE lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    },
    Migration {
        version: 20240401053540,
        name: "create_items",
        sql: r#"
        CREATE TABLE items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    },
];

/// Outcome of a migration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Versions applied during this run, oldest first
    pub applied: Vec<i64>,
    /// Schema version after the run
    pub current: i64,
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Apply all pending migrations.
pub async fn run(pool: &SqlitePool) -> Result<MigrationReport, DbError> {
    ensure_ledger(pool).await?;

    let current = current_version(pool).await?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    let mut applied = Vec::new();
    if current == latest {
        tracing::debug!(version = current, "schema up to date");
        return Ok(MigrationReport { applied, current });
    }

    let mut tx = pool.begin().await?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tracing::info!(
            version = migration.version,
            name = migration.name,
            "applying migration"
        );
        sqlx::query(migration.sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        applied.push(migration.version);
    }
    tx.commit().await?;

    Ok(MigrationReport {
        applied,
        current: latest,
    })
}

/// Versions recorded as applied, oldest first.
pub async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>, DbError> {
    ensure_ledger(pool).await?;
    let versions: Vec<i64> = sqlx::query_scalar("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await?;
    Ok(versions)
}

async fn ensure_ledger(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn current_version(pool: &SqlitePool) -> Result<i64, DbError> {
    let version: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_in_memory_pool;
    use crate::models::Item;

    #[test]
    fn versions_are_strictly_increasing() {
        assert!(MIGRATIONS.windows(2).all(|w| w[0].version < w[1].version));
        assert_eq!(latest_version(), 20240401053540);
    }

    #[tokio::test]
    async fn applies_all_then_noop() {
        let pool = create_in_memory_pool().await.unwrap();

        let first = run(&pool).await.unwrap();
        assert_eq!(first.applied, vec![20240330120000, 20240401053540]);
        assert_eq!(first.current, latest_version());

        let second = run(&pool).await.unwrap();
        assert!(second.applied.is_empty());
        assert_eq!(second.current, latest_version());

        assert_eq!(
            applied_versions(&pool).await.unwrap(),
            vec![20240330120000, 20240401053540]
        );
    }

    #[tokio::test]
    async fn items_title_is_required() {
        let pool = create_in_memory_pool().await.unwrap();
        run(&pool).await.unwrap();

        let missing_title = sqlx::query(
            "INSERT INTO items (title, created_at, updated_at) VALUES (NULL, ?, ?)",
        )
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&pool)
        .await;
        assert!(missing_title.is_err());

        let now = Utc::now();
        sqlx::query("INSERT INTO items (title, created_at, updated_at) VALUES (?, ?, ?)")
            .bind("Milk")
            .bind(now)
            .bind(now)
            .execute(&pool)
            .await
            .unwrap();

        let item: Item = sqlx::query_as("SELECT id, title, created_at, updated_at FROM items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(item.title, "Milk");
    }

    #[tokio::test]
    async fn rejects_newer_schema() {
        let pool = create_in_memory_pool().await.unwrap();
        run(&pool).await.unwrap();
        sqlx::query("INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)")
            .bind(latest_version() + 1)
            .bind("from_the_future")
            .bind(Utc::now())
            .execute(&pool)
            .await
            .unwrap();

        let err = run(&pool).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::UnsupportedSchemaVersion { latest_supported, .. } if latest_supported == latest_version()
        ));
    }
}
