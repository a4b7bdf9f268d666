use crate::domain::blog::NewBlog;
use crate::domain::{Blog, DomainError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self, owner_id: i64, blog: &NewBlog, slug: &str) -> Result<Blog, DomainError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Blog, DomainError>;
    /// Slugs starting with `prefix`.
    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DomainError>;
    async fn delete_by_slug(&self, slug: &str) -> Result<(), DomainError>;
    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Blog>, i64), DomainError>;
    async fn count(&self) -> Result<i64, DomainError>;
}

pub struct SqliteBlogRepository {
    pool: SqlitePool,
}

impl SqliteBlogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn blog_from_row(row: &SqliteRow) -> Result<Blog, DomainError> {
    Ok(Blog {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        slug: row.try_get("slug")?,
        owner_id: row.try_get("owner_id")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl BlogRepository for SqliteBlogRepository {
    async fn create(&self, owner_id: i64, blog: &NewBlog, slug: &str) -> Result<Blog, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO blogs (title, description, slug, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, slug, owner_id, created_at
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.description)
        .bind(slug)
        .bind(owner_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                tracing::debug!("Slug collision on insert: {}", slug);
                DomainError::SlugConflict(slug.to_string())
            }
            _ => {
                tracing::error!("Failed to create blog: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        blog_from_row(&row)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Blog, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, slug, owner_id, created_at
            FROM blogs
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => blog_from_row(&row),
            None => Err(DomainError::BlogNotFound),
        }
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DomainError> {
        // Slugs never contain LIKE wildcards, so `prefix` can be used as-is.
        let rows = sqlx::query(
            r#"
            SELECT slug
            FROM blogs
            WHERE slug LIKE $1
            "#,
        )
        .bind(format!("{}%", prefix))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("slug").map_err(DomainError::from))
            .collect()
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM blogs
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            Err(DomainError::BlogNotFound)
        } else {
            Ok(())
        }
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Blog>, i64), DomainError> {
        let total = self.count().await?;

        // Insertion order; ids are AUTOINCREMENT so they never go backwards.
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, slug, owner_id, created_at
            FROM blogs
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let blogs = rows
            .iter()
            .map(blog_from_row)
            .collect::<Result<Vec<Blog>, DomainError>>()?;

        Ok((blogs, total))
    }

    async fn count(&self) -> Result<i64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM blogs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(row.try_get("count")?)
    }
}
