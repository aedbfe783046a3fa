use crate::{Error, error::Result};
use futures::TryStreamExt as _;
use sqlx::Pool;
use time::{Date, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

/// Persisted book record.
///
/// Rows with `deleted_at` set are soft deleted and invisible to every
/// repository operation.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub published_date: Date,
    pub image_url: String,
    pub description: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

/// Caller supplied part of [`Book`], identity and timestamps are managed by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct BookData {
    pub title: String,
    pub author: String,
    pub published_date: Date,
    pub image_url: String,
    pub description: String,
}

const LIST_SQL: &str = r#"
SELECT id, title, author, published_date, image_url, description, created_at, updated_at, deleted_at
FROM book
WHERE deleted_at IS NULL
ORDER BY rowid
"#;

const GET_SQL: &str = r#"
SELECT id, title, author, published_date, image_url, description, created_at, updated_at, deleted_at
FROM book
WHERE deleted_at IS NULL AND id = ?
"#;

pub type BookRepository = BookRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct BookRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> BookRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// All live books in insertion order.
    pub async fn list(&self) -> Result<Vec<Book>> {
        let records = sqlx::query_as::<_, Book>(LIST_SQL)
            .fetch(&self.executor)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    pub async fn create(&self, id: Uuid, payload: &BookData) -> Result<u64> {
        let now = OffsetDateTime::now_utc();
        let result = sqlx::query(
            r#"INSERT INTO book (id, title, author, published_date, image_url, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(payload.published_date)
        .bind(&payload.image_url)
        .bind(&payload.description)
        .bind(now)
        .bind(now)
        .execute(&self.executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn get(&self, id: Uuid) -> Result<Book> {
        sqlx::query_as::<_, Book>(GET_SQL)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| {
                debug!("Book {id} not found");
                Error::RecordNotFound("Book".to_string())
            })
    }

    /// Returns number of updated rows, zero when there is no live book with this id.
    pub async fn update(&self, id: Uuid, payload: &BookData) -> Result<u64> {
        let result = sqlx::query(
            r#"UPDATE book SET title = ?, author = ?, published_date = ?, image_url = ?, description = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL"#,
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(payload.published_date)
        .bind(&payload.image_url)
        .bind(&payload.description)
        .bind(OffsetDateTime::now_utc())
        .bind(id)
        .execute(&self.executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Soft delete, the row stays in the table with `deleted_at` set.
    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result =
            sqlx::query("UPDATE book SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
                .bind(OffsetDateTime::now_utc())
                .bind(id)
                .execute(&self.executor)
                .await?;

        Ok(result.rows_affected())
    }
}
