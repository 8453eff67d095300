//! PostgreSQL row store.

use super::{StoreError, UserStore};
use async_trait::async_trait;
use roster_engine::{NewUser, RowId, UserPatch, UserRecord};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

/// Type alias for the database pool.
pub type Pool = PgPool;

/// A stored user row from the database.
#[derive(Debug)]
struct StoredUser {
    id: i64,
    name: String,
    age: i32,
    email: String,
    last_updated: chrono::DateTime<chrono::Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for StoredUser {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(StoredUser {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            age: row.try_get("age")?,
            email: row.try_get("email")?,
            last_updated: row.try_get("last_updated")?,
        })
    }
}

impl From<StoredUser> for UserRecord {
    fn from(stored: StoredUser) -> Self {
        UserRecord {
            id: stored.id,
            name: stored.name,
            age: stored.age,
            email: stored.email,
            last_updated: stored.last_updated,
        }
    }
}

/// Row store backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: Pool,
}

impl PgUserStore {
    /// Wrap an existing pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        // Connection returns to the pool when `conn` drops, error or not.
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, StoredUser>(
            r#"
            SELECT id, name, age, email, last_updated
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn insert(&self, user: &NewUser) -> Result<UserRecord, StoreError> {
        let mut conn = self.pool.acquire().await?;

        let stored = sqlx::query_as::<_, StoredUser>(
            r#"
            INSERT INTO users (name, age, email, last_updated)
            VALUES ($1, $2, $3, now())
            RETURNING id, name, age, email, last_updated
            "#,
        )
        .bind(&user.name)
        .bind(user.age)
        .bind(&user.email)
        .fetch_one(&mut *conn)
        .await?;

        Ok(stored.into())
    }

    async fn update(&self, patch: &UserPatch) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;

        let mut query = QueryBuilder::<Postgres>::new("UPDATE users SET last_updated = now()");
        if let Some(name) = &patch.name {
            query.push(", name = ").push_bind(name.clone());
        }
        if let Some(age) = patch.age {
            query.push(", age = ").push_bind(age);
        }
        if let Some(email) = &patch.email {
            query.push(", email = ").push_bind(email.clone());
        }
        query.push(" WHERE id = ").push_bind(patch.id);

        let result = query.build().execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(patch.id));
        }

        Ok(())
    }

    async fn delete(&self, id: RowId) -> Result<u64, StoreError> {
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
