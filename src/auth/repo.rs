use serde::{Deserialize, Serialize};
use sqlx::{FromRow, MySqlPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
}

impl User {
    /// Find a user by exact email match.
    pub async fn find_by_email(db: &MySqlPool, email: &str) -> sqlx::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password AS password_hash, phone
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert a new user with an already-hashed password. Returns the
    /// store-assigned id. The unique constraint on email is the only
    /// duplicate check.
    pub async fn create(
        db: &MySqlPool,
        name: &str,
        email: &str,
        password_hash: &str,
        phone: &str,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password, phone)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .execute(db)
        .await?;
        Ok(result.last_insert_id())
    }
}
