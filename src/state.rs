use std::sync::Arc;

use anyhow::Context;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: MySqlPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = MySqlPoolOptions::new()
            .max_connections(10)
            .connect(&config.database.url())
            .await
            .context("connect to database")?;
        Ok(Self { db, config })
    }

    pub fn from_parts(db: MySqlPool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use crate::config::{DatabaseConfig, JwtConfig};

    let database = DatabaseConfig {
        host: "localhost".into(),
        user: "root".into(),
        password: String::new(),
        database: "student_housing".into(),
        port: 3306,
    };
    // Lazy pool: never touches a real server during unit tests.
    let db = MySqlPoolOptions::new()
        .connect_lazy(&database.url())
        .expect("lazy pool should construct");
    let config = Arc::new(AppConfig {
        database,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            ttl_hours: 24,
        },
        port: 5000,
    });
    AppState::from_parts(db, config)
}
