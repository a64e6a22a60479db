use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

/// DbConnection manages the SQLite pool and the schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection, creating the database file if needed
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Open a private in-memory database.
    /// A single long-lived connection keeps the database alive for the pool's lifetime.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS departments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS doctors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                department_id INTEGER NOT NULL,
                room_number TEXT NOT NULL,
                account TEXT UNIQUE,
                FOREIGN KEY (department_id) REFERENCES departments (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_doctors_department_id
            ON doctors(department_id);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS appointments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                patient_name TEXT NOT NULL,
                age INTEGER NOT NULL,
                doctor_id INTEGER NOT NULL,
                token_number INTEGER NOT NULL,
                is_emergency INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'Pending'
                    CHECK (status IN ('Pending', 'Consulted', 'Cancelled')),
                registration_time TEXT NOT NULL,
                registration_day TEXT NOT NULL,
                estimated_time TEXT NOT NULL,
                FOREIGN KEY (doctor_id) REFERENCES doctors (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // One token per doctor per day
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_doctor_day_token
            ON appointments(doctor_id, registration_day, token_number);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_appointments_day_status
            ON appointments(registration_day, status);
            "#,
        )
        .execute(pool)
        .await?;

        // Only the status of an appointment may change after registration
        sqlx::query(
            r#"
            CREATE TRIGGER IF NOT EXISTS trg_appointments_immutable
            BEFORE UPDATE OF patient_name, age, doctor_id, token_number, is_emergency,
                registration_time, registration_day, estimated_time
            ON appointments
            BEGIN
                SELECT RAISE(ABORT, 'appointment fields other than status are immutable');
            END;
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS token_counters (
                doctor_id INTEGER NOT NULL,
                day TEXT NOT NULL,
                last_token INTEGER NOT NULL,
                PRIMARY KEY (doctor_id, day),
                FOREIGN KEY (doctor_id) REFERENCES doctors (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
