use anyhow::Result;
use sqlx::Row;

use crate::domain::models::department::Department;
use crate::storage::connection::DbConnection;

/// Repository for department operations
#[derive(Clone)]
pub struct DepartmentRepository {
    db: DbConnection,
}

impl DepartmentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a department and return it with its new id
    pub async fn store_department(&self, name: &str) -> Result<Department> {
        let result = sqlx::query(
            r#"
            INSERT INTO departments (name)
            VALUES (?)
            "#,
        )
        .bind(name)
        .execute(self.db.pool())
        .await?;

        Ok(Department {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Get a department by ID
    pub async fn get_department(&self, department_id: i64) -> Result<Option<Department>> {
        let row = sqlx::query(
            r#"
            SELECT id, name
            FROM departments
            WHERE id = ?
            "#,
        )
        .bind(department_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| Department {
            id: r.get("id"),
            name: r.get("name"),
        }))
    }

    /// List all departments ordered by name
    pub async fn list_departments(&self) -> Result<Vec<Department>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name
            FROM departments
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .iter()
            .map(|row| Department {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Delete a department; its doctors and their appointments go with it.
    /// Returns false when no such department exists.
    pub async fn delete_department(&self, department_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM departments WHERE id = ?")
            .bind(department_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
