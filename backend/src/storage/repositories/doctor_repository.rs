use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::doctor::{Doctor, NewDoctor};
use crate::storage::connection::DbConnection;

const DOCTOR_COLUMNS: &str = r#"
    SELECT doc.id, doc.name, doc.department_id, dep.name AS department_name,
           doc.room_number, doc.account
    FROM doctors doc
    JOIN departments dep ON dep.id = doc.department_id
"#;

/// Repository for doctor operations
#[derive(Clone)]
pub struct DoctorRepository {
    db: DbConnection,
}

impl DoctorRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn doctor_from_row(row: &SqliteRow) -> Doctor {
        Doctor {
            id: row.get("id"),
            name: row.get("name"),
            department_id: row.get("department_id"),
            department_name: row.get("department_name"),
            room_number: row.get("room_number"),
            account: row.get("account"),
        }
    }

    /// Store a doctor and return its new id
    pub async fn store_doctor(&self, doctor: &NewDoctor) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO doctors (name, department_id, room_number, account)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&doctor.name)
        .bind(doctor.department_id)
        .bind(&doctor.room_number)
        .bind(&doctor.account)
        .execute(self.db.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a doctor by ID
    pub async fn get_doctor(&self, doctor_id: i64) -> Result<Option<Doctor>> {
        let row = sqlx::query(&format!("{} WHERE doc.id = ?", DOCTOR_COLUMNS))
            .bind(doctor_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.as_ref().map(Self::doctor_from_row))
    }

    /// Find the doctor linked to a login account
    pub async fn find_by_account(&self, account: &str) -> Result<Option<Doctor>> {
        let row = sqlx::query(&format!("{} WHERE doc.account = ?", DOCTOR_COLUMNS))
            .bind(account)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.as_ref().map(Self::doctor_from_row))
    }

    /// List doctors ordered by ID, optionally limited to one department
    pub async fn list_doctors(&self, department_id: Option<i64>) -> Result<Vec<Doctor>> {
        let rows = match department_id {
            Some(department_id) => {
                sqlx::query(&format!(
                    "{} WHERE doc.department_id = ? ORDER BY doc.id ASC",
                    DOCTOR_COLUMNS
                ))
                .bind(department_id)
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query(&format!("{} ORDER BY doc.id ASC", DOCTOR_COLUMNS))
                    .fetch_all(self.db.pool())
                    .await?
            }
        };
        Ok(rows.iter().map(Self::doctor_from_row).collect())
    }

    pub async fn count_doctors(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS doctor_count FROM doctors")
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.get("doctor_count"))
    }

    /// Delete a doctor; their appointments and token counters go with them.
    /// Returns false when no such doctor exists.
    pub async fn delete_doctor(&self, doctor_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = ?")
            .bind(doctor_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repositories::DepartmentRepository;

    struct TestHelper {
        departments: DepartmentRepository,
        doctors: DoctorRepository,
    }

    async fn setup_test() -> TestHelper {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        TestHelper {
            departments: DepartmentRepository::new(db.clone()),
            doctors: DoctorRepository::new(db),
        }
    }

    fn new_doctor(name: &str, department_id: i64, account: Option<&str>) -> NewDoctor {
        NewDoctor {
            name: name.to_string(),
            department_id,
            room_number: "12".to_string(),
            account: account.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_doctor_with_department_name() {
        let helper = setup_test().await;
        let cardiology = helper.departments.store_department("Cardiology").await.unwrap();

        let id = helper
            .doctors
            .store_doctor(&new_doctor("Mehta", cardiology.id, Some("dr.mehta")))
            .await
            .expect("Failed to store doctor");

        let doctor = helper.doctors.get_doctor(id).await.unwrap().expect("Doctor missing");
        assert_eq!(doctor.name, "Mehta");
        assert_eq!(doctor.department_name, "Cardiology");
        assert_eq!(doctor.account.as_deref(), Some("dr.mehta"));
    }

    #[tokio::test]
    async fn test_find_by_account() {
        let helper = setup_test().await;
        let dep = helper.departments.store_department("ENT").await.unwrap();
        let id = helper
            .doctors
            .store_doctor(&new_doctor("Iyer", dep.id, Some("iyer")))
            .await
            .unwrap();
        helper.doctors.store_doctor(&new_doctor("Khan", dep.id, None)).await.unwrap();

        let found = helper.doctors.find_by_account("iyer").await.unwrap();
        assert_eq!(found.map(|d| d.id), Some(id));
        assert!(helper.doctors.find_by_account("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_account_is_unique() {
        let helper = setup_test().await;
        let dep = helper.departments.store_department("ENT").await.unwrap();
        helper
            .doctors
            .store_doctor(&new_doctor("Iyer", dep.id, Some("shared")))
            .await
            .unwrap();

        let duplicate = helper
            .doctors
            .store_doctor(&new_doctor("Khan", dep.id, Some("shared")))
            .await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_list_doctors_by_department() {
        let helper = setup_test().await;
        let ent = helper.departments.store_department("ENT").await.unwrap();
        let ortho = helper.departments.store_department("Orthopedics").await.unwrap();
        helper.doctors.store_doctor(&new_doctor("A", ent.id, None)).await.unwrap();
        helper.doctors.store_doctor(&new_doctor("B", ortho.id, None)).await.unwrap();
        helper.doctors.store_doctor(&new_doctor("C", ent.id, None)).await.unwrap();

        let all = helper.doctors.list_doctors(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(helper.doctors.count_doctors().await.unwrap(), 3);

        let ent_doctors: Vec<String> = helper
            .doctors
            .list_doctors(Some(ent.id))
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(ent_doctors, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_deleting_department_removes_its_doctors() {
        let helper = setup_test().await;
        let ent = helper.departments.store_department("ENT").await.unwrap();
        let id = helper.doctors.store_doctor(&new_doctor("A", ent.id, None)).await.unwrap();

        helper.departments.delete_department(ent.id).await.unwrap();

        assert!(helper.doctors.get_doctor(id).await.unwrap().is_none());
        assert_eq!(helper.doctors.count_doctors().await.unwrap(), 0);
    }
}
