use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::appointment::{Appointment, AppointmentDraft, AppointmentStatus};
use crate::domain::models::workload::DepartmentWorkload;
use crate::storage::connection::DbConnection;

const APPOINTMENT_COLUMNS: &str = r#"
    SELECT a.id, a.patient_name, a.age, a.doctor_id, doc.name AS doctor_name,
           a.token_number, a.is_emergency, a.status, a.registration_time,
           a.registration_day, a.estimated_time
    FROM appointments a
    JOIN doctors doc ON doc.id = a.doctor_id
"#;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Timestamps are stored as fixed-width UTC strings so that text order is time order
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid stored timestamp: {}", value))?
        .with_timezone(&Utc))
}

fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Repository for appointment operations
#[derive(Clone)]
pub struct AppointmentRepository {
    db: DbConnection,
}

impl AppointmentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn appointment_from_row(row: &SqliteRow) -> Result<Appointment> {
        let status: String = row.get("status");
        let day: String = row.get("registration_day");
        let registration_time: String = row.get("registration_time");
        let estimated_time: String = row.get("estimated_time");

        Ok(Appointment {
            id: row.get("id"),
            patient_name: row.get("patient_name"),
            age: row.get::<i64, _>("age") as u32,
            doctor_id: row.get("doctor_id"),
            doctor_name: row.get("doctor_name"),
            token_number: row.get::<i64, _>("token_number") as u32,
            is_emergency: row.get("is_emergency"),
            status: status.parse().map_err(anyhow::Error::msg)?,
            registration_time: parse_timestamp(&registration_time)?,
            registration_day: NaiveDate::parse_from_str(&day, DAY_FORMAT)
                .with_context(|| format!("Invalid stored day: {}", day))?,
            estimated_time: parse_timestamp(&estimated_time)?,
        })
    }

    fn appointments_from_rows(rows: &[SqliteRow]) -> Result<Vec<Appointment>> {
        rows.iter().map(Self::appointment_from_row).collect()
    }

    /// Register an appointment with the next token of its doctor's day.
    ///
    /// The token counter upsert, the pending count and the insert run in one
    /// transaction, so two concurrent registrations can never share a token.
    /// `estimate` receives the number of pending patients already waiting for
    /// the doctor that day and returns the estimated consultation time.
    pub async fn insert_with_next_token<F>(
        &self,
        draft: &AppointmentDraft,
        estimate: F,
    ) -> Result<Appointment>
    where
        F: FnOnce(u32) -> DateTime<Utc>,
    {
        let day = format_day(draft.registration_day);
        let mut tx = self.db.pool().begin().await?;

        // Write first so the transaction holds the write lock from the start
        let token: i64 = sqlx::query(
            r#"
            INSERT INTO token_counters (doctor_id, day, last_token)
            VALUES (?, ?, (
                SELECT COUNT(*) FROM appointments
                WHERE doctor_id = ? AND registration_day = ?
            ) + 1)
            ON CONFLICT (doctor_id, day) DO UPDATE SET last_token = last_token + 1
            RETURNING last_token
            "#,
        )
        .bind(draft.doctor_id)
        .bind(&day)
        .bind(draft.doctor_id)
        .bind(&day)
        .fetch_one(&mut *tx)
        .await?
        .get("last_token");

        let pending_ahead: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) AS pending_count
            FROM appointments
            WHERE doctor_id = ? AND registration_day = ? AND status = 'Pending'
            "#,
        )
        .bind(draft.doctor_id)
        .bind(&day)
        .fetch_one(&mut *tx)
        .await?
        .get("pending_count");

        let estimated_time = estimate(pending_ahead as u32);

        let result = sqlx::query(
            r#"
            INSERT INTO appointments (
                patient_name, age, doctor_id, token_number, is_emergency, status,
                registration_time, registration_day, estimated_time
            )
            VALUES (?, ?, ?, ?, ?, 'Pending', ?, ?, ?)
            "#,
        )
        .bind(&draft.patient_name)
        .bind(draft.age as i64)
        .bind(draft.doctor_id)
        .bind(token)
        .bind(draft.is_emergency)
        .bind(format_timestamp(&draft.registration_time))
        .bind(&day)
        .bind(format_timestamp(&estimated_time))
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        let row = sqlx::query(&format!("{} WHERE a.id = ?", APPOINTMENT_COLUMNS))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let appointment = Self::appointment_from_row(&row)?;

        tx.commit().await?;
        Ok(appointment)
    }

    /// Get an appointment by ID
    pub async fn get_appointment(&self, appointment_id: i64) -> Result<Option<Appointment>> {
        let row = sqlx::query(&format!("{} WHERE a.id = ?", APPOINTMENT_COLUMNS))
            .bind(appointment_id)
            .fetch_optional(self.db.pool())
            .await?;
        row.as_ref().map(Self::appointment_from_row).transpose()
    }

    /// Pending appointments of one doctor registered on `day`,
    /// emergencies first, then by registration time
    pub async fn list_active_for_doctor(
        &self,
        doctor_id: i64,
        day: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        let rows = sqlx::query(&format!(
            r#"{}
            WHERE a.doctor_id = ? AND a.registration_day = ? AND a.status = 'Pending'
            ORDER BY a.is_emergency DESC, a.registration_time ASC, a.id ASC
            "#,
            APPOINTMENT_COLUMNS
        ))
        .bind(doctor_id)
        .bind(format_day(day))
        .fetch_all(self.db.pool())
        .await?;
        Self::appointments_from_rows(&rows)
    }

    /// Every appointment registered on `day`, oldest first
    pub async fn list_for_day(&self, day: NaiveDate) -> Result<Vec<Appointment>> {
        let rows = sqlx::query(&format!(
            r#"{}
            WHERE a.registration_day = ?
            ORDER BY a.registration_time ASC, a.id ASC
            "#,
            APPOINTMENT_COLUMNS
        ))
        .bind(format_day(day))
        .fetch_all(self.db.pool())
        .await?;
        Self::appointments_from_rows(&rows)
    }

    /// Case-insensitive patient name match, or an exact token match when
    /// `token` is given. Covers every day and status, newest first.
    /// SQLite's `lower()` folds ASCII only, so "josé" does not match "JOSÉ".
    pub async fn search(&self, name_fragment: &str, token: Option<u32>) -> Result<Vec<Appointment>> {
        let rows = sqlx::query(&format!(
            r#"{}
            WHERE instr(lower(a.patient_name), lower(?)) > 0
               OR (? IS NOT NULL AND a.token_number = ?)
            ORDER BY a.registration_time DESC, a.id DESC
            "#,
            APPOINTMENT_COLUMNS
        ))
        .bind(name_fragment)
        .bind(token.map(i64::from))
        .bind(token.map(i64::from))
        .fetch_all(self.db.pool())
        .await?;
        Self::appointments_from_rows(&rows)
    }

    /// Move the given Pending appointments to `status` in one transaction.
    /// Returns the ids that were actually changed.
    pub async fn update_pending_status(
        &self,
        appointment_ids: &[i64],
        status: AppointmentStatus,
    ) -> Result<Vec<i64>> {
        let mut tx = self.db.pool().begin().await?;
        let mut updated = Vec::new();

        for id in appointment_ids {
            let result = sqlx::query(
                "UPDATE appointments SET status = ? WHERE id = ? AND status = 'Pending'",
            )
            .bind(status.as_str())
            .bind(*id)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() > 0 {
                updated.push(*id);
            }
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Number of appointments registered on `day` with the given status
    pub async fn count_for_day(&self, day: NaiveDate, status: AppointmentStatus) -> Result<i64> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS appointment_count
            FROM appointments
            WHERE registration_day = ? AND status = ?
            "#,
        )
        .bind(format_day(day))
        .bind(status.as_str())
        .fetch_one(self.db.pool())
        .await?;
        Ok(row.get("appointment_count"))
    }

    /// Per-department status counts for `day`, busiest department first.
    /// Departments without appointments are included with zero counts.
    pub async fn department_counts(&self, day: NaiveDate) -> Result<Vec<DepartmentWorkload>> {
        let rows = sqlx::query(
            r#"
            SELECT dep.id AS department_id, dep.name AS department_name,
                   COALESCE(SUM(CASE WHEN a.status = 'Pending' THEN 1 ELSE 0 END), 0) AS pending_count,
                   COALESCE(SUM(CASE WHEN a.status = 'Consulted' THEN 1 ELSE 0 END), 0) AS consulted_count,
                   COALESCE(SUM(CASE WHEN a.status = 'Cancelled' THEN 1 ELSE 0 END), 0) AS cancelled_count
            FROM departments dep
            LEFT JOIN doctors doc ON doc.department_id = dep.id
            LEFT JOIN appointments a ON a.doctor_id = doc.id AND a.registration_day = ?
            GROUP BY dep.id, dep.name
            ORDER BY pending_count DESC, dep.id ASC
            "#,
        )
        .bind(format_day(day))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .iter()
            .map(|row| DepartmentWorkload {
                department_id: row.get("department_id"),
                department_name: row.get("department_name"),
                pending_count: row.get("pending_count"),
                consulted_count: row.get("consulted_count"),
                cancelled_count: row.get("cancelled_count"),
            })
            .collect())
    }
}
