use tracing::{info, warn};

use crate::domain::access::{authorize_admin, Caller, CallerRole};
use crate::domain::commands::directory::{CreateDepartmentCommand, CreateDoctorCommand};
use crate::domain::errors::{QueueError, QueueResult};
use crate::domain::models::department::Department;
use crate::domain::models::doctor::{Doctor, NewDoctor};
use crate::storage::{DepartmentRepository, DoctorRepository};

const MAX_NAME_LEN: usize = 100;
const MAX_ROOM_LEN: usize = 10;

/// Service for departments, doctors and caller roles
#[derive(Clone)]
pub struct DirectoryService {
    departments: DepartmentRepository,
    doctors: DoctorRepository,
}

impl DirectoryService {
    pub fn new(departments: DepartmentRepository, doctors: DoctorRepository) -> Self {
        Self { departments, doctors }
    }

    /// Work out what the caller is: the admin flag wins, then a linked doctor account
    pub async fn resolve_role(&self, caller: &Caller) -> QueueResult<CallerRole> {
        if caller.is_admin {
            return Ok(CallerRole::Administrator);
        }
        match self.doctors.find_by_account(&caller.account).await? {
            Some(doctor) => Ok(CallerRole::Doctor(doctor.id)),
            None => Ok(CallerRole::Staff),
        }
    }

    pub async fn list_departments(&self) -> QueueResult<Vec<Department>> {
        let departments = self.departments.list_departments().await?;
        info!("Found {} departments", departments.len());
        Ok(departments)
    }

    pub async fn create_department(
        &self,
        role: CallerRole,
        command: CreateDepartmentCommand,
    ) -> QueueResult<Department> {
        authorize_admin(role).require("Only administrators can manage departments")?;
        let name = validate_text("Department name", &command.name, MAX_NAME_LEN)?;

        let department = self.departments.store_department(&name).await?;
        info!("Created department {} with ID {}", department.name, department.id);
        Ok(department)
    }

    /// Delete a department together with its doctors and their appointments
    pub async fn delete_department(&self, role: CallerRole, department_id: i64) -> QueueResult<()> {
        authorize_admin(role).require("Only administrators can manage departments")?;

        if !self.departments.delete_department(department_id).await? {
            warn!("Department not found: {}", department_id);
            return Err(QueueError::not_found("Department", department_id));
        }
        info!("Deleted department {}", department_id);
        Ok(())
    }

    pub async fn list_doctors(&self, department_id: Option<i64>) -> QueueResult<Vec<Doctor>> {
        let doctors = self.doctors.list_doctors(department_id).await?;
        info!("Found {} doctors (department filter: {:?})", doctors.len(), department_id);
        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> QueueResult<Doctor> {
        self.doctors
            .get_doctor(doctor_id)
            .await?
            .ok_or_else(|| QueueError::not_found("Doctor", doctor_id))
    }

    pub async fn create_doctor(
        &self,
        role: CallerRole,
        command: CreateDoctorCommand,
    ) -> QueueResult<Doctor> {
        authorize_admin(role).require("Only administrators can manage doctors")?;

        let name = validate_text("Doctor name", &command.name, MAX_NAME_LEN)?;
        let room_number = validate_text("Room number", &command.room_number, MAX_ROOM_LEN)?;
        let account = match command.account.as_deref().map(str::trim) {
            Some(account) if !account.is_empty() => Some(account.to_string()),
            _ => None,
        };

        if self.departments.get_department(command.department_id).await?.is_none() {
            return Err(QueueError::not_found("Department", command.department_id));
        }
        if let Some(account) = &account {
            if let Some(existing) = self.doctors.find_by_account(account).await? {
                return Err(QueueError::Validation(format!(
                    "Account {} is already linked to Dr. {}",
                    account, existing.name
                )));
            }
        }

        let id = self
            .doctors
            .store_doctor(&NewDoctor {
                name,
                department_id: command.department_id,
                room_number,
                account,
            })
            .await?;
        info!("Created doctor with ID {}", id);
        self.get_doctor(id).await
    }

    /// Delete a doctor together with their appointments
    pub async fn delete_doctor(&self, role: CallerRole, doctor_id: i64) -> QueueResult<()> {
        authorize_admin(role).require("Only administrators can manage doctors")?;

        if !self.doctors.delete_doctor(doctor_id).await? {
            warn!("Doctor not found: {}", doctor_id);
            return Err(QueueError::not_found("Doctor", doctor_id));
        }
        info!("Deleted doctor {}", doctor_id);
        Ok(())
    }
}

fn validate_text(field: &str, value: &str, max_len: usize) -> QueueResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QueueError::Validation(format!("{} cannot be empty", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(QueueError::Validation(format!(
            "{} cannot exceed {} characters",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}
