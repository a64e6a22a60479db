use shared::{
    Appointment, AppointmentStatus, BulkConsultResponse, CreateAppointmentResponse,
    StatusChangeResponse,
};

use super::format_timestamp;
use crate::domain::commands::queue::BulkConsultResult;
use crate::domain::commands::registration::RegistrationResult;
use crate::domain::models::appointment::{
    Appointment as DomainAppointment, AppointmentStatus as DomainAppointmentStatus,
};

pub struct AppointmentMapper;

impl AppointmentMapper {
    pub fn status_to_dto(status: DomainAppointmentStatus) -> AppointmentStatus {
        match status {
            DomainAppointmentStatus::Pending => AppointmentStatus::Pending,
            DomainAppointmentStatus::Consulted => AppointmentStatus::Consulted,
            DomainAppointmentStatus::Cancelled => AppointmentStatus::Cancelled,
        }
    }

    pub fn to_dto(domain: DomainAppointment) -> Appointment {
        Appointment {
            id: domain.id,
            patient_name: domain.patient_name,
            age: domain.age,
            doctor_id: domain.doctor_id,
            doctor_name: domain.doctor_name,
            token_number: domain.token_number,
            is_emergency: domain.is_emergency,
            status: Self::status_to_dto(domain.status),
            registration_time: format_timestamp(domain.registration_time),
            estimated_time: format_timestamp(domain.estimated_time),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainAppointment>) -> Vec<Appointment> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_registration_response(result: RegistrationResult) -> CreateAppointmentResponse {
        let appointment = Self::to_dto(result.appointment);
        CreateAppointmentResponse {
            token_number: appointment.token_number,
            estimated_time: appointment.estimated_time.clone(),
            estimated_wait_minutes: result.estimated_wait_minutes,
            success_message: format!(
                "Token generated successfully for {}!",
                appointment.patient_name
            ),
            appointment,
        }
    }

    pub fn to_status_change_response(domain: DomainAppointment) -> StatusChangeResponse {
        let success_message = match domain.status {
            DomainAppointmentStatus::Consulted => {
                format!("Patient {} marked as consulted.", domain.patient_name)
            }
            DomainAppointmentStatus::Cancelled => {
                format!("Appointment for {} cancelled.", domain.patient_name)
            }
            DomainAppointmentStatus::Pending => format!("Patient {} is waiting.", domain.patient_name),
        };
        StatusChangeResponse {
            appointment: Self::to_dto(domain),
            success_message,
        }
    }

    pub fn to_bulk_response(result: BulkConsultResult) -> BulkConsultResponse {
        BulkConsultResponse {
            success_message: format!(
                "{} appointments marked as consulted.",
                result.consulted_ids.len()
            ),
            consulted_ids: result.consulted_ids,
            not_found_ids: result.not_found_ids,
            skipped_ids: result.skipped_ids,
        }
    }
}
