use shared::{Department, Doctor};

use crate::domain::models::department::Department as DomainDepartment;
use crate::domain::models::doctor::Doctor as DomainDoctor;

pub struct DepartmentMapper;

impl DepartmentMapper {
    pub fn to_dto(domain: DomainDepartment) -> Department {
        Department {
            id: domain.id,
            name: domain.name,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainDepartment>) -> Vec<Department> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}

pub struct DoctorMapper;

impl DoctorMapper {
    pub fn to_dto(domain: DomainDoctor) -> Doctor {
        Doctor {
            id: domain.id,
            name: domain.name,
            department_id: domain.department_id,
            department_name: domain.department_name,
            room_number: domain.room_number,
            account: domain.account,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainDoctor>) -> Vec<Doctor> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
