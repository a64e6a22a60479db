#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub department_id: i64,
    /// Name of the owning department, joined in by the repository
    pub department_name: String,
    pub room_number: String,
    /// Login account linked to this doctor for scoped queue views
    pub account: Option<String>,
}

/// A doctor that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewDoctor {
    pub name: String,
    pub department_id: i64,
    pub room_number: String,
    pub account: Option<String>,
}
