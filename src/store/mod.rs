//! Persistence seam. Route handlers only ever see `Arc<dyn Store>`, so the
//! Postgres adapter and the in-memory adapter are interchangeable.

pub mod mem;
pub mod pg;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{AdminRecord, AppointmentView, DoctorProfile, DoctorRecord, NewAppointment};
use crate::query::{FilterCriteria, Scope};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    ForeignKey(String),
    #[error("storage error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub specialization: String,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Persist a new appointment. The doctor reference must resolve;
    /// otherwise this is a `ForeignKey` error.
    async fn create_appointment(&self, new: NewAppointment) -> Result<Uuid, StoreError>;

    /// Full replace of all mutable fields. `NotFound` if the id is unknown.
    async fn update_appointment(
        &self,
        id: Uuid,
        new: NewAppointment,
    ) -> Result<AppointmentView, StoreError>;

    /// `NotFound` if the id is unknown, on every call.
    async fn delete_appointment(&self, id: Uuid) -> Result<(), StoreError>;

    /// The filtered (never paginated) set visible to the caller, each row
    /// annotated with the doctor's display name, ordered by scheduled time.
    async fn list_appointments(
        &self,
        filter: &FilterCriteria,
        scope: &Scope,
    ) -> Result<Vec<AppointmentView>, StoreError>;

    /// `Duplicate` if the (lowercase-normalized) email is taken.
    async fn create_admin(&self, new: NewAdmin) -> Result<Uuid, StoreError>;

    /// `Duplicate` if the (lowercase-normalized) email is taken.
    async fn create_doctor(&self, new: NewDoctor) -> Result<Uuid, StoreError>;

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminRecord>, StoreError>;

    async fn find_doctor_by_email(&self, email: &str) -> Result<Option<DoctorRecord>, StoreError>;

    /// Case-insensitive substring match against doctor name or
    /// specialization; `None` returns every doctor.
    async fn search_doctors(&self, term: Option<&str>) -> Result<Vec<DoctorProfile>, StoreError>;
}
