use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::SessionSigner;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub signer: SessionSigner,
}

/* -------------------------
   Domain enums
--------------------------*/

/// Caller classification. "admin" sees every appointment, "doctor" only
/// their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
        }
    }

    /// Capitalized form used in login error messages ("Doctor not found...").
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Doctor => "Doctor",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            other => Err(format!(
                "Invalid role '{other}'. Accepted values are 'doctor' or 'admin'."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Man,
    Woman,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Man => "Man",
            Gender::Woman => "Woman",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Man" => Ok(Gender::Man),
            "Woman" => Ok(Gender::Woman),
            "Other" => Ok(Gender::Other),
            other => Err(format!("unknown gender '{other}'")),
        }
    }
}

/// The eight ABO/Rh combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APos,
    #[serde(rename = "A-")]
    ANeg,
    #[serde(rename = "B+")]
    BPos,
    #[serde(rename = "B-")]
    BNeg,
    #[serde(rename = "AB+")]
    AbPos,
    #[serde(rename = "AB-")]
    AbNeg,
    #[serde(rename = "O+")]
    OPos,
    #[serde(rename = "O-")]
    ONeg,
}

impl BloodGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APos => "A+",
            BloodGroup::ANeg => "A-",
            BloodGroup::BPos => "B+",
            BloodGroup::BNeg => "B-",
            BloodGroup::AbPos => "AB+",
            BloodGroup::AbNeg => "AB-",
            BloodGroup::OPos => "O+",
            BloodGroup::ONeg => "O-",
        }
    }
}

impl FromStr for BloodGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A+" => Ok(BloodGroup::APos),
            "A-" => Ok(BloodGroup::ANeg),
            "B+" => Ok(BloodGroup::BPos),
            "B-" => Ok(BloodGroup::BNeg),
            "AB+" => Ok(BloodGroup::AbPos),
            "AB-" => Ok(BloodGroup::AbNeg),
            "O+" => Ok(BloodGroup::OPos),
            "O-" => Ok(BloodGroup::ONeg),
            other => Err(format!("unknown blood group '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    #[serde(rename = "Non Urgent")]
    NonUrgent,
    Urgent,
    Emergency,
    #[serde(rename = "Pass Away")]
    PassAway,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::NonUrgent => "Non Urgent",
            AppointmentStatus::Urgent => "Urgent",
            AppointmentStatus::Emergency => "Emergency",
            AppointmentStatus::PassAway => "Pass Away",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Non Urgent" => Ok(AppointmentStatus::NonUrgent),
            "Urgent" => Ok(AppointmentStatus::Urgent),
            "Emergency" => Ok(AppointmentStatus::Emergency),
            "Pass Away" => Ok(AppointmentStatus::PassAway),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/* -------------------------
   Records
--------------------------*/

/// A scheduled patient visit, owned by exactly one doctor.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub disease: String,
    pub blood: BloodGroup,
    pub time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub location: String,
    pub doctor_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields of an appointment; also the full-replace update payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub disease: String,
    pub blood: BloodGroup,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub status: AppointmentStatus,
    pub location: String,
    pub doctor_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct DoctorRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub specialization: String,
}

#[derive(Debug, Clone)]
pub struct AdminRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/* -------------------------
   API DTOs
--------------------------*/

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

/// Identity claim carried by the signed session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub id: Uuid,
}

/// Appointment as returned to the dashboard: the doctor reference is
/// replaced by the doctor's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub disease: String,
    pub blood: BloodGroup,
    pub time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub location: String,
    pub doctor_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppointmentView {
    pub fn from_record(a: &Appointment, doctor_name: String) -> Self {
        AppointmentView {
            id: a.id,
            name: a.name.clone(),
            age: a.age,
            gender: a.gender,
            disease: a.disease.clone(),
            blood: a.blood,
            time: a.time,
            status: a.status,
            location: a.location.clone(),
            doctor_name,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Doctor as exposed over the API. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialization: String,
}

impl From<&DoctorRecord> for DoctorProfile {
    fn from(d: &DoctorRecord) -> Self {
        DoctorProfile {
            id: d.id,
            name: d.name.clone(),
            email: d.email.clone(),
            specialization: d.specialization.clone(),
        }
    }
}
