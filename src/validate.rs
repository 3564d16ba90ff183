//! Form validation shared by the add-member panel and the write endpoints.
//!
//! Checks run in a fixed order and stop at the first failure; the result is
//! a single human-readable message, never a panic.

use serde::Deserialize;

use crate::models::{NewAppointment, Role};

/// Body of `POST /api/admin` and `POST /api/doctor`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub specialization: Option<String>,
}

/// Email shape check: something before '@', and a domain with a dot.
fn email_is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

/// Fixed precedence: name, email presence, email shape, password presence,
/// password length, then (doctors only) specialization.
pub fn validate_member(kind: Role, form: &MemberForm) -> Result<(), String> {
    if form.name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    if form.email.trim().is_empty() {
        return Err("Email is required".to_string());
    }
    if !email_is_valid(form.email.trim()) {
        return Err("Email is invalid".to_string());
    }
    if form.password.is_empty() {
        return Err("Password is required".to_string());
    }
    if form.password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if kind == Role::Doctor
        && form
            .specialization
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty()
    {
        return Err("Specialization is required for doctors".to_string());
    }
    Ok(())
}

pub fn validate_appointment(payload: &NewAppointment) -> Result<(), String> {
    if payload.name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    if payload.age < 0 {
        return Err("Age must be 0 or greater".to_string());
    }
    if payload.disease.trim().is_empty() {
        return Err("Disease is required".to_string());
    }
    if payload.location.trim().is_empty() {
        return Err("Location is required".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn valid_doctor_form() -> MemberForm {
        MemberForm {
            name: "Dr. Grey".to_string(),
            email: "grey@clinic.example".to_string(),
            password: "longenough".to_string(),
            specialization: Some("Cardiology".to_string()),
        }
    }

    #[test]
    fn accepts_a_complete_doctor_form() {
        assert!(validate_member(Role::Doctor, &valid_doctor_form()).is_ok());
    }

    #[test]
    fn name_error_takes_precedence_over_everything_else() {
        // Blank name, invalid email AND short password: name wins.
        let form = MemberForm {
            name: "".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            specialization: None,
        };
        assert_eq!(
            validate_member(Role::Doctor, &form),
            Err("Name is required".to_string())
        );
    }

    #[test]
    fn email_shape_is_checked_after_presence() {
        let mut form = valid_doctor_form();
        form.email = "".to_string();
        assert_eq!(
            validate_member(Role::Doctor, &form),
            Err("Email is required".to_string())
        );
        form.email = "grey@clinic".to_string(); // no dotted domain
        assert_eq!(
            validate_member(Role::Doctor, &form),
            Err("Email is invalid".to_string())
        );
        form.email = "@clinic.example".to_string();
        assert_eq!(
            validate_member(Role::Doctor, &form),
            Err("Email is invalid".to_string())
        );
    }

    #[test]
    fn password_must_be_present_then_long_enough() {
        let mut form = valid_doctor_form();
        form.password = "".to_string();
        assert_eq!(
            validate_member(Role::Doctor, &form),
            Err("Password is required".to_string())
        );
        form.password = "seven77".to_string();
        assert_eq!(
            validate_member(Role::Doctor, &form),
            Err("Password must be at least 8 characters".to_string())
        );
    }

    #[test]
    fn specialization_required_only_for_doctors() {
        let mut form = valid_doctor_form();
        form.specialization = None;
        assert_eq!(
            validate_member(Role::Doctor, &form),
            Err("Specialization is required for doctors".to_string())
        );
        assert!(validate_member(Role::Admin, &form).is_ok());
    }

    #[test]
    fn appointment_payload_rejects_negative_age() {
        let payload = NewAppointment {
            name: "Pat".to_string(),
            age: -1,
            gender: crate::models::Gender::Other,
            disease: "flu".to_string(),
            blood: crate::models::BloodGroup::ANeg,
            time: Utc::now(),
            status: Default::default(),
            location: "Ward 1".to_string(),
            doctor_id: Uuid::new_v4(),
        };
        assert_eq!(
            validate_appointment(&payload),
            Err("Age must be 0 or greater".to_string())
        );
    }
}
