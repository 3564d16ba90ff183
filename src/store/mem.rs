//! In-memory store. Backs the test suite and `DATABASE_URL`-less local
//! runs; shares the filter semantics with the Postgres adapter through
//! `FilterCriteria::matches`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{
    AdminRecord, Appointment, AppointmentView, DoctorProfile, DoctorRecord, NewAppointment,
};
use crate::query::{FilterCriteria, Scope};

use super::{NewAdmin, NewDoctor, Store, StoreError};

#[derive(Default)]
pub struct MemStore {
    appointments: Mutex<HashMap<Uuid, Appointment>>,
    doctors: Mutex<HashMap<Uuid, DoctorRecord>>,
    admins: Mutex<HashMap<Uuid, AdminRecord>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_doctor(&self, doctor: DoctorRecord) {
        self.doctors.lock().await.insert(doctor.id, doctor);
    }

    pub async fn seed_admin(&self, admin: AdminRecord) {
        self.admins.lock().await.insert(admin.id, admin);
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_appointment(&self, new: NewAppointment) -> Result<Uuid, StoreError> {
        if !self.doctors.lock().await.contains_key(&new.doctor_id) {
            return Err(StoreError::ForeignKey(
                "doctorId does not reference a known doctor".into(),
            ));
        }
        let now = Utc::now();
        let id = Uuid::new_v4();
        let appointment = Appointment {
            id,
            name: new.name,
            age: new.age,
            gender: new.gender,
            disease: new.disease,
            blood: new.blood,
            time: new.time,
            status: new.status,
            location: new.location,
            doctor_id: new.doctor_id,
            created_at: now,
            updated_at: now,
        };
        self.appointments.lock().await.insert(id, appointment);
        Ok(id)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        new: NewAppointment,
    ) -> Result<AppointmentView, StoreError> {
        // Lock order is doctors before appointments, same as list.
        let doctor_name = self
            .doctors
            .lock()
            .await
            .get(&new.doctor_id)
            .map(|d| d.name.clone())
            .ok_or_else(|| {
                StoreError::ForeignKey("doctorId does not reference a known doctor".into())
            })?;

        let mut appointments = self.appointments.lock().await;
        let existing = appointments
            .get_mut(&id)
            .ok_or(StoreError::NotFound("Appointment"))?;

        existing.name = new.name;
        existing.age = new.age;
        existing.gender = new.gender;
        existing.disease = new.disease;
        existing.blood = new.blood;
        existing.time = new.time;
        existing.status = new.status;
        existing.location = new.location;
        existing.doctor_id = new.doctor_id;
        existing.updated_at = Utc::now();

        Ok(AppointmentView::from_record(existing, doctor_name))
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<(), StoreError> {
        self.appointments
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("Appointment"))
    }

    async fn list_appointments(
        &self,
        filter: &FilterCriteria,
        scope: &Scope,
    ) -> Result<Vec<AppointmentView>, StoreError> {
        let doctors = self.doctors.lock().await;
        let appointments = self.appointments.lock().await;

        let mut matched: Vec<&Appointment> = appointments
            .values()
            .filter(|a| scope.permits(a) && filter.matches(a))
            .collect();
        matched.sort_by_key(|a| (a.time, a.id));

        Ok(matched
            .into_iter()
            .map(|a| {
                let doctor_name = doctors
                    .get(&a.doctor_id)
                    .map(|d| d.name.clone())
                    .unwrap_or_default();
                AppointmentView::from_record(a, doctor_name)
            })
            .collect())
    }

    async fn create_admin(&self, new: NewAdmin) -> Result<Uuid, StoreError> {
        let mut admins = self.admins.lock().await;
        if admins.values().any(|a| a.email == new.email) {
            return Err(StoreError::Duplicate(
                "Admin with this email already exists".into(),
            ));
        }
        let id = Uuid::new_v4();
        admins.insert(
            id,
            AdminRecord {
                id,
                name: new.name,
                email: new.email,
                password_hash: new.password_hash,
            },
        );
        Ok(id)
    }

    async fn create_doctor(&self, new: NewDoctor) -> Result<Uuid, StoreError> {
        let mut doctors = self.doctors.lock().await;
        if doctors.values().any(|d| d.email == new.email) {
            return Err(StoreError::Duplicate(
                "A doctor with this email already exists".into(),
            ));
        }
        let id = Uuid::new_v4();
        doctors.insert(
            id,
            DoctorRecord {
                id,
                name: new.name,
                email: new.email,
                password_hash: new.password_hash,
                specialization: new.specialization,
            },
        );
        Ok(id)
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminRecord>, StoreError> {
        Ok(self
            .admins
            .lock()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_doctor_by_email(&self, email: &str) -> Result<Option<DoctorRecord>, StoreError> {
        Ok(self
            .doctors
            .lock()
            .await
            .values()
            .find(|d| d.email == email)
            .cloned())
    }

    async fn search_doctors(&self, term: Option<&str>) -> Result<Vec<DoctorProfile>, StoreError> {
        let doctors = self.doctors.lock().await;
        let needle = term.map(str::to_lowercase).filter(|t| !t.is_empty());

        let mut matched: Vec<&DoctorRecord> = doctors
            .values()
            .filter(|d| match needle.as_deref() {
                None => true,
                Some(t) => {
                    d.name.to_lowercase().contains(t)
                        || d.specialization.to_lowercase().contains(t)
                }
            })
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(matched.into_iter().map(DoctorProfile::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, BloodGroup, Gender};
    use crate::query::StatusFilter;
    use chrono::TimeZone;

    async fn store_with_doctor(name: &str) -> (MemStore, Uuid) {
        let store = MemStore::new();
        let id = Uuid::new_v4();
        store
            .seed_doctor(DoctorRecord {
                id,
                name: name.to_string(),
                email: format!("{}@clinic.example", name.to_lowercase().replace(' ', ".")),
                password_hash: "phc".to_string(),
                specialization: "General".to_string(),
            })
            .await;
        (store, id)
    }

    fn payload(name: &str, status: AppointmentStatus, doctor_id: Uuid) -> NewAppointment {
        NewAppointment {
            name: name.to_string(),
            age: 52,
            gender: Gender::Man,
            disease: "hypertension".to_string(),
            blood: BloodGroup::AbNeg,
            time: Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap(),
            status,
            location: "Room 4".to_string(),
            doctor_id,
        }
    }

    #[tokio::test]
    async fn create_then_list_round_trips_with_doctor_name() {
        let (store, doctor_id) = store_with_doctor("Dr. Grey").await;
        let sent = payload("Pat Doe", AppointmentStatus::Urgent, doctor_id);
        let id = store.create_appointment(sent.clone()).await.unwrap();

        let rows = store
            .list_appointments(&FilterCriteria::default(), &Scope::Admin)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        let got = &rows[0];
        assert_eq!(got.id, id);
        assert_eq!(got.name, sent.name);
        assert_eq!(got.age, sent.age);
        assert_eq!(got.gender, sent.gender);
        assert_eq!(got.disease, sent.disease);
        assert_eq!(got.blood, sent.blood);
        assert_eq!(got.time, sent.time);
        assert_eq!(got.status, sent.status);
        assert_eq!(got.location, sent.location);
        // doctor key replaced by display name
        assert_eq!(got.doctor_name, "Dr. Grey");
    }

    #[tokio::test]
    async fn create_with_unknown_doctor_is_a_foreign_key_error() {
        let (store, _) = store_with_doctor("Dr. Grey").await;
        let err = store
            .create_appointment(payload("Pat", AppointmentStatus::NonUrgent, Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn update_replaces_every_mutable_field() {
        let (store, doctor_id) = store_with_doctor("Dr. Grey").await;
        let id = store
            .create_appointment(payload("Pat", AppointmentStatus::NonUrgent, doctor_id))
            .await
            .unwrap();

        let mut replacement = payload("Patricia", AppointmentStatus::Emergency, doctor_id);
        replacement.location = "ICU".to_string();
        let updated = store.update_appointment(id, replacement).await.unwrap();
        assert_eq!(updated.name, "Patricia");
        assert_eq!(updated.status, AppointmentStatus::Emergency);
        assert_eq!(updated.location, "ICU");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let (store, doctor_id) = store_with_doctor("Dr. Grey").await;
        let err = store
            .update_appointment(
                Uuid::new_v4(),
                payload("X", AppointmentStatus::NonUrgent, doctor_id),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Appointment")));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found_on_every_call() {
        let (store, doctor_id) = store_with_doctor("Dr. Grey").await;
        let id = store
            .create_appointment(payload("Pat", AppointmentStatus::NonUrgent, doctor_id))
            .await
            .unwrap();

        store.delete_appointment(id).await.unwrap();
        for _ in 0..3 {
            let err = store.delete_appointment(id).await.unwrap_err();
            assert!(matches!(err, StoreError::NotFound("Appointment")));
        }
    }

    #[tokio::test]
    async fn doctor_scope_hides_other_doctors_rows_despite_matching_filters() {
        let (store, mine) = store_with_doctor("Dr. Mine").await;
        let other = Uuid::new_v4();
        store
            .seed_doctor(DoctorRecord {
                id: other,
                name: "Dr. Other".to_string(),
                email: "other@clinic.example".to_string(),
                password_hash: "phc".to_string(),
                specialization: "Surgery".to_string(),
            })
            .await;

        store
            .create_appointment(payload("Pat", AppointmentStatus::Urgent, mine))
            .await
            .unwrap();
        store
            .create_appointment(payload("Pat", AppointmentStatus::Urgent, other))
            .await
            .unwrap();

        let filter = FilterCriteria {
            search: Some("pat".to_string()),
            status: StatusFilter::Only(AppointmentStatus::Urgent),
            ..Default::default()
        };
        let rows = store
            .list_appointments(&filter, &Scope::Doctor(mine))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].doctor_name, "Dr. Mine");

        let all = store.list_appointments(&filter, &Scope::Admin).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_member_emails_are_rejected() {
        let store = MemStore::new();
        let admin = NewAdmin {
            name: "Root".to_string(),
            email: "root@clinic.example".to_string(),
            password_hash: "phc".to_string(),
        };
        store.create_admin(admin.clone()).await.unwrap();
        assert!(matches!(
            store.create_admin(admin).await.unwrap_err(),
            StoreError::Duplicate(_)
        ));
    }

    #[tokio::test]
    async fn doctor_search_matches_name_or_specialization() {
        let store = MemStore::new();
        for (name, spec) in [("Dr. Grey", "Cardiology"), ("Dr. House", "Diagnostics")] {
            store
                .create_doctor(NewDoctor {
                    name: name.to_string(),
                    email: format!("{spec}@clinic.example").to_lowercase(),
                    password_hash: "phc".to_string(),
                    specialization: spec.to_string(),
                })
                .await
                .unwrap();
        }

        let by_name = store.search_doctors(Some("grey")).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Dr. Grey");

        let by_spec = store.search_doctors(Some("DIAG")).await.unwrap();
        assert_eq!(by_spec.len(), 1);
        assert_eq!(by_spec[0].name, "Dr. House");

        let all = store.search_doctors(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
