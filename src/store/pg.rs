//! Postgres store adapter. SQL is static with `$n::type IS NULL OR ...`
//! guards standing in for absent filter criteria, so the one query covers
//! every filter combination.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use crate::models::{
    AdminRecord, Appointment, AppointmentView, DoctorProfile, DoctorRecord, NewAppointment,
};
use crate::query::{FilterCriteria, Scope};

use super::{NewAdmin, NewDoctor, Store, StoreError};

// Postgres error codes for constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
const FK_VIOLATION: &str = "23503";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(PgStore { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        PgStore { pool }
    }

    async fn fetch_view(&self, id: Uuid) -> Result<AppointmentView, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
              a.appointment_id, a.name, a.age, a.gender, a.disease, a.blood,
              a.time, a.status, a.location, a.doctor_id,
              a.created_at, a.updated_at,
              d.name AS doctor_name
            FROM appointment a
            JOIN doctor d ON d.doctor_id = a.doctor_id
            WHERE a.appointment_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?
        .ok_or(StoreError::NotFound("Appointment"))?;

        decode_view(&row)
    }
}

fn decode_view(row: &PgRow) -> Result<AppointmentView, StoreError> {
    let gender: String = row.try_get("gender").map_err(decode_err)?;
    let blood: String = row.try_get("blood").map_err(decode_err)?;
    let status: String = row.try_get("status").map_err(decode_err)?;

    let record = Appointment {
        id: row.try_get("appointment_id").map_err(decode_err)?,
        name: row.try_get("name").map_err(decode_err)?,
        age: row.try_get("age").map_err(decode_err)?,
        gender: gender.parse().map_err(StoreError::Backend)?,
        disease: row.try_get("disease").map_err(decode_err)?,
        blood: blood.parse().map_err(StoreError::Backend)?,
        time: row.try_get("time").map_err(decode_err)?,
        status: status.parse().map_err(StoreError::Backend)?,
        location: row.try_get("location").map_err(decode_err)?,
        doctor_id: row.try_get("doctor_id").map_err(decode_err)?,
        created_at: row.try_get("created_at").map_err(decode_err)?,
        updated_at: row.try_get("updated_at").map_err(decode_err)?,
    };
    let doctor_name: String = row.try_get("doctor_name").map_err(decode_err)?;
    Ok(AppointmentView::from_record(&record, doctor_name))
}

fn decode_err(e: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("row decode error: {e}"))
}

/// Classify a constraint violation; anything else stays a backend fault.
fn classify(e: sqlx::Error, duplicate_msg: &str, fk_msg: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return StoreError::Duplicate(duplicate_msg.to_string()),
            Some(FK_VIOLATION) => return StoreError::ForeignKey(fk_msg.to_string()),
            _ => {}
        }
    }
    StoreError::backend(e)
}

#[async_trait]
impl Store for PgStore {
    async fn create_appointment(&self, new: NewAppointment) -> Result<Uuid, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO appointment
              (name, age, gender, disease, blood, time, status, location, doctor_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING appointment_id
            "#,
        )
        .bind(&new.name)
        .bind(new.age)
        .bind(new.gender.as_str())
        .bind(&new.disease)
        .bind(new.blood.as_str())
        .bind(new.time)
        .bind(new.status.as_str())
        .bind(&new.location)
        .bind(new.doctor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            classify(
                e,
                "appointment already exists",
                "doctorId does not reference a known doctor",
            )
        })?;

        row.try_get("appointment_id").map_err(decode_err)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        new: NewAppointment,
    ) -> Result<AppointmentView, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE appointment
            SET name = $2,
                age = $3,
                gender = $4,
                disease = $5,
                blood = $6,
                time = $7,
                status = $8,
                location = $9,
                doctor_id = $10,
                updated_at = now()
            WHERE appointment_id = $1
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(new.age)
        .bind(new.gender.as_str())
        .bind(&new.disease)
        .bind(new.blood.as_str())
        .bind(new.time)
        .bind(new.status.as_str())
        .bind(&new.location)
        .bind(new.doctor_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            classify(
                e,
                "appointment already exists",
                "doctorId does not reference a known doctor",
            )
        })?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("Appointment"));
        }

        self.fetch_view(id).await
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<(), StoreError> {
        let res = sqlx::query(r#"DELETE FROM appointment WHERE appointment_id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("Appointment"));
        }
        Ok(())
    }

    async fn list_appointments(
        &self,
        filter: &FilterCriteria,
        scope: &Scope,
    ) -> Result<Vec<AppointmentView>, StoreError> {
        let search: Option<&str> = filter.search.as_deref().filter(|s| !s.is_empty());
        let status: Option<&str> = match filter.status {
            crate::query::StatusFilter::All => None,
            crate::query::StatusFilter::Only(s) => Some(s.as_str()),
        };
        let start: Option<DateTime<Utc>> = filter.start_bound();
        let end: Option<DateTime<Utc>> = filter.end_bound();

        let rows = sqlx::query(
            r#"
            SELECT
              a.appointment_id, a.name, a.age, a.gender, a.disease, a.blood,
              a.time, a.status, a.location, a.doctor_id,
              a.created_at, a.updated_at,
              d.name AS doctor_name
            FROM appointment a
            JOIN doctor d ON d.doctor_id = a.doctor_id
            WHERE ($1::text IS NULL OR a.name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR a.status = $2)
              AND ($3::timestamptz IS NULL OR a.time >= $3)
              AND ($4::timestamptz IS NULL OR a.time <= $4)
              AND ($5::uuid IS NULL OR a.doctor_id = $5)
            ORDER BY a.time ASC, a.appointment_id ASC
            "#,
        )
        .bind(search)
        .bind(status)
        .bind(start)
        .bind(end)
        .bind(scope.doctor_id())
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        rows.iter().map(decode_view).collect()
    }

    async fn create_admin(&self, new: NewAdmin) -> Result<Uuid, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO admin (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING admin_id
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            classify(
                e,
                "Admin with this email already exists",
                "invalid admin reference",
            )
        })?;

        row.try_get("admin_id").map_err(decode_err)
    }

    async fn create_doctor(&self, new: NewDoctor) -> Result<Uuid, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO doctor (name, email, password_hash, specialization)
            VALUES ($1, $2, $3, $4)
            RETURNING doctor_id
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.specialization)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            classify(
                e,
                "A doctor with this email already exists",
                "invalid doctor reference",
            )
        })?;

        row.try_get("doctor_id").map_err(decode_err)
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT admin_id, name, email, password_hash
            FROM admin
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.map(|r| {
            Ok(AdminRecord {
                id: r.try_get("admin_id").map_err(decode_err)?,
                name: r.try_get("name").map_err(decode_err)?,
                email: r.try_get("email").map_err(decode_err)?,
                password_hash: r.try_get("password_hash").map_err(decode_err)?,
            })
        })
        .transpose()
    }

    async fn find_doctor_by_email(&self, email: &str) -> Result<Option<DoctorRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT doctor_id, name, email, password_hash, specialization
            FROM doctor
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.map(|r| {
            Ok(DoctorRecord {
                id: r.try_get("doctor_id").map_err(decode_err)?,
                name: r.try_get("name").map_err(decode_err)?,
                email: r.try_get("email").map_err(decode_err)?,
                password_hash: r.try_get("password_hash").map_err(decode_err)?,
                specialization: r.try_get("specialization").map_err(decode_err)?,
            })
        })
        .transpose()
    }

    async fn search_doctors(&self, term: Option<&str>) -> Result<Vec<DoctorProfile>, StoreError> {
        let needle = term.map(str::trim).filter(|t| !t.is_empty());

        let rows = sqlx::query(
            r#"
            SELECT doctor_id, name, email, specialization
            FROM doctor
            WHERE ($1::text IS NULL
                   OR name ILIKE '%' || $1 || '%'
                   OR specialization ILIKE '%' || $1 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(needle)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        rows.into_iter()
            .map(|r| {
                Ok(DoctorProfile {
                    id: r.try_get("doctor_id").map_err(decode_err)?,
                    name: r.try_get("name").map_err(decode_err)?,
                    email: r.try_get("email").map_err(decode_err)?,
                    specialization: r.try_get("specialization").map_err(decode_err)?,
                })
            })
            .collect()
    }
}
