//! Stored membership registrations.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::{Database, DbError, OptionalExt};

/// Form field names that may be used for existence checks, with their columns.
pub const SEARCHABLE_FIELDS: &[(&str, &str)] = &[
    ("aadhaar", "aadhaar"),
    ("voterId", "voter_id"),
    ("pan", "pan"),
    ("phone", "phone"),
    ("email", "email"),
];

const SELECT_COLUMNS: &str = "id, full_name, dob, gender, occupation, education, aadhaar, pan, \
     voter_id, address1, address2, city, state, zip, phone, email, reason_for_joining, \
     profile_picture, submission_date";

/// A submitted registration. `profile_picture` holds the uploaded photo URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Assigned on insert; empty before that.
    #[serde(default)]
    pub id: String,
    pub full_name: String,
    pub dob: String,
    pub gender: String,
    pub occupation: String,
    pub education: String,
    pub aadhaar: String,
    pub pan: String,
    pub voter_id: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
    pub reason_for_joining: String,
    pub profile_picture: String,
    pub submission_date: DateTime<Utc>,
}

fn column_for(field: &str) -> Result<&'static str, DbError> {
    SEARCHABLE_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, column)| *column)
        .ok_or_else(|| DbError::InvalidData(format!("field is not searchable: {field}")))
}

fn row_to_registration(row: &Row<'_>) -> rusqlite::Result<Registration> {
    let submitted: String = row.get(18)?;
    let submission_date = DateTime::parse_from_rfc3339(&submitted)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(18, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Registration {
        id: row.get(0)?,
        full_name: row.get(1)?,
        dob: row.get(2)?,
        gender: row.get(3)?,
        occupation: row.get(4)?,
        education: row.get(5)?,
        aadhaar: row.get(6)?,
        pan: row.get(7)?,
        voter_id: row.get(8)?,
        address1: row.get(9)?,
        address2: row.get(10)?,
        city: row.get(11)?,
        state: row.get(12)?,
        zip: row.get(13)?,
        phone: row.get(14)?,
        email: row.get(15)?,
        reason_for_joining: row.get(16)?,
        profile_picture: row.get(17)?,
        submission_date,
    })
}

impl Database {
    /// Whether any registration has `value` in the given form field.
    ///
    /// `field` is a form field name from [`SEARCHABLE_FIELDS`]; anything else
    /// is rejected rather than interpolated into SQL.
    pub fn record_exists(&self, field: &str, value: &str) -> Result<bool, DbError> {
        let column = column_for(field)?;
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM registrations WHERE {column} = ?1)"),
                [value],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    /// Insert a registration and return its newly assigned id.
    ///
    /// No uniqueness is enforced here; callers check for duplicates first.
    pub fn insert_registration(&self, reg: &Registration) -> Result<String, DbError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let submitted = reg
            .submission_date
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO registrations (id, full_name, dob, gender, occupation, education,
                    aadhaar, pan, voter_id, address1, address2, city, state, zip, phone, email,
                    reason_for_joining, profile_picture, submission_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                    ?17, ?18, ?19)",
                rusqlite::params![
                    id,
                    reg.full_name,
                    reg.dob,
                    reg.gender,
                    reg.occupation,
                    reg.education,
                    reg.aadhaar,
                    reg.pan,
                    reg.voter_id,
                    reg.address1,
                    reg.address2,
                    reg.city,
                    reg.state,
                    reg.zip,
                    reg.phone,
                    reg.email,
                    reg.reason_for_joining,
                    reg.profile_picture,
                    submitted,
                ],
            )?;
            Ok(())
        })?;

        tracing::info!(id = %id, "Registration stored");
        Ok(id)
    }

    pub fn get_registration(&self, id: &str) -> Result<Option<Registration>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM registrations WHERE id = ?1"
            ))?;
            let reg = stmt.query_row([id], row_to_registration).optional()?;
            Ok(reg)
        })
    }

    /// All registrations, oldest submission first.
    pub fn list_registrations(&self) -> Result<Vec<Registration>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM registrations ORDER BY submission_date, id"
            ))?;
            let rows = stmt.query_map([], row_to_registration)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    pub fn count_registrations(&self) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM registrations", [], |row| {
                row.get(0)
            })?;
            Ok(count)
        })
    }
}
