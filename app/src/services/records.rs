//! Registration records: the database seam used by the registrar.

use std::future::Future;

use chrono::{DateTime, Utc};
use member_db::{Database, DbError, Registration};
use registration_form::{Field, FormData};

/// Where registrations are checked and stored.
pub trait RecordStore: Send + Sync {
    /// Whether a stored registration has `value` in `field`.
    fn contains(
        &self,
        field: Field,
        value: &str,
    ) -> impl Future<Output = Result<bool, DbError>> + Send;

    /// Store a registration, returning its new id.
    fn add(&self, record: Registration) -> impl Future<Output = Result<String, DbError>> + Send;
}

impl RecordStore for Database {
    async fn contains(&self, field: Field, value: &str) -> Result<bool, DbError> {
        self.record_exists(field.name(), value)
    }

    async fn add(&self, record: Registration) -> Result<String, DbError> {
        self.insert_registration(&record)
    }
}

/// Persisted form of `data`: every text field, the picture replaced by its
/// URL, and the submission time.
pub fn to_record(data: &FormData, photo_url: &str, submitted_at: DateTime<Utc>) -> Registration {
    Registration {
        id: String::new(),
        full_name: data.full_name.clone(),
        dob: data.dob.clone(),
        gender: data.gender.clone(),
        occupation: data.occupation.clone(),
        education: data.education.clone(),
        aadhaar: data.aadhaar.clone(),
        pan: data.pan.clone(),
        voter_id: data.voter_id.clone(),
        address1: data.address1.clone(),
        address2: data.address2.clone(),
        city: data.city.clone(),
        state: data.state.clone(),
        zip: data.zip.clone(),
        phone: data.phone.clone(),
        email: data.email.clone(),
        reason_for_joining: data.reason_for_joining.clone(),
        profile_picture: photo_url.to_string(),
        submission_date: submitted_at,
    }
}
