use chrono::{TimeZone, Utc};

use crate::{Database, Registration};

fn test_db() -> Database {
    Database::open_in_memory().expect("Failed to create test DB")
}

fn sample_registration(aadhaar: &str) -> Registration {
    Registration {
        id: String::new(),
        full_name: "Asha Verma".into(),
        dob: "1994-03-18".into(),
        gender: "Female".into(),
        occupation: "Professional".into(),
        education: "B.Tech".into(),
        aadhaar: aadhaar.into(),
        pan: "ABCDE1234F".into(),
        voter_id: "XYZ1234567".into(),
        address1: "12 MG Road".into(),
        address2: String::new(),
        city: "Pune".into(),
        state: "Maharashtra".into(),
        zip: "411001".into(),
        phone: "9876543210".into(),
        email: "asha@example.com".into(),
        reason_for_joining: "Community work".into(),
        profile_picture: format!("https://storage.example.com/profilePictures/{aadhaar}.jpg"),
        submission_date: Utc.with_ymd_and_hms(2025, 7, 1, 10, 30, 0).unwrap(),
    }
}

mod core;
