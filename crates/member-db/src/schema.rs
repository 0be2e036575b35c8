//! Database schema definitions.

use rusqlite::Connection;

use crate::DbError;

pub fn create_tables(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    setting_type TEXT NOT NULL DEFAULT 'normal',
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS registrations (
    id TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    dob TEXT NOT NULL,
    gender TEXT NOT NULL,
    occupation TEXT NOT NULL,
    education TEXT NOT NULL,
    aadhaar TEXT NOT NULL,
    pan TEXT NOT NULL DEFAULT '',
    voter_id TEXT NOT NULL,
    address1 TEXT NOT NULL,
    address2 TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    zip TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL,
    email TEXT NOT NULL DEFAULT '',
    reason_for_joining TEXT NOT NULL DEFAULT '',
    profile_picture TEXT NOT NULL DEFAULT '',
    submission_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_registrations_aadhaar ON registrations(aadhaar);
CREATE INDEX IF NOT EXISTS idx_registrations_voter_id ON registrations(voter_id);
"#;
