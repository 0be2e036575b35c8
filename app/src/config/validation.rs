//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_FOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+(/[A-Za-z0-9_\-]+)*$").unwrap());
static RE_HTTP_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://\S+$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "PHOTO_WIDTH" | "PHOTO_HEIGHT" => validate_int_range(value, 1, 4096)?,
        "PHOTO_MAX_SIZE_KB" => validate_int_range(value, 1, 10240)?,
        "PHOTO_MAX_DIMENSION" => validate_int_range(value, 1, 8192)?,
        "PHOTO_FOLDER" => {
            if !RE_FOLDER.is_match(value) {
                return Err("must be a relative folder of letters, digits, '-' and '_'".into());
            }
        }
        "STORAGE_BACKEND" => {
            if value != "local" && value != "http" {
                return Err("must be 'local' or 'http'".into());
            }
        }
        "STORAGE_ENDPOINT" | "STORAGE_PUBLIC_BASE_URL" => {
            if !value.is_empty() && !RE_HTTP_URL.is_match(value) {
                return Err("must be an http(s) URL".into());
            }
        }
        "STORAGE_TOKEN" => {
            if value.chars().any(char::is_whitespace) {
                return Err("must not contain whitespace".into());
            }
        }
        "AADHAAR_LENGTH" => {
            if value != "12" && value != "16" {
                return Err("must be 12 or 16".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_dimensions() {
        assert!(validate_setting("PHOTO_WIDTH", "150").is_ok());
        assert!(validate_setting("PHOTO_HEIGHT", "0").is_err());
        assert!(validate_setting("PHOTO_HEIGHT", "-5").is_err());
        assert!(validate_setting("PHOTO_WIDTH", "wide").is_err());
    }

    #[test]
    fn test_photo_folder() {
        assert!(validate_setting("PHOTO_FOLDER", "profilePictures").is_ok());
        assert!(validate_setting("PHOTO_FOLDER", "members/photos").is_ok());
        assert!(validate_setting("PHOTO_FOLDER", "../up").is_err());
        assert!(validate_setting("PHOTO_FOLDER", "/abs").is_err());
        assert!(validate_setting("PHOTO_FOLDER", "").is_err());
    }

    #[test]
    fn test_storage_settings() {
        assert!(validate_setting("STORAGE_BACKEND", "http").is_ok());
        assert!(validate_setting("STORAGE_BACKEND", "s3").is_err());
        assert!(validate_setting("STORAGE_ENDPOINT", "").is_ok()); // empty is ok
        assert!(validate_setting("STORAGE_ENDPOINT", "https://storage.example.com/b").is_ok());
        assert!(validate_setting("STORAGE_ENDPOINT", "ftp://example.com").is_err());
        assert!(validate_setting("STORAGE_TOKEN", "abc def").is_err());
    }

    #[test]
    fn test_aadhaar_length() {
        assert!(validate_setting("AADHAAR_LENGTH", "12").is_ok());
        assert!(validate_setting("AADHAAR_LENGTH", "16").is_ok());
        assert!(validate_setting("AADHAAR_LENGTH", "14").is_err());
    }
}
