//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, bool, bool, &'static str);

// (key, default, secret, required, description)
const DEFS: &[DefTuple] = &[
    ("PHOTO_WIDTH", "150", false, true, "Profile photo width in pixels"),
    ("PHOTO_HEIGHT", "190", false, true, "Profile photo height in pixels"),
    (
        "PHOTO_MAX_SIZE_KB",
        "100",
        false,
        false,
        "Target size of a compressed photo in kilobytes",
    ),
    (
        "PHOTO_MAX_DIMENSION",
        "800",
        false,
        false,
        "Longest photo edge after compression, in pixels",
    ),
    (
        "PHOTO_FOLDER",
        "profilePictures",
        false,
        true,
        "Storage folder for uploaded photos",
    ),
    ("STORAGE_BACKEND", "local", false, true, "Photo storage: 'local' or 'http'"),
    ("STORAGE_ENDPOINT", "", false, false, "Base URL photos are uploaded to"),
    (
        "STORAGE_PUBLIC_BASE_URL",
        "",
        false,
        false,
        "Base URL photos are downloaded from (defaults to the endpoint)",
    ),
    ("STORAGE_TOKEN", "", true, false, "Bearer token for photo uploads"),
    (
        "AADHAAR_LENGTH",
        "12",
        false,
        true,
        "Number of digits in an Aadhaar number (12 or 16)",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub required: bool,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, secret, required, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    secret,
                    required,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
