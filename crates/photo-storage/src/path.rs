//! Object keys: a logical folder plus a file name.

use std::fmt;

use crate::StorageError;

/// Validated `folder/file_name` key inside a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPath {
    folder: String,
    file_name: String,
}

impl ObjectPath {
    /// Build a path from a folder (may be nested, may be empty) and a file name.
    ///
    /// Leading and trailing slashes on the folder are ignored. Empty, `.`
    /// and `..` segments are rejected, as is a file name containing a
    /// separator. `?`, `#` and `%` would change the meaning of the key once
    /// it is joined into a URL, so they are rejected too.
    pub fn new(folder: &str, file_name: &str) -> Result<Self, StorageError> {
        let folder = folder.trim_matches('/');
        if !folder.is_empty() {
            for segment in folder.split('/') {
                validate_segment(segment)?;
            }
        }
        validate_segment(file_name)?;
        if file_name.contains('/') {
            return Err(StorageError::InvalidPath(format!(
                "file name must not contain '/': {file_name}"
            )));
        }

        Ok(Self {
            folder: folder.to_string(),
            file_name: file_name.to_string(),
        })
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The full key, e.g. `profilePictures/123456789012.jpg`.
    pub fn key(&self) -> String {
        if self.folder.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}/{}", self.folder, self.file_name)
        }
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

fn validate_segment(segment: &str) -> Result<(), StorageError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['\\', '?', '#', '%'])
    {
        return Err(StorageError::InvalidPath(format!(
            "invalid path segment: {segment:?}"
        )));
    }
    Ok(())
}

/// Extension of `file_name` including the dot, or `""` when there is none.
///
/// Only ASCII letters and digits count as an extension; anything else is
/// dropped rather than copied into an object key.
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => {
            let ext = &file_name[idx + 1..];
            if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                &file_name[idx..]
            } else {
                ""
            }
        }
        None => "",
    }
}

/// Storage file name for a member's photo: the member id plus the
/// extension of the uploaded file.
pub fn profile_picture_filename(uid: &str, original_name: &str) -> String {
    format!("{uid}{}", file_extension(original_name))
}
