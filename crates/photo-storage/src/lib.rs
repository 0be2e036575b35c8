//! Object storage client for uploaded profile photos.
//!
//! Provides validated object paths, an HTTP object-store client with bearer
//! token injection, and a local-directory store for offline use and tests.

mod http;
mod local;
pub mod path;

pub use http::HttpObjectStore;
pub use local::LocalObjectStore;
pub use path::{ObjectPath, file_extension, profile_picture_filename};

use std::future::Future;

/// Destination for uploaded photo bytes.
///
/// Implementations return a URL from which the stored object can be
/// retrieved. Failures are reported once; nothing is retried.
pub trait ObjectStore: Send + Sync {
    fn upload(
        &self,
        bytes: Vec<u8>,
        path: &ObjectPath,
        content_type: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}

/// Unified error type for the photo-storage crate.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}
