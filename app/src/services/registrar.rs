//! Registration submission: validate, check for duplicates, process and
//! upload the photo, store the record.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use member_db::DbError;
use photo_engine::EncodedPhoto;
use photo_storage::{ObjectPath, ObjectStore, StorageError, profile_picture_filename};
use registration_form::{Field, FormData, FormErrors, FormState, SelectedPhoto};

use super::photo::{PhotoProcessor, ProcessError};
use super::records::{RecordStore, to_record};

pub const COMPRESSION_FAILED: &str = "Image compression failed. Please try another file.";
pub const DUPLICATE_CHECK_FAILED: &str = "Error checking Aadhaar. Please try again.";
pub const SUBMISSION_FAILED: &str = "Failed to upload data. Please try again.";
pub const ALREADY_REGISTERED: &str = "Oops! Seems like You are already Registered.";

/// Result of a submission that reached the duplicate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Registered { id: String, photo_url: String },
    /// A registration with the same Aadhaar number already exists.
    AlreadyRegistered,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    InProgress,

    #[error("Form has {} invalid field(s)", .0.len())]
    Validation(FormErrors),

    #[error("Duplicate check failed: {0}")]
    DuplicateCheck(#[source] DbError),

    #[error("Photo processing failed: {0}")]
    Photo(#[from] ProcessError),

    #[error("Photo upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("Failed to store registration: {0}")]
    Persistence(#[source] DbError),
}

/// Clears the in-progress flag when the submission ends, however it ends.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives a registration form through submission.
pub struct Registrar<R, S> {
    records: R,
    storage: S,
    processor: PhotoProcessor,
    folder: String,
    submitting: AtomicBool,
}

impl<R: RecordStore, S: ObjectStore> Registrar<R, S> {
    pub fn new(records: R, storage: S, processor: PhotoProcessor, folder: impl Into<String>) -> Self {
        Self {
            records,
            storage,
            processor,
            folder: folder.into(),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Compress a picked photo and attach it to the form. On failure the
    /// picture field carries the error and any earlier photo is kept.
    pub async fn select_photo(
        &self,
        form: &mut FormState,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ProcessError> {
        let original_size = bytes.len();
        match self.processor.compress(bytes).await {
            Ok(photo) => {
                tracing::info!(
                    file_name,
                    original_size,
                    compressed_size = photo.bytes.len(),
                    width = photo.width,
                    height = photo.height,
                    "Photo compressed"
                );
                form.set_photo(SelectedPhoto {
                    file_name: file_name.to_string(),
                    content_type: photo.format.mime_type().to_string(),
                    bytes: photo.bytes,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(file_name, "Photo compression failed: {e}");
                form.photo_error(COMPRESSION_FAILED);
                Err(e)
            }
        }
    }

    /// Submit the form.
    ///
    /// Only one submission runs at a time; a concurrent call fails with
    /// [`SubmitError::InProgress`] without touching its form. Errors the user
    /// should see are also recorded on the form.
    pub async fn submit(&self, form: &mut FormState) -> Result<SubmitOutcome, SubmitError> {
        let _guard = SubmitGuard::acquire(&self.submitting).ok_or(SubmitError::InProgress)?;

        if !form.validate() {
            return Err(SubmitError::Validation(form.errors().clone()));
        }

        let exists = self.records.contains(Field::Aadhaar, &form.data().aadhaar).await;
        match exists {
            Ok(true) => {
                tracing::info!("Aadhaar number already registered");
                return Ok(SubmitOutcome::AlreadyRegistered);
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!("Duplicate check failed: {e}");
                form.set_error(Field::Aadhaar, DUPLICATE_CHECK_FAILED);
                return Err(SubmitError::DuplicateCheck(e));
            }
        }

        let stored = self.store(form.data()).await;
        match stored {
            Ok((id, photo_url)) => Ok(SubmitOutcome::Registered { id, photo_url }),
            Err(e) => {
                tracing::error!("Submission failed: {e}");
                form.photo_error(SUBMISSION_FAILED);
                Err(e)
            }
        }
    }

    async fn store(&self, data: &FormData) -> Result<(String, String), SubmitError> {
        let photo_url = match &data.profile_picture {
            Some(selected) => self.upload_photo(data, selected).await?,
            None => String::new(),
        };

        let record = to_record(data, &photo_url, Utc::now());
        let id = self
            .records
            .add(record)
            .await
            .map_err(SubmitError::Persistence)?;
        Ok((id, photo_url))
    }

    async fn upload_photo(
        &self,
        data: &FormData,
        selected: &SelectedPhoto,
    ) -> Result<String, SubmitError> {
        let photo = EncodedPhoto::from_bytes(selected.bytes.clone()).map_err(ProcessError::from)?;
        let photo = self.processor.fit(photo).await?;

        let uid = if data.aadhaar.is_empty() {
            Utc::now().timestamp_millis().to_string()
        } else {
            data.aadhaar.clone()
        };
        let path = ObjectPath::new(
            &self.folder,
            &profile_picture_filename(&uid, &selected.file_name),
        )?;

        let url = self
            .storage
            .upload(photo.bytes, &path, photo.format.mime_type())
            .await?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use image::{DynamicImage, Rgb, RgbImage};
    use member_db::{Database, Registration};
    use photo_engine::{CompressOptions, PhotoFormat, TargetDimensions};
    use photo_storage::LocalObjectStore;
    use registration_form::{IdentityLength, RuleSet};
    use tokio::sync::Notify;

    use super::*;

    #[derive(Default)]
    struct MemoryRecords {
        records: Mutex<Vec<Registration>>,
        fail_check: bool,
        fail_add: bool,
        gate: Option<Arc<Notify>>,
    }

    impl RecordStore for MemoryRecords {
        async fn contains(&self, field: Field, value: &str) -> Result<bool, DbError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail_check {
                return Err(DbError::LockPoisoned);
            }
            assert_eq!(field, Field::Aadhaar);
            Ok(self.records.lock().unwrap().iter().any(|r| r.aadhaar == value))
        }

        async fn add(&self, mut record: Registration) -> Result<String, DbError> {
            if self.fail_add {
                return Err(DbError::LockPoisoned);
            }
            let mut records = self.records.lock().unwrap();
            record.id = format!("rec-{}", records.len() + 1);
            let id = record.id.clone();
            records.push(record);
            Ok(id)
        }
    }

    #[derive(Default)]
    struct MemoryStorage {
        uploads: Mutex<Vec<(String, String, Vec<u8>)>>,
        fail: bool,
    }

    impl ObjectStore for MemoryStorage {
        async fn upload(
            &self,
            bytes: Vec<u8>,
            path: &ObjectPath,
            content_type: &str,
        ) -> Result<String, StorageError> {
            if self.fail {
                return Err(StorageError::ApiError {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            self.uploads
                .lock()
                .unwrap()
                .push((path.key(), content_type.to_string(), bytes));
            Ok(format!("memory://{}", path.key()))
        }
    }

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 64])
        });
        EncodedPhoto::encode(&DynamicImage::ImageRgb8(img), PhotoFormat::Jpeg, 90)
            .unwrap()
            .bytes
    }

    fn processor() -> PhotoProcessor {
        PhotoProcessor::new(TargetDimensions::new(150, 190).unwrap(), CompressOptions::new())
    }

    fn registrar(
        records: MemoryRecords,
        storage: MemoryStorage,
    ) -> Registrar<MemoryRecords, MemoryStorage> {
        Registrar::new(records, storage, processor(), "profilePictures")
    }

    fn valid_form_with(photo: Vec<u8>) -> FormState {
        let mut form = FormState::new(RuleSet::standard(IdentityLength::Twelve).unwrap());
        for (field, value) in [
            (Field::FullName, "Asha Verma"),
            (Field::Dob, "1990-04-12"),
            (Field::Gender, "Female"),
            (Field::Occupation, "Farmer"),
            (Field::Education, "Graduate"),
            (Field::Aadhaar, "123456789012"),
            (Field::VoterId, "ABC1234567"),
            (Field::Address1, "12 Station Road"),
            (Field::City, "Nashik"),
            (Field::State, "Maharashtra"),
            (Field::Phone, "9876543210"),
        ] {
            form.change(field, value).unwrap();
        }
        form.set_photo(SelectedPhoto {
            file_name: "me.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: photo,
        });
        form
    }

    fn valid_form() -> FormState {
        valid_form_with(jpeg(800, 600))
    }

    #[tokio::test]
    async fn test_submit_registers_member() {
        let reg = registrar(MemoryRecords::default(), MemoryStorage::default());
        let mut form = valid_form();

        let outcome = reg.submit(&mut form).await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Registered {
                id: "rec-1".into(),
                photo_url: "memory://profilePictures/123456789012.jpg".into(),
            }
        );
        assert!(form.errors().is_empty());
        assert!(!reg.is_submitting());

        let uploads = reg.storage.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        let (key, content_type, bytes) = &uploads[0];
        assert_eq!(key, "profilePictures/123456789012.jpg");
        assert_eq!(content_type, "image/jpeg");
        let stored = image::load_from_memory(bytes).unwrap();
        assert_eq!((stored.width(), stored.height()), (150, 190));

        let records = reg.records.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Asha Verma");
        assert_eq!(
            records[0].profile_picture,
            "memory://profilePictures/123456789012.jpg"
        );
    }

    #[tokio::test]
    async fn test_photo_at_target_size_is_uploaded_unchanged() {
        let original = jpeg(150, 190);
        let reg = registrar(MemoryRecords::default(), MemoryStorage::default());
        let mut form = valid_form_with(original.clone());

        reg.submit(&mut form).await.unwrap();
        let uploads = reg.storage.uploads.lock().unwrap();
        assert_eq!(uploads[0].2, original);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_submitted() {
        let reg = registrar(MemoryRecords::default(), MemoryStorage::default());
        let mut form = valid_form();
        form.change(Field::Phone, "12345").unwrap();

        let err = reg.submit(&mut form).await.unwrap_err();
        match err {
            SubmitError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains_key(&Field::Phone));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            form.error(Field::Phone),
            Some("A 10-digit phone number is required.")
        );
        assert!(reg.storage.uploads.lock().unwrap().is_empty());
        assert!(reg.records.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_aadhaar_is_not_stored_again() {
        let reg = registrar(MemoryRecords::default(), MemoryStorage::default());
        reg.submit(&mut valid_form()).await.unwrap();

        let mut again = valid_form();
        let outcome = reg.submit(&mut again).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::AlreadyRegistered);
        assert!(again.errors().is_empty());
        assert_eq!(reg.storage.uploads.lock().unwrap().len(), 1);
        assert_eq!(reg.records.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_check_failure() {
        let records = MemoryRecords {
            fail_check: true,
            ..Default::default()
        };
        let reg = registrar(records, MemoryStorage::default());
        let mut form = valid_form();

        let err = reg.submit(&mut form).await.unwrap_err();
        assert!(matches!(err, SubmitError::DuplicateCheck(_)));
        assert_eq!(form.error(Field::Aadhaar), Some(DUPLICATE_CHECK_FAILED));
        assert!(reg.storage.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_stores_nothing() {
        let storage = MemoryStorage {
            fail: true,
            ..Default::default()
        };
        let reg = registrar(MemoryRecords::default(), storage);
        let mut form = valid_form();

        let err = reg.submit(&mut form).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Upload(StorageError::ApiError { status: 503, .. })
        ));
        assert_eq!(form.error(Field::ProfilePicture), Some(SUBMISSION_FAILED));
        assert!(reg.records.records.lock().unwrap().is_empty());
        assert!(!reg.is_submitting());
    }

    #[tokio::test]
    async fn test_insert_failure() {
        let records = MemoryRecords {
            fail_add: true,
            ..Default::default()
        };
        let reg = registrar(records, MemoryStorage::default());
        let mut form = valid_form();

        let err = reg.submit(&mut form).await.unwrap_err();
        assert!(matches!(err, SubmitError::Persistence(_)));
        assert_eq!(form.error(Field::ProfilePicture), Some(SUBMISSION_FAILED));
    }

    #[tokio::test]
    async fn test_concurrent_submit_is_rejected() {
        let gate = Arc::new(Notify::new());
        let records = MemoryRecords {
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let reg = registrar(records, MemoryStorage::default());
        let mut first = valid_form();
        let mut second = valid_form();

        let (a, b, ()) = tokio::join!(reg.submit(&mut first), reg.submit(&mut second), async {
            gate.notify_one();
        });

        assert!(matches!(a, Ok(SubmitOutcome::Registered { .. })));
        assert!(matches!(b, Err(SubmitError::InProgress)));
        assert!(second.errors().is_empty());
        assert!(!reg.is_submitting());
    }

    #[tokio::test]
    async fn test_select_photo_compresses_and_attaches() {
        let reg = registrar(MemoryRecords::default(), MemoryStorage::default());
        let mut form = FormState::new(RuleSet::standard(IdentityLength::Twelve).unwrap());
        form.photo_error("stale");

        reg.select_photo(&mut form, "large.jpg", jpeg(1600, 1200))
            .await
            .unwrap();

        let photo = form.data().profile_picture.as_ref().unwrap();
        assert_eq!(photo.file_name, "large.jpg");
        assert_eq!(photo.content_type, "image/jpeg");
        let decoded = image::load_from_memory(&photo.bytes).unwrap();
        assert!(decoded.width() <= 800 && decoded.height() <= 800);
        assert!(form.error(Field::ProfilePicture).is_none());
    }

    #[tokio::test]
    async fn test_select_photo_failure_keeps_previous() {
        let reg = registrar(MemoryRecords::default(), MemoryStorage::default());
        let mut form = valid_form();
        let before = form.data().profile_picture.clone();

        assert!(
            reg.select_photo(&mut form, "notes.txt", b"hello".to_vec())
                .await
                .is_err()
        );
        assert_eq!(form.error(Field::ProfilePicture), Some(COMPRESSION_FAILED));
        assert_eq!(form.data().profile_picture, before);
    }

    #[tokio::test]
    async fn test_end_to_end_with_database_and_local_storage() {
        let root = std::env::temp_dir().join(format!("registrar-e2e-{}", std::process::id()));
        let db = Database::open_in_memory().unwrap();
        let reg = Registrar::new(
            db.clone(),
            LocalObjectStore::new(&root),
            processor(),
            "profilePictures",
        );
        let mut form = valid_form();

        let outcome = reg.submit(&mut form).await.unwrap();
        let SubmitOutcome::Registered { id, photo_url } = outcome else {
            panic!("expected registration");
        };
        assert!(photo_url.starts_with("file://"));
        assert!(photo_url.ends_with("profilePictures/123456789012.jpg"));

        let stored = db.get_registration(&id).unwrap().unwrap();
        assert_eq!(stored.aadhaar, "123456789012");
        assert_eq!(stored.profile_picture, photo_url);

        let file = root.join("profilePictures").join("123456789012.jpg");
        let img = image::open(&file).unwrap();
        assert_eq!((img.width(), img.height()), (150, 190));

        let outcome = reg.submit(&mut valid_form()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::AlreadyRegistered);
        assert_eq!(db.count_registrations().unwrap(), 1);

        let _ = std::fs::remove_dir_all(&root);
    }
}
