use super::test_db;

#[test]
fn test_open_and_bootstrap() {
    let db = test_db();
    let settings = db.get_all_settings().unwrap();
    assert!(settings.is_empty());
    assert_eq!(db.count_registrations().unwrap(), 0);
}

#[test]
fn test_settings_upsert() {
    let db = test_db();
    assert_eq!(db.get_setting("PHOTO_FOLDER").unwrap(), None);

    db.set_setting("PHOTO_FOLDER", "profilePictures", "normal").unwrap();
    db.set_setting("STORAGE_TOKEN", "abc", "secret").unwrap();
    db.set_setting("PHOTO_FOLDER", "members", "normal").unwrap();

    assert_eq!(db.get_setting("PHOTO_FOLDER").unwrap(), Some("members".into()));
    let all = db.get_all_settings().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["STORAGE_TOKEN"], "abc");
}

#[test]
fn test_open_file_database_twice() {
    let dir = std::env::temp_dir().join(format!("member-db-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("local.db");

    {
        let db = crate::Database::open(&path).unwrap();
        db.set_setting("PHOTO_WIDTH", "150", "normal").unwrap();
    }
    let db = crate::Database::open(&path).unwrap();
    assert_eq!(db.get_setting("PHOTO_WIDTH").unwrap(), Some("150".into()));

    drop(db);
    let _ = std::fs::remove_dir_all(&dir);
}
