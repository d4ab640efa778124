use splitscreen::types::errors::*;

// === StoreError Tests ===

#[test]
fn store_error_display_variants() {
    assert_eq!(
        StoreError::DatabaseError("disk I/O error".to_string()).to_string(),
        "Page store database error: disk I/O error"
    );
    assert_eq!(
        StoreError::NotFound("page-1".to_string()).to_string(),
        "Page record not found: page-1"
    );
    assert_eq!(
        StoreError::WriterUnavailable.to_string(),
        "Page store writer is not available"
    );
}

#[test]
fn store_error_from_rusqlite() {
    let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, StoreError::DatabaseError(_)));
    assert!(err.to_string().starts_with("Page store database error:"));
}

#[test]
fn store_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(StoreError::NotFound("id".to_string()));
    assert!(err.source().is_none());
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("permission denied".to_string()).to_string(),
        "Settings I/O error: permission denied"
    );
    assert_eq!(
        SettingsError::SerializationError("unexpected EOF".to_string()).to_string(),
        "Settings serialization error: unexpected EOF"
    );
    assert_eq!(
        SettingsError::InvalidKey("foo.bar".to_string()).to_string(),
        "Invalid settings key: foo.bar"
    );
    assert_eq!(
        SettingsError::InvalidValue("expected bool".to_string()).to_string(),
        "Invalid settings value: expected bool"
    );
}

#[test]
fn errors_are_debug() {
    let dbg = format!("{:?}", StoreError::WriterUnavailable);
    assert_eq!(dbg, "WriterUnavailable");
}
