//! File-backed token storage.

use fruitpack_auth::{AccessToken, AuthError, FileTokenStore, TokenStore};

#[test]
fn missing_file_loads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("token.json"));

    assert!(store.load().unwrap().is_none());
    assert!(!store.clear().unwrap());
}

#[test]
fn save_load_clear() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("nested").join("token.json"));

    store.save(&AccessToken::new("first")).unwrap();
    store.save(&AccessToken::new("second")).unwrap();
    assert_eq!(store.load().unwrap().unwrap().as_str(), "second");

    let reopened = FileTokenStore::new(store.path());
    assert_eq!(reopened.load().unwrap().unwrap().as_str(), "second");

    assert!(store.clear().unwrap());
    assert!(reopened.load().unwrap().is_none());
}

#[cfg(unix)]
#[test]
fn token_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    FileTokenStore::new(&path)
        .save(&AccessToken::new("secret"))
        .unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn existing_readable_file_is_narrowed_before_write() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    std::fs::write(&path, "{\"access_token\": \"old-and-much-longer\"}").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

    let store = FileTokenStore::new(&path);
    store.save(&AccessToken::new("new")).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(store.load().unwrap().unwrap().as_str(), "new");
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    std::fs::write(&path, "not json").unwrap();

    let err = FileTokenStore::new(&path).load().unwrap_err();
    assert!(matches!(err, AuthError::Serialization(_)));
}

#[test]
fn boxed_store_delegates() {
    let dir = tempfile::tempdir().unwrap();
    let store: Box<dyn TokenStore> = Box::new(FileTokenStore::new(dir.path().join("t.json")));

    store.save(&AccessToken::new("boxed")).unwrap();
    assert_eq!(store.load().unwrap().unwrap().as_str(), "boxed");
}
