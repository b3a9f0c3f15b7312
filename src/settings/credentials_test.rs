use super::*;
use serial_test::serial;
use tempfile::TempDir;

#[test]
fn test_debug_hides_password() {
    let creds = UserNamePassword::new("alice", Some("s3cret".to_string()));
    let shown = format!("{:?}", creds);
    assert_eq!(shown, "<UserNamePassword \"alice\", true>");
    assert!(!shown.contains("s3cret"));
}

#[test]
fn test_save_then_load_through_memory_backend() {
    let secrets = SecretBackend::memory();
    let creds = UserNamePassword::new("alice", Some("s3cret".to_string()));

    let username = creds.save(&secrets, "mail", "account").unwrap();
    assert_eq!(username, "alice");

    let mut restored = UserNamePassword::default();
    restored.load(&secrets, "mail", "account", &username).unwrap();
    assert_eq!(restored, creds);
}

#[test]
fn test_load_unknown_user_has_no_password() {
    let secrets = SecretBackend::memory();
    let mut restored = UserNamePassword::default();
    restored.load(&secrets, "mail", "account", "bob").unwrap();
    assert_eq!(restored.username, "bob");
    assert_eq!(restored.password, None);
}

#[test]
fn test_unavailable_backend_fails_loudly() {
    let secrets = SecretBackend::Unavailable;
    let creds = UserNamePassword::new("alice", Some("pw".to_string()));

    let err = creds.save(&secrets, "mail", "account").unwrap_err();
    assert!(matches!(err, QuarryError::Unavailable(_)));

    let mut restored = UserNamePassword::default();
    assert!(restored.load(&secrets, "mail", "account", "alice").is_err());
    assert!(UserNamePassword::new("x", None).save(&secrets, "mail", "account").is_err());
}

#[test]
fn test_file_keyring_persists_across_instances() {
    let temp_dir = TempDir::new().unwrap();
    let secrets = SecretBackend::from_kind(KeyringKind::PlainFile, temp_dir.path());
    secrets.set_password("mail", "alice", "pw1").unwrap();
    secrets.set_password("chat", "alice", "pw2").unwrap();

    let reopened = SecretBackend::plain_file(temp_dir.path().join("keyring.toml"));

    assert_eq!(
        reopened.get_password("mail", "alice").unwrap().as_deref(),
        Some("pw1")
    );
    assert_eq!(
        reopened.get_password("chat", "alice").unwrap().as_deref(),
        Some("pw2")
    );
    assert_eq!(reopened.get_password("mail", "bob").unwrap(), None);
}

#[cfg(unix)]
#[test]
fn test_file_keyring_is_private() {
    use std::os::unix::fs::PermissionsExt;
    let temp_dir = TempDir::new().unwrap();
    let secrets = SecretBackend::from_kind(KeyringKind::PlainFile, temp_dir.path());
    secrets.set_password("mail", "alice", "pw").unwrap();

    let mode = std::fs::metadata(temp_dir.path().join("keyring.toml"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
#[serial]
fn test_keyring_kind_from_env() {
    std::env::set_var("QUARRY_KEYRING", "memory");
    assert_eq!(KeyringKind::from_env(), KeyringKind::Memory);
    assert!(check_keyring_support().is_ok());

    std::env::set_var("QUARRY_KEYRING", "none");
    assert_eq!(KeyringKind::from_env(), KeyringKind::None);
    assert!(matches!(
        check_keyring_support(),
        Err(QuarryError::Unavailable(_))
    ));

    std::env::remove_var("QUARRY_KEYRING");
    assert_eq!(KeyringKind::from_env(), KeyringKind::PlainFile);
}
