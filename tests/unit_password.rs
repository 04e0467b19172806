use stulink::stulink_core::{hash_password, verify_password};

#[test]
fn test_hash_password_success() {
    let password = "testpassword123";
    let hash = hash_password(password).unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, password);
}

#[test]
fn test_hash_is_salted() {
    let first = hash_password("samepassword").unwrap();
    let second = hash_password("samepassword").unwrap();

    assert_ne!(first, second);
    assert!(verify_password("samepassword", &first).unwrap());
    assert!(verify_password("samepassword", &second).unwrap());
}

#[test]
fn test_verify_password_correct() {
    let hash = hash_password("correctpassword").unwrap();
    assert!(verify_password("correctpassword", &hash).unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let hash = hash_password("correctpassword").unwrap();
    assert!(!verify_password("wrongpassword", &hash).unwrap());
}

#[test]
fn test_verify_password_malformed_hash() {
    let err = verify_password("anything", "not-a-bcrypt-hash").unwrap_err();
    assert!(err.is_server_error());
}
