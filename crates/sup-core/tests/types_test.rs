use sup_core::types::{PackageName, Sha256Digest, ValidationError};

#[test]
fn package_name_accepts_design_slugs() {
    assert!(PackageName::new("gcd").is_ok());
    assert!(PackageName::new("heartbeat_wrapper").is_ok());
    assert!(PackageName::new("riscv-core-32").is_ok());
}

#[test]
fn package_name_rejects_empty() {
    assert_eq!(PackageName::new("").unwrap_err(), ValidationError::Empty);
}

#[test]
fn package_name_rejects_uppercase_and_paths() {
    assert_eq!(
        PackageName::new("Gcd").unwrap_err(),
        ValidationError::InvalidCharacters
    );
    assert_eq!(
        PackageName::new("build/gcd").unwrap_err(),
        ValidationError::InvalidCharacters
    );
}

#[test]
fn package_name_rejects_too_long() {
    let long = "a".repeat(65);
    assert!(matches!(
        PackageName::new(&long).unwrap_err(),
        ValidationError::TooLong { max: 64, got: 65 }
    ));
}

#[test]
fn digest_normalises_to_lowercase() {
    let upper = "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855";
    let d = Sha256Digest::from_hex(upper).unwrap();
    assert_eq!(
        d.as_hex(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn digest_rejects_wrong_length() {
    assert_eq!(
        Sha256Digest::from_hex("abc").unwrap_err(),
        ValidationError::InvalidHexLength(3)
    );
}

#[test]
fn digest_rejects_non_hex() {
    let bad = "z".repeat(64);
    assert_eq!(
        Sha256Digest::from_hex(&bad).unwrap_err(),
        ValidationError::InvalidHex
    );
}
