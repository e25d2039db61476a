use std::fs;

use sup_pack::error::PackError;
use sup_pack::pack::pack_directory;
use sup_pack::unpack::unpack_tarball;
use tempfile::TempDir;

fn make_payload_dir(dir: &TempDir) {
    let manifest = r#"{"name":"gcd","version":"1.0.2","description":"GCD reference design"}"#;
    fs::write(dir.path().join("gcd.pkg.json"), manifest).unwrap();
    fs::write(dir.path().join("gcd.v"), "module gcd();\nendmodule\n").unwrap();
    fs::create_dir(dir.path().join("reports")).unwrap();
    fs::write(dir.path().join("reports/timing.rpt"), "slack: 0.2ns\n").unwrap();
}

#[test]
fn pack_creates_tarball() {
    let src = TempDir::new().unwrap();
    make_payload_dir(&src);

    let out = TempDir::new().unwrap();
    let tarball_path = out.path().join("gcd-1.0.2.sup.gz");

    pack_directory(src.path(), "gcd.pkg.json", &tarball_path).unwrap();
    assert!(tarball_path.exists());
    assert!(tarball_path.metadata().unwrap().len() > 0);
}

#[test]
fn pack_requires_manifest() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join("gcd.v"), "module gcd();\nendmodule\n").unwrap();

    let out = TempDir::new().unwrap();
    let err = pack_directory(src.path(), "gcd.pkg.json", &out.path().join("out.sup.gz"))
        .unwrap_err();
    assert!(matches!(err, PackError::MissingManifest(_)));
}

#[test]
fn unpack_roundtrips_payload() {
    let src = TempDir::new().unwrap();
    make_payload_dir(&src);

    let out_tar = TempDir::new().unwrap();
    let tarball_path = out_tar.path().join("gcd-1.0.2.sup.gz");
    pack_directory(src.path(), "gcd.pkg.json", &tarball_path).unwrap();

    let dest = TempDir::new().unwrap();
    unpack_tarball(&tarball_path, dest.path()).unwrap();

    let rtl = fs::read_to_string(dest.path().join("gcd.v")).unwrap();
    assert!(rtl.contains("module gcd"));
    let report = fs::read_to_string(dest.path().join("reports/timing.rpt")).unwrap();
    assert!(report.contains("slack"));
}

#[test]
fn pack_skips_hidden_files_and_stale_artifacts() {
    let src = TempDir::new().unwrap();
    make_payload_dir(&src);
    fs::write(src.path().join(".hidden"), "secret").unwrap();
    fs::write(src.path().join("gcd-1.0.1.sup.gz"), "stale artifact").unwrap();

    let out_tar = TempDir::new().unwrap();
    let tarball_path = out_tar.path().join("gcd-1.0.2.sup.gz");
    pack_directory(src.path(), "gcd.pkg.json", &tarball_path).unwrap();

    let dest = TempDir::new().unwrap();
    unpack_tarball(&tarball_path, dest.path()).unwrap();
    assert!(!dest.path().join(".hidden").exists());
    assert!(!dest.path().join("gcd-1.0.1.sup.gz").exists());
    assert!(dest.path().join("gcd.pkg.json").exists());
}
