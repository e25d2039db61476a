use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use semver::{Version, VersionReq};
use sha2::{Digest, Sha256};
use sup_cli::installer::{InstallError, Installer};
use sup_core::manifest::Manifest;
use sup_core::package_ref::PackageRef;
use sup_core::types::PackageName;
use sup_pack::pack::pack_directory;
use sup_registry::error::RegistryError;
use sup_registry::store::{PackageSource, ResolvedPackage};
use tempfile::TempDir;

/// In-memory package source standing in for a registry directory.
#[derive(Default)]
struct MemorySource {
    packages: BTreeMap<PackageName, BTreeMap<Version, ResolvedPackage>>,
}

impl MemorySource {
    fn add(&mut self, resolved: ResolvedPackage) {
        self.packages
            .entry(resolved.manifest.name.clone())
            .or_default()
            .insert(resolved.manifest.version.clone(), resolved);
    }
}

impl PackageSource for MemorySource {
    fn resolve(&self, pkg_ref: &PackageRef) -> Result<ResolvedPackage, RegistryError> {
        let versions = self
            .packages
            .get(&pkg_ref.name)
            .ok_or_else(|| RegistryError::UnknownPackage(pkg_ref.name.clone()))?;
        match &pkg_ref.version {
            Some(v) => versions
                .get(v)
                .cloned()
                .ok_or_else(|| RegistryError::UnknownVersion {
                    name: pkg_ref.name.clone(),
                    version: v.clone(),
                }),
            None => versions
                .last_key_value()
                .map(|(_, r)| r.clone())
                .ok_or_else(|| RegistryError::UnknownPackage(pkg_ref.name.clone())),
        }
    }

    fn best_match(
        &self,
        name: &PackageName,
        req: &VersionReq,
    ) -> Result<Version, RegistryError> {
        let versions = self
            .packages
            .get(name)
            .ok_or_else(|| RegistryError::UnknownPackage(name.clone()))?;
        versions
            .keys()
            .rev()
            .find(|v| req.matches(v))
            .cloned()
            .ok_or_else(|| RegistryError::NoVersionMatches {
                name: name.clone(),
                req: req.clone(),
            })
    }
}

/// Build a packed package with a stamped manifest, as publish would.
fn make_package(work: &TempDir, name: &str, version: &str, depends: &str) -> ResolvedPackage {
    let payload = work.path().join("payloads").join(name).join(version);
    fs::create_dir_all(&payload).unwrap();
    let manifest_json = format!(
        r#"{{"name":"{name}","version":"{version}","description":"{name} design"{depends}}}"#
    );
    fs::write(payload.join(format!("{name}.pkg.json")), &manifest_json).unwrap();
    fs::write(
        payload.join(format!("{name}.v")),
        format!("module {name}();\nendmodule\n"),
    )
    .unwrap();

    let tarball_path = work.path().join(format!("{name}-{version}.sup.gz"));
    pack_directory(&payload, &format!("{name}.pkg.json"), &tarball_path).unwrap();
    let tarball = fs::read(&tarball_path).unwrap();

    let sha256 = hex::encode(Sha256::digest(&tarball));
    let mut manifest: Manifest = serde_json::from_str(&manifest_json).unwrap();
    manifest.sha256 = Some(sup_core::types::Sha256Digest::from_hex(&sha256).unwrap());
    ResolvedPackage { manifest, tarball }
}

fn installer(source: MemorySource, home: &TempDir) -> Installer {
    Installer::new(
        Arc::new(source),
        PathBuf::from("test_registry"),
        home.path().to_path_buf(),
    )
}

#[test]
fn install_unpacks_and_records() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let mut source = MemorySource::default();
    source.add(make_package(&work, "gcd", "1.0.2", ""));

    let installed = installer(source, &home)
        .install(&PackageRef::parse("gcd").unwrap())
        .unwrap();

    assert_eq!(installed.len(), 1);
    let path = &installed[0].install_path;
    assert!(path.ends_with("packages/gcd/1.0.2"));
    assert!(path.join("gcd.v").exists());
    assert!(home.path().join("installed.json").exists());
}

#[test]
fn dependencies_install_before_dependents() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let mut source = MemorySource::default();
    source.add(make_package(&work, "gcd", "1.0.2", ""));
    source.add(make_package(
        &work,
        "top",
        "2.0.0",
        r#","depends":{"gcd":"^1.0"}"#,
    ));

    let installed = installer(source, &home)
        .install(&PackageRef::parse("top").unwrap())
        .unwrap();

    let order: Vec<String> = installed.iter().map(|p| p.name.to_string()).collect();
    assert_eq!(order, ["gcd", "top"]);
}

#[test]
fn reinstall_is_a_noop() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let mut source = MemorySource::default();
    source.add(make_package(&work, "gcd", "1.0.2", ""));
    let installer = installer(source, &home);

    let first = installer.install(&PackageRef::parse("gcd").unwrap()).unwrap();
    assert_eq!(first.len(), 1);
    let second = installer.install(&PackageRef::parse("gcd").unwrap()).unwrap();
    assert!(second.is_empty());
}

#[test]
fn corrupted_tarball_is_rejected() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let mut source = MemorySource::default();
    let mut pkg = make_package(&work, "gcd", "1.0.2", "");
    pkg.tarball.extend_from_slice(b"tampered");
    source.add(pkg);

    let err = installer(source, &home)
        .install(&PackageRef::parse("gcd").unwrap())
        .unwrap_err();
    assert!(matches!(err, InstallError::DigestMismatch { .. }));
    assert!(!home.path().join("packages/gcd/1.0.2").exists());
}

#[test]
fn dependency_cycle_is_detected() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let mut source = MemorySource::default();
    source.add(make_package(
        &work,
        "ping",
        "1.0.0",
        r#","depends":{"pong":"^1.0"}"#,
    ));
    source.add(make_package(
        &work,
        "pong",
        "1.0.0",
        r#","depends":{"ping":"^1.0"}"#,
    ));

    let err = installer(source, &home)
        .install(&PackageRef::parse("ping").unwrap())
        .unwrap_err();
    assert!(matches!(err, InstallError::DependencyCycle(_)));
}

#[test]
fn unsatisfiable_requirement_is_reported() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let mut source = MemorySource::default();
    source.add(make_package(&work, "gcd", "1.0.2", ""));
    source.add(make_package(
        &work,
        "top",
        "2.0.0",
        r#","depends":{"gcd":"^9.0"}"#,
    ));

    let err = installer(source, &home)
        .install(&PackageRef::parse("top").unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        InstallError::Registry(RegistryError::NoVersionMatches { .. })
    ));
}
