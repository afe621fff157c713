//! Integration tests for sectxt.
//!
//! These tests verify end-to-end functionality without relying on external
//! network services: library flows run against pre-loaded documents, and
//! the binary is exercised in files mode on temporary files.

use std::io::Write;
use std::process::Command;
use std::str;
use std::sync::Arc;

use sectxt::resolver::{fetch_security_txt, resolve_many};
use sectxt::{
    CollectingSink, ContactOrigin, Diagnostic, DocumentSource, FieldValue, NullSink, StaticSource,
    parse, resolve_contacts,
};
use tempfile::NamedTempFile;

/// A realistic document as published by a large site.
const SAMPLE_SECURITY_TXT: &str = "-----BEGIN PGP SIGNED MESSAGE-----
Hash: SHA256

# Our security address
Contact: mailto:security@example.com
Contact: https://example.com/security/report
Contact: tel:+1-201-555-0123
contact: mailto:psirt@example.com
Expires: 2030-12-31T23:59:59.000Z
Encryption: https://example.com/pgp-key.txt
Acknowledgments: https://example.com/hall-of-fame.html
Preferred-Languages: en, fr
Canonical: https://example.com/.well-known/security.txt
Policy: https://example.com/disclosure-policy.html
Hiring: https://example.com/jobs.html
-----BEGIN PGP SIGNATURE-----

iQIzBAEBCAAdFiEE+FAKESIGNATURE
-----END PGP SIGNATURE-----
";

/// Helper to create a temporary security.txt file with test content
fn create_test_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn sectxt() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sectxt"))
}

#[test]
fn test_parse_signed_document() {
    let sink = CollectingSink::new();
    let fields = parse(SAMPLE_SECURITY_TXT.as_bytes(), &sink).unwrap();

    assert_eq!(
        fields.get("contact").unwrap().as_slice(),
        [
            "mailto:security@example.com",
            "https://example.com/security/report",
            "tel:+1-201-555-0123",
            "mailto:psirt@example.com",
        ]
    );
    assert_eq!(
        fields.get("preferred-languages"),
        Some(&FieldValue::Scalar("en, fr".into()))
    );
    // The armor lines without a colon are reported, never fatal.
    let malformed = sink
        .take()
        .into_iter()
        .filter(|d| matches!(d, Diagnostic::MalformedLine { .. }))
        .count();
    assert_eq!(malformed, 4);
    // "Hash: SHA256" is a syntactically valid line.
    assert_eq!(
        fields.get("hash"),
        Some(&FieldValue::Scalar("SHA256".into()))
    );
}

#[tokio::test]
async fn test_resolve_from_published_document() {
    let source = StaticSource::new().with_document("example.com", SAMPLE_SECURITY_TXT);
    let resolved = resolve_contacts("example.com", &source, &NullSink).await;
    assert_eq!(
        resolved.addresses(),
        ["security@example.com", "psirt@example.com"]
    );
    assert_eq!(resolved.origin, ContactOrigin::SecurityTxt);
}

#[tokio::test]
async fn test_fetch_failure_falls_back() {
    let sink = CollectingSink::new();
    let resolved = resolve_contacts("foo.test", &StaticSource::new(), &sink).await;
    assert_eq!(resolved.addresses(), ["security@foo.test"]);

    let diags = sink.take();
    assert!(matches!(diags.first(), Some(Diagnostic::FetchFailed { .. })));
    assert!(matches!(diags.last(), Some(Diagnostic::FallbackUsed { .. })));
}

#[tokio::test]
async fn test_fetch_security_txt_returns_field_map() {
    let source = StaticSource::new().with_document("example.org", "Contact: mailto:a@example.org\n");
    let fields = fetch_security_txt("example.org", &source, &NullSink)
        .await
        .unwrap();
    assert_eq!(fields.len(), 1);
    assert!(
        fetch_security_txt("missing.test", &source, &NullSink)
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_batch_resolution_is_independent_per_host() {
    let source: Arc<dyn DocumentSource> = Arc::new(
        StaticSource::new()
            .with_document("a.test", "Contact: mailto:x@a.test\nContact: mailto:x@a.test\n")
            .with_document("b.test", b"\xc3\x28 not utf-8".to_vec()),
    );
    let hosts = vec!["a.test".to_string(), "b.test".to_string()];
    let sink = Arc::new(CollectingSink::new());
    let resolved = resolve_many(&hosts, source, sink.clone(), 4).await.unwrap();

    assert_eq!(resolved[0].addresses(), ["x@a.test", "x@a.test"]);
    assert!(resolved[1].is_fallback());
    assert!(
        sink.snapshot()
            .iter()
            .any(|d| matches!(d, Diagnostic::DecodeFailure { .. }))
    );
}

#[test]
fn test_files_mode_json() {
    let file = create_test_file(b"Contact: mailto:a@x.com\nCONTACT: mailto:b@x.com\nnonsense\n");
    let output = sectxt()
        .arg("--files")
        .arg("--no-metadata")
        .arg("--verbose=0")
        .arg(file.path())
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = str::from_utf8(&output.stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(stdout).unwrap();
    let doc = &v["documents"][0];
    assert_eq!(doc["source"], "file");
    assert_eq!(
        doc["fields"]["contact"],
        serde_json::json!(["mailto:a@x.com", "mailto:b@x.com"])
    );
    assert!(v.get("metadata").is_none());
}

#[test]
fn test_files_mode_undecodable_is_null() {
    let file = create_test_file(b"Contact: \xff\xff\n");
    let output = sectxt()
        .args(["-f", "--verbose=0", "--format", "yaml"])
        .arg(file.path())
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = str::from_utf8(&output.stdout).unwrap();
    assert!(stdout.contains("fields: null"), "unexpected output: {stdout}");
}

#[test]
fn test_files_mode_missing_file_fails() {
    let output = sectxt()
        .args(["-f", "/nonexistent/dir/security.txt"])
        .output()
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(1));
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("/nonexistent/dir/security.txt"), "{stderr}");
}

#[test]
fn test_invalid_hostname_rejected() {
    let output = sectxt()
        .args(["--contacts", "not a host/name"])
        .output()
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(2));
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("Invalid hostname"), "{stderr}");
}

#[test]
fn test_invalid_configuration_is_usage_error() {
    let output = sectxt()
        .env("SECTXT_MAX_CONCURRENT", "0")
        .args(["--contacts", "example.com"])
        .output()
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(2));
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("Configuration error"), "{stderr}");
}

#[tokio::test]
async fn test_internationalized_contact_survives_resolution() {
    let source = StaticSource::new().with_document(
        "bücher.de",
        "Contact: mailto:sécurité@bücher.de?subject=vuln\n",
    );
    let sink = CollectingSink::new();
    let resolved = resolve_contacts("bücher.de", &source, &sink).await;
    assert_eq!(resolved.addresses(), ["sécurité@bücher.de"]);
    assert!(
        sink.take()
            .iter()
            .any(|d| matches!(d, Diagnostic::MailtoComponentsIgnored { .. }))
    );
}

#[test]
fn test_generate_schema() {
    let output = sectxt()
        .arg("--generate-schema")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["title"], "SecTxtOutput");
}

#[test]
fn test_no_targets_is_usage_error() {
    let output = sectxt().output().expect("Failed to execute binary");
    assert!(!output.status.success());
}
