//! Integration tests for the wsdl2cpp binary.

#![allow(deprecated)] // cargo_bin is deprecated but works fine for standard builds

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn wsdl2cpp() -> Command {
    Command::cargo_bin("wsdl2cpp").unwrap()
}

fn wsdl_file(dir: &TempDir) -> String {
    let path = dir.path().join("calc.wsdl");
    fs::write(&path, "<definitions/>").unwrap();
    path.to_str().unwrap().to_string()
}

// ============================================================================
// Help and version
// ============================================================================

#[test]
fn test_help_exits_successfully() {
    wsdl2cpp()
        .arg("-h")
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage:"))
        .stderr(predicate::str::contains("-namespaceMapping <mapping>"));
}

#[test]
fn test_help_long_flag() {
    wsdl2cpp()
        .arg("-help")
        .assert()
        .success()
        .stderr(predicate::str::contains("-both <basefile> <wsdlfile>"));
}

#[test]
fn test_help_wins_over_invalid_tokens() {
    wsdl2cpp()
        .args(["a.wsdl", "b.wsdl", "-bogus", "-h"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_version() {
    wsdl2cpp()
        .arg("-version")
        .assert()
        .success()
        .stderr(predicate::str::contains("KDAB's WSDL to C++ compiler 2.1"));
}

#[test]
fn test_version_short_flag() {
    wsdl2cpp()
        .args(["-v", "-o"])
        .assert()
        .success()
        .stderr(predicate::str::contains("2.1"));
}

// ============================================================================
// Usage errors
// ============================================================================

#[test]
fn test_missing_document_fails() {
    wsdl2cpp()
        .args(["-o", "out.h"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No WSDL file given"))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_two_documents_fail() {
    wsdl2cpp()
        .args(["a.wsdl", "b.wsdl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("b.wsdl"))
        .stderr(predicate::str::contains("Usage:"));
}

#[cfg(unix)]
#[test]
fn test_non_unicode_document_fails() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    wsdl2cpp()
        .arg(OsStr::from_bytes(b"\xffcalc.wsdl"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not valid Unicode"))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_no_color_applies_to_usage_errors() {
    wsdl2cpp()
        .env("CLICOLOR_FORCE", "1")
        .args(["-no-color", "a.wsdl", "b.wsdl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_missing_option_value_fails() {
    wsdl2cpp()
        .args(["a.wsdl", "-namespace"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("-namespace requires a value"));
}

#[test]
fn test_unknown_option_fails() {
    wsdl2cpp()
        .args(["-frobnicate", "a.wsdl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown option: -frobnicate"));
}

#[test]
fn test_both_with_output_fails() {
    wsdl2cpp()
        .args(["-both", "base", "-o", "x", "a.wsdl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("-both cannot be combined"))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_missing_mapping_file_fails() {
    wsdl2cpp()
        .args(["-namespaceMapping", "@/nonexistent/ns.map", "a.wsdl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error reading /nonexistent/ns.map"))
        .stderr(predicate::str::contains("Usage:"));
}

// ============================================================================
// Successful runs
// ============================================================================

#[test]
fn test_header_only_run() {
    let dir = TempDir::new().unwrap();
    let document = wsdl_file(&dir);
    let output = dir.path().join("calc.h");

    wsdl2cpp()
        .args(["-no-color", "-o", output.to_str().unwrap(), document.as_str()])
        .assert()
        .success()
        .stderr(predicate::str::contains("HeaderOnly"))
        .stderr(predicate::str::contains("calc.h"));
}

#[test]
fn test_both_run_lists_outputs() {
    let dir = TempDir::new().unwrap();
    let document = wsdl_file(&dir);
    let base = dir.path().join("calc");

    wsdl2cpp()
        .args(["-both", base.to_str().unwrap(), document.as_str()])
        .assert()
        .success()
        .stderr(predicate::str::contains("calc.h"))
        .stderr(predicate::str::contains("calc.cpp"));
}

#[test]
fn test_verbose_logs_configuration() {
    let dir = TempDir::new().unwrap();
    let document = wsdl_file(&dir);
    let mapping = dir.path().join("ns.map");
    fs::write(&mapping, "# comment\n\nhttp://a=b\n").unwrap();
    let mapping_arg = format!("@{}", mapping.display());

    wsdl2cpp()
        .args([
            "-verbose",
            "-namespaceMapping",
            mapping_arg.as_str(),
            document.as_str(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration:"))
        .stderr(predicate::str::contains("\"http://a\": \"b\""));
}

#[test]
fn test_missing_document_file_fails() {
    wsdl2cpp()
        .arg("/nonexistent/calc.wsdl")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("WSDL file not found"))
        .stderr(predicate::str::contains("Usage:").not());
}

#[test]
fn test_local_files_only_without_copy_fails() {
    let dir = TempDir::new().unwrap();

    wsdl2cpp()
        .args([
            "-use-local-files-only",
            "-import-path",
            dir.path().to_str().unwrap(),
            "http://example.com/calc.wsdl",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("downloads are disabled"));
}

// ============================================================================
// Client certificates
// ============================================================================

#[cfg(feature = "tls")]
#[test]
fn test_missing_certificate_file_fails() {
    let dir = TempDir::new().unwrap();
    let document = wsdl_file(&dir);

    wsdl2cpp()
        .args(["-pkcs12file", "/nonexistent/id.p12", document.as_str()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Failed to open the /nonexistent/id.p12 certificate file for reading",
        ));
}

#[cfg(feature = "tls")]
#[test]
fn test_unreadable_certificate_without_password_hints_protection() {
    let dir = TempDir::new().unwrap();
    let document = wsdl_file(&dir);
    let bundle = dir.path().join("id.p12");
    fs::write(&bundle, b"not a bundle").unwrap();

    wsdl2cpp()
        .args(["-pkcs12file", bundle.to_str().unwrap(), document.as_str()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Maybe it is password protected?"));
}

#[cfg(feature = "tls")]
#[test]
fn test_unreadable_certificate_with_password_hints_password() {
    let dir = TempDir::new().unwrap();
    let document = wsdl_file(&dir);
    let bundle = dir.path().join("id.p12");
    fs::write(&bundle, b"not a bundle").unwrap();

    wsdl2cpp()
        .args([
            "-pkcs12file",
            bundle.to_str().unwrap(),
            "-pkcs12password",
            "secret",
            document.as_str(),
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("correct password"));
}
