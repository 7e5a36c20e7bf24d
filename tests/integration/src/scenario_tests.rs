//! End-to-end scenarios: request text in, response text out
//!
//! Each scenario decodes a raw request exactly as the binary would, runs
//! the engine, and validates the encoded response through an independent
//! JSON parser.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use conform_core::{Request, run};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

/// Decode request text, run the engine, and re-parse the wire response
/// with a reference JSON parser.
fn run_text(request: &str) -> serde_json::Value {
    let request = Request::decode(request).unwrap();
    let encoded = run(&request).encode();
    serde_json::from_str(&encoded).expect("response must be valid JSON")
}

#[test]
fn scenario_check_only_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let response = run_text(&format!(
        r#"{{"check_only": true, "files": [{{"path": "{}"}}]}}"#,
        missing.display()
    ));

    assert_eq!(response["status"], "non_compliant");
    assert_eq!(response["files_checked"], 1);
    assert_eq!(response["files_fixed"], 0);
    assert_eq!(
        response["compliance_issues"],
        serde_json::json!(["file_missing"])
    );
    assert_eq!(response["details"][0]["path"], missing.display().to_string());
    assert_eq!(response["details"][0]["compliant"], false);
    assert_eq!(
        response["details"][0]["issues"],
        serde_json::json!(["file_missing"])
    );
    assert!(!missing.exists());
}

#[test]
fn scenario_fixing_mode_creates_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let response = run_text(&format!(
        r#"{{"check_only": false, "files": [{{"path": "{}"}}]}}"#,
        missing.display()
    ));

    assert_eq!(response["status"], "success");
    assert_eq!(response["files_fixed"], 1);
    assert_eq!(
        response["details"][0]["fixes_applied"],
        serde_json::json!(["created_file"])
    );
    assert_eq!(fs::read(&missing).unwrap(), b"");
}

#[test]
fn scenario_mode_fix_and_recheck() {
    let dir = tempdir().unwrap();
    let conf = dir.path().join("conf");
    fs::write(&conf, "data").unwrap();
    fs::set_permissions(&conf, fs::Permissions::from_mode(0o644)).unwrap();
    let request = format!(
        r#"{{"files": [{{"path": "{}", "mode": "0600"}}]}}"#,
        conf.display()
    );

    let response = run_text(&request);
    assert_eq!(
        response["compliance_issues"],
        serde_json::json!(["mode_mismatch: current=644, required=0600"])
    );
    let fixes = response["details"][0]["fixes_applied"].as_array().unwrap();
    assert!(fixes.contains(&serde_json::json!("fixed_permissions")));

    let recheck = run_text(&request);
    assert_eq!(recheck["status"], "success");
    assert_eq!(recheck["details"][0]["compliant"], true);
}

#[test]
fn scenario_absent_source_defers_to_literal_and_absent_both_skips() {
    let dir = tempdir().unwrap();
    let conf = dir.path().join("conf");
    fs::write(&conf, "literal body").unwrap();
    let ghost = dir.path().join("never-made");

    // Literal governs when the source does not exist.
    let response = run_text(&format!(
        r#"{{"check_only": true, "files": [{{"path": "{}", "content": "literal body", "content_source": "{}"}}]}}"#,
        conf.display(),
        ghost.display()
    ));
    assert_eq!(response["status"], "success");

    // Neither present: the content dimension is skipped entirely.
    let response = run_text(&format!(
        r#"{{"check_only": true, "files": [{{"path": "{}", "content_source": "{}"}}]}}"#,
        conf.display(),
        ghost.display()
    ));
    assert_eq!(response["status"], "success");
    assert_eq!(response["compliance_issues"], serde_json::json!([]));
}

#[test]
fn scenario_unknown_owner_fails_that_file_only() {
    let dir = tempdir().unwrap();
    let doomed = dir.path().join("doomed");
    fs::write(&doomed, "x").unwrap();
    let healthy = dir.path().join("healthy");

    let response = run_text(&format!(
        r#"{{"files": [
            {{"path": "{}", "owner": "no_such_user_expected_anywhere"}},
            {{"path": "{}"}}
        ]}}"#,
        doomed.display(),
        healthy.display()
    ));

    assert_eq!(response["status"], "partial_failure");
    assert_eq!(response["files_checked"], 2);
    assert_eq!(response["files_fixed"], 1);
    assert_eq!(response["details"][0]["error"]["type"], "unknown_identity");
    assert!(
        response["details"][0]["error"]["message"]
            .as_str()
            .unwrap()
            .contains("no_such_user_expected_anywhere")
    );
    assert!(response["details"][0].get("fixes_applied").is_none());
    assert_eq!(
        response["details"][1]["fixes_applied"],
        serde_json::json!(["created_file"])
    );
    assert!(healthy.exists());
}

#[test]
fn scenario_content_source_governs_full_cycle() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("template");
    fs::write(&template, "canonical config\n").unwrap();
    let conf = dir.path().join("conf");
    fs::write(&conf, "drifted\n").unwrap();

    let request = format!(
        r#"{{"files": [{{"path": "{}", "content": "ignored", "content_source": "{}"}}]}}"#,
        conf.display(),
        template.display()
    );

    let response = run_text(&request);
    assert_eq!(response["compliance_issues"], serde_json::json!(["content_mismatch"]));
    assert_eq!(
        response["details"][0]["fixes_applied"],
        serde_json::json!(["fixed_content"])
    );
    assert_eq!(fs::read_to_string(&conf).unwrap(), "canonical config\n");

    let recheck = run_text(&request);
    assert_eq!(recheck["status"], "success");
}

#[test]
fn response_wire_form_has_canonical_key_order() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("present");
    fs::write(&present, "x").unwrap();

    let request = Request::decode(&format!(
        r#"{{"check_only": true, "files": [{{"path": "{}"}}]}}"#,
        present.display()
    ))
    .unwrap();
    let encoded = run(&request).encode();

    let expected = format!(
        r#"{{"status":"success","files_checked":1,"files_fixed":0,"compliance_issues":[],"details":[{{"path":"{}","compliant":true,"issues":[]}}]}}"#,
        present.display()
    );
    assert_eq!(encoded, expected);
}

fn touch(path: &Path) {
    fs::write(path, "").unwrap();
}

#[test]
fn files_checked_counts_only_non_empty_paths() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    touch(&a);
    touch(&b);

    let response = run_text(&format!(
        r#"{{"check_only": true, "files": [
            {{"path": "{}"}},
            {{"mode": "0644"}},
            {{"path": ""}},
            {{"path": "{}"}}
        ]}}"#,
        a.display(),
        b.display()
    ));

    assert_eq!(response["files_checked"], 2);
    assert_eq!(response["details"].as_array().unwrap().len(), 2);
}
