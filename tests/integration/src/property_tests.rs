//! Cross-cutting properties of full engine runs

use std::fs;
use std::os::unix::fs::PermissionsExt;

use conform_core::{FileSpec, Request, Status, run};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn one_fixing_run_converges_for_every_requested_dimension() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("managed");
    let template = dir.path().join("template");
    fs::write(&template, "managed by conform\n").unwrap();

    // Owner/group of the tempdir are the test process's own identities, so
    // the chown below is a permitted no-op change.
    use std::os::unix::fs::MetadataExt;
    let md = fs::metadata(dir.path()).unwrap();
    let owner = conform_core::identity::user_for_uid(md.uid()).unwrap();
    let group = conform_core::identity::group_for_gid(md.gid()).unwrap();

    let request = Request {
        check_only: false,
        files: vec![FileSpec {
            path: target.display().to_string(),
            mode: Some("0640".to_string()),
            owner: Some(owner),
            group: Some(group),
            content_source: Some(template.display().to_string()),
            ..Default::default()
        }],
    };

    let first = run(&request);
    assert_eq!(first.status, Status::Success);
    assert_eq!(first.files_fixed, 1);

    // Every subsequent run finds nothing to do.
    for _ in 0..2 {
        let again = run(&request);
        assert_eq!(again.status, Status::Success);
        assert_eq!(again.files_fixed, 0);
        assert!(again.details[0].compliant);
        assert!(again.compliance_issues.is_empty());
    }

    assert_eq!(fs::read_to_string(&target).unwrap(), "managed by conform\n");
    let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o7777;
    assert_eq!(mode, 0o640);
}

#[test]
fn check_only_never_mutates_regardless_of_findings() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let drifted = dir.path().join("drifted");
    fs::write(&drifted, "old content").unwrap();
    fs::set_permissions(&drifted, fs::Permissions::from_mode(0o666)).unwrap();

    let request = Request {
        check_only: true,
        files: vec![
            FileSpec {
                path: missing.display().to_string(),
                content: Some("should not appear".to_string()),
                ..Default::default()
            },
            FileSpec {
                path: drifted.display().to_string(),
                mode: Some("0600".to_string()),
                content: Some("new content".to_string()),
                ..Default::default()
            },
        ],
    };

    let response = run(&request);

    assert_eq!(response.status, Status::NonCompliant);
    assert_eq!(response.files_fixed, 0);
    assert!(!missing.exists());
    assert_eq!(fs::read_to_string(&drifted).unwrap(), "old content");
    let mode = fs::metadata(&drifted).unwrap().permissions().mode() & 0o7777;
    assert_eq!(mode, 0o666);
}

#[test]
fn files_fixed_never_exceeds_files_checked() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::write(&b, "present").unwrap();

    let request = Request {
        check_only: false,
        files: vec![
            FileSpec {
                path: a.display().to_string(),
                ..Default::default()
            },
            FileSpec {
                path: b.display().to_string(),
                ..Default::default()
            },
            FileSpec::default(),
        ],
    };

    let response = run(&request);
    assert_eq!(response.files_checked, 2);
    assert!(response.files_fixed <= response.files_checked);
    assert_eq!(response.files_fixed, 1, "only the missing file needed a fix");
}

#[test]
fn encoded_response_decodes_back_to_the_same_tree() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let request = Request {
        check_only: true,
        files: vec![FileSpec {
            path: missing.display().to_string(),
            mode: Some("0600".to_string()),
            ..Default::default()
        }],
    };

    let response = run(&request);
    let tree = response.to_value();
    let decoded = conform_codec::parse(&conform_codec::encode(&tree)).unwrap();
    assert_eq!(decoded, tree);
}
