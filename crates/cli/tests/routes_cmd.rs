use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn write_routes(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("routes.toml");
    fs::write(
        &path,
        r#"
[[routes]]
path = "/"
name = "home"

[routes.meta]
breadcrumb = "Home"

[[routes.children]]
path = "settings"
name = "settings"
"#,
    )
    .unwrap();
    path
}

#[test]
fn routes_lists_every_definition() {
    let temp = tempdir().unwrap();
    let routes = write_routes(temp.path());

    let output = Command::cargo_bin("crumbtrail")
        .expect("binary")
        .arg("routes")
        .arg("--routes")
        .arg(&routes)
        .arg("--json")
        .output()
        .expect("command run");

    assert!(output.status.success());
    let rows: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["path"], "/");
    assert_eq!(rows[0]["label"], "Home");
    assert_eq!(rows[1]["path"], "/settings");
    assert_eq!(rows[1]["label"], "settings");
}

#[test]
fn human_listing_is_tab_separated() {
    let temp = tempdir().unwrap();
    let routes = write_routes(temp.path());

    Command::cargo_bin("crumbtrail")
        .expect("binary")
        .arg("routes")
        .arg("--routes")
        .arg(&routes)
        .assert()
        .success()
        .stdout(predicates::str::contains("/settings\tsettings\tsettings"));
}
