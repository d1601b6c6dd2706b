use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn write_routes(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("routes.json");
    fs::write(
        &path,
        r#"{
  "routes": [
    {
      "path": "/",
      "name": "home",
      "meta": {"breadcrumb": "Home"},
      "children": [
        {
          "path": "library",
          "name": "library",
          "meta": {"breadcrumb": {"label": "Library"}},
          "children": [
            {"path": "book/:id", "name": "book"}
          ]
        }
      ]
    }
  ]
}"#,
    )
    .unwrap();
    path
}

#[test]
fn trail_by_path_prints_labels_in_order() {
    let temp = tempdir().unwrap();
    let routes = write_routes(temp.path());

    Command::cargo_bin("crumbtrail")
        .expect("binary")
        .arg("trail")
        .arg("--routes")
        .arg(&routes)
        .arg("--path")
        .arg("/library/book/7")
        .assert()
        .success()
        .stdout("Home > Library > book\n");
}

#[test]
fn trail_by_name_substitutes_params() {
    let temp = tempdir().unwrap();
    let routes = write_routes(temp.path());

    let output = Command::cargo_bin("crumbtrail")
        .expect("binary")
        .arg("trail")
        .arg("--routes")
        .arg(&routes)
        .arg("--name")
        .arg("book")
        .arg("--param")
        .arg("id=7")
        .arg("--json")
        .output()
        .expect("command run");

    assert!(output.status.success());
    let trail: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(trail["parents"].as_array().map(Vec::len), Some(2));
    assert_eq!(trail["parents"][0]["label"], "Home");
    assert_eq!(trail["parents"][1]["label"], "Library");
    assert_eq!(trail["current"]["label"], "book");
    assert_eq!(trail["current"]["to"]["name"], "book");
}

#[test]
fn unknown_path_fails_with_a_message() {
    let temp = tempdir().unwrap();
    let routes = write_routes(temp.path());

    Command::cargo_bin("crumbtrail")
        .expect("binary")
        .arg("trail")
        .arg("--routes")
        .arg(&routes)
        .arg("--path")
        .arg("/nowhere")
        .assert()
        .failure()
        .stderr(predicates::str::contains("no route matches"));
}

#[test]
fn trail_requires_exactly_one_target() {
    let temp = tempdir().unwrap();
    let routes = write_routes(temp.path());

    Command::cargo_bin("crumbtrail")
        .expect("binary")
        .arg("trail")
        .arg("--routes")
        .arg(&routes)
        .assert()
        .failure()
        .stderr(predicates::str::contains("--path or --name"));
}
