use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crumbtrail_router::{RouteDef, RouteTable};

/// Route definition file: `{ "routes": [ ... ] }`, JSON or TOML by
/// extension.
#[derive(Debug, Deserialize)]
pub struct RoutesFile {
    pub routes: Vec<RouteDef>,
}

pub fn load_defs(path: &Path) -> Result<Vec<RouteDef>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read route file {}", path.display()))?;
    let file: RoutesFile = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&raw)
            .with_context(|| format!("invalid TOML route file {}", path.display()))?,
        _ => serde_json::from_str(&raw)
            .with_context(|| format!("invalid JSON route file {}", path.display()))?,
    };
    Ok(file.routes)
}

pub fn load_table(path: &Path) -> Result<RouteTable> {
    let defs = load_defs(path)?;
    RouteTable::new(defs).context("invalid route table")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(name: &str, contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_json_route_files() {
        let (_dir, path) = write_fixture(
            "routes.json",
            r#"{"routes": [{"path": "/", "name": "home", "meta": {"breadcrumb": "Home"}}]}"#,
        );
        let defs = load_defs(&path).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name.as_deref(), Some("home"));
    }

    #[test]
    fn loads_toml_route_files() {
        let (_dir, path) = write_fixture(
            "routes.toml",
            r#"
[[routes]]
path = "/"
name = "home"

[routes.meta]
breadcrumb = "Home"
"#,
        );
        let defs = load_defs(&path).unwrap();
        assert_eq!(defs.len(), 1);
        let crumb = defs[0].meta.breadcrumb.as_ref().unwrap();
        assert_eq!(crumb.label.as_deref(), Some("Home"));
    }

    #[test]
    fn invalid_json_reports_the_file() {
        let (_dir, path) = write_fixture("routes.json", "not json");
        let err = load_defs(&path).unwrap_err();
        assert!(err.to_string().contains("routes.json"));
    }
}
