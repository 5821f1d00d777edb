// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Starter configuration documents.
//!
//! `cfglayer scaffold` writes a base document with one section per chosen
//! flavor, plus empty override documents for every role.

mod flavors;
mod wizard;

pub use flavors::Flavor;
pub use wizard::{ScaffoldPlan, ScaffoldWizard};

use crate::config::Role;
use crate::error::{Result, ResultExt, ScaffoldError};
use std::fs;
use std::path::{Path, PathBuf};

/// First line of every scaffolded document.
pub const SCAFFOLD_HEADER: &str = "# auto generated by cfglayer\n";

/// Name of the scaffolded base document.
pub const BASE_FILE: &str = "defaults.yaml";

/// Every file `scaffold` may write; a directory holding any of them is not clean.
pub fn starter_files() -> Vec<String> {
    std::iter::once(BASE_FILE.to_string())
        .chain(Role::all().iter().map(|role| format!("{}.yaml", role.file_prefix())))
        .collect()
}

/// Files written by a scaffold run.
#[derive(Debug, Clone)]
pub struct Scaffolded {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
    /// Content of the base document.
    pub defaults: String,
}

/// Make sure `dir` exists, creating it when allowed.
pub fn prepare_dir(dir: &Path, create: bool) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    if !create {
        return Err(ScaffoldError::MissingDirectory {
            dir: dir.to_path_buf(),
        }
        .into());
    }
    tracing::debug!("Creating directory {:?}", dir);
    fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))
}

/// Refuse a directory that already holds starter documents.
pub fn check_clean_dir(dir: &Path) -> std::result::Result<(), ScaffoldError> {
    if !dir.is_dir() {
        return Err(ScaffoldError::MissingDirectory {
            dir: dir.to_path_buf(),
        });
    }
    match starter_files().into_iter().find(|name| dir.join(name).exists()) {
        Some(file) => Err(ScaffoldError::DirectoryNotClean {
            dir: dir.to_path_buf(),
            file,
        }),
        None => Ok(()),
    }
}

/// Render the base document for a set of flavors.
///
/// Sections appear in the order given; repeated flavors are written once.
pub fn render_defaults(flavors: &[Flavor]) -> std::result::Result<String, ScaffoldError> {
    if flavors.is_empty() {
        return Err(ScaffoldError::NoFlavors);
    }

    let mut sections = serde_yaml::Mapping::new();
    for flavor in flavors {
        let key = serde_yaml::Value::String(flavor.as_str().to_string());
        if sections.contains_key(&key) {
            continue;
        }
        let body: serde_yaml::Value =
            serde_yaml::from_str(flavor.template()).map_err(|e| invalid_template(*flavor, e))?;
        sections.insert(key, body);
    }

    let body = serde_yaml::to_string(&sections).map_err(|e| ScaffoldError::InvalidTemplate {
        flavor: flavors
            .iter()
            .map(Flavor::as_str)
            .collect::<Vec<_>>()
            .join(","),
        message: e.to_string(),
    })?;

    Ok(format!("{}{}", SCAFFOLD_HEADER, body))
}

fn invalid_template(flavor: Flavor, err: serde_yaml::Error) -> ScaffoldError {
    ScaffoldError::InvalidTemplate {
        flavor: flavor.to_string(),
        message: err.to_string(),
    }
}

/// Write the base document and header-only overrides into a clean directory.
pub fn write_starter_files(dir: &Path, flavors: &[Flavor]) -> Result<Scaffolded> {
    check_clean_dir(dir)?;
    let defaults = render_defaults(flavors)?;

    let mut files = Vec::new();
    for name in starter_files() {
        let path = dir.join(&name);
        let content = if name == BASE_FILE {
            defaults.as_str()
        } else {
            SCAFFOLD_HEADER
        };
        fs::write(&path, content).context(format!("Failed to write {}", path.display()))?;
        tracing::debug!("Wrote {:?}", path);
        files.push(path);
    }

    Ok(Scaffolded {
        dir: dir.to_path_buf(),
        files,
        defaults,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{self, BuildContext};
    use crate::config::ConfigNode;
    use crate::error::CfgError;
    use tempfile::TempDir;

    #[test]
    fn test_starter_files() {
        assert_eq!(
            starter_files(),
            vec!["defaults.yaml", "dev.yaml", "test.yaml", "production.yaml"]
        );
    }

    #[test]
    fn test_render_defaults_sections_in_order() {
        let content = render_defaults(&[Flavor::Redis, Flavor::Logging, Flavor::Redis]).unwrap();
        assert!(content.starts_with(SCAFFOLD_HEADER));

        let redis = content.find("\nredis:").unwrap();
        let logging = content.find("\nlogging:").unwrap();
        assert!(redis < logging);
        assert_eq!(content.matches("\nredis:").count(), 1);
    }

    #[test]
    fn test_render_defaults_requires_flavor() {
        assert!(matches!(render_defaults(&[]), Err(ScaffoldError::NoFlavors)));
    }

    #[test]
    fn test_write_starter_files() {
        let temp = TempDir::new().unwrap();
        let scaffolded = write_starter_files(temp.path(), &[Flavor::Postgres]).unwrap();

        assert_eq!(scaffolded.files.len(), 4);
        let dev = fs::read_to_string(temp.path().join("dev.yaml")).unwrap();
        assert_eq!(dev, SCAFFOLD_HEADER);
        let defaults = fs::read_to_string(temp.path().join("defaults.yaml")).unwrap();
        assert_eq!(defaults, scaffolded.defaults);
        assert!(defaults.contains("postgres:"));
    }

    #[test]
    fn test_scaffold_output_builds() {
        let temp = TempDir::new().unwrap();
        write_starter_files(temp.path(), Flavor::all()).unwrap();

        let resolution = build::resolve(&BuildContext::new(temp.path(), Role::Dev)).unwrap();
        assert_eq!(
            resolution.config.lookup("mysql.port"),
            Some(&ConfigNode::integer(3306))
        );
        assert_eq!(resolution.documents.count(), 4);
    }

    #[test]
    fn test_refuses_dirty_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("test.yaml"), "a: 1\n").unwrap();

        let err = write_starter_files(temp.path(), &[Flavor::Mq]).unwrap_err();
        match err {
            CfgError::Scaffold(ScaffoldError::DirectoryNotClean { file, .. }) => {
                assert_eq!(file, "test.yaml");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_prepare_dir() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("conf");

        assert!(matches!(
            prepare_dir(&missing, false),
            Err(CfgError::Scaffold(ScaffoldError::MissingDirectory { .. }))
        ));
        prepare_dir(&missing, true).unwrap();
        assert!(missing.is_dir());
    }
}
