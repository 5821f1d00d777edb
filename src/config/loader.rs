// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration document discovery and parsing.

use crate::error::LoadError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::node::{convert, ConfigNode, ScalarValue};
use super::role::{DocumentRole, Role};

/// Document formats understood by the loader, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            "toml" => Some(DocumentFormat::Toml),
            "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }

    /// Parse document text into a tree.
    pub fn parse(&self, content: &str) -> std::result::Result<ConfigNode, String> {
        match self {
            DocumentFormat::Yaml => {
                if is_blank_yaml(content) {
                    return Ok(ConfigNode::null());
                }
                let mut value: serde_yaml::Value =
                    serde_yaml::from_str(content).map_err(|e| e.to_string())?;
                value
                    .apply_merge()
                    .map_err(|e| format!("invalid merge key: {}", e))?;
                convert::from_yaml(value)
            }
            DocumentFormat::Toml => {
                let value: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
                Ok(convert::from_toml(value))
            }
            DocumentFormat::Json => {
                let value: serde_json::Value =
                    serde_json::from_str(content).map_err(|e| e.to_string())?;
                Ok(convert::from_json(value))
            }
        }
    }
}

/// True when a YAML document holds only comments and separators.
fn is_blank_yaml(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

/// A parsed configuration document.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    /// File name the document was read from.
    pub name: String,
    /// Full path of the file.
    pub path: PathBuf,
    /// Role derived from the file name.
    pub role: DocumentRole,
    /// Top-level node, always a mapping.
    pub root: ConfigNode,
}

/// The documents discovered in one configuration directory.
#[derive(Debug, Clone)]
pub struct DocumentSet {
    pub dir: PathBuf,
    pub base: ConfigDocument,
    /// At most one document per role, in file-name order.
    pub overrides: Vec<ConfigDocument>,
    /// Files with a recognized prefix but an unsupported extension.
    pub skipped: Vec<PathBuf>,
}

impl DocumentSet {
    /// The override document for a role, if present.
    pub fn override_for(&self, role: Role) -> Option<&ConfigDocument> {
        self.overrides
            .iter()
            .find(|doc| doc.role == DocumentRole::Override(role))
    }

    /// All documents, base first.
    pub fn documents(&self) -> impl Iterator<Item = &ConfigDocument> {
        std::iter::once(&self.base).chain(self.overrides.iter())
    }

    /// Number of documents discovered.
    pub fn count(&self) -> usize {
        1 + self.overrides.len()
    }
}

/// A file that matched a role prefix and a supported format.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub path: PathBuf,
    pub role: DocumentRole,
    pub format: DocumentFormat,
}

/// Outcome of scanning a directory, before any document is parsed.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<PathBuf>,
}

/// Scan the top level of a directory for configuration documents.
///
/// Unrelated files are ignored. Entries are visited in file-name order.
pub fn discover_documents(dir: &Path) -> std::result::Result<Discovery, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut discovery = Discovery::default();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| LoadError::Unreadable {
            path: e.path().unwrap_or(dir).to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let Some(role) = DocumentRole::from_file_name(&name) else {
            continue;
        };

        match DocumentFormat::from_path(entry.path()) {
            Some(format) => {
                tracing::debug!("Found {} document: {}", role, name);
                discovery.candidates.push(Candidate {
                    name,
                    path: entry.path().to_path_buf(),
                    role,
                    format,
                });
            }
            None => {
                tracing::warn!("Skipping {}: unsupported document format", name);
                discovery.skipped.push(entry.path().to_path_buf());
            }
        }
    }

    tracing::info!(
        count = discovery.candidates.len(),
        "Discovered configuration documents in {}",
        dir.display()
    );

    Ok(discovery)
}

/// Parse a single document and check that it is a mapping.
pub fn load_document(candidate: &Candidate) -> std::result::Result<ConfigDocument, LoadError> {
    tracing::debug!("Loading document from: {:?}", candidate.path);

    let content = std::fs::read_to_string(&candidate.path).map_err(|e| LoadError::Parse {
        path: candidate.path.clone(),
        message: format!("Failed to read document: {}", e),
    })?;

    let root = parse_document(&content, candidate.format).map_err(|message| LoadError::Parse {
        path: candidate.path.clone(),
        message,
    })?;

    Ok(ConfigDocument {
        name: candidate.name.clone(),
        path: candidate.path.clone(),
        role: candidate.role,
        root,
    })
}

/// Parse document text, enforcing a top-level mapping.
///
/// An empty YAML document (null) becomes an empty mapping.
pub fn parse_document(
    content: &str,
    format: DocumentFormat,
) -> std::result::Result<ConfigNode, String> {
    match format.parse(content)? {
        root @ ConfigNode::Mapping(_) => Ok(root),
        ConfigNode::Scalar(ScalarValue::Null) if format == DocumentFormat::Yaml => {
            Ok(ConfigNode::empty_mapping())
        }
        other => Err(format!(
            "top-level value must be a mapping, found {}",
            other.kind()
        )),
    }
}

/// Discover and parse every document in a directory.
pub fn load_documents(dir: &Path) -> std::result::Result<DocumentSet, LoadError> {
    let discovery = discover_documents(dir)?;

    if discovery.candidates.is_empty() {
        return Err(LoadError::NoValidDocuments {
            dir: dir.to_path_buf(),
        });
    }

    let mut base: Option<ConfigDocument> = None;
    let mut overrides: Vec<ConfigDocument> = Vec::new();

    for candidate in &discovery.candidates {
        let previous = if candidate.role.is_base() {
            base.as_ref()
        } else {
            overrides.iter().find(|doc| doc.role == candidate.role)
        };
        if let Some(previous) = previous {
            return Err(LoadError::DuplicateRole {
                role: candidate.role,
                first: previous.path.clone(),
                second: candidate.path.clone(),
            });
        }

        let document = load_document(candidate)?;
        if document.role.is_base() {
            base = Some(document);
        } else {
            overrides.push(document);
        }
    }

    let base = base.ok_or_else(|| LoadError::MissingBase {
        dir: dir.to_path_buf(),
    })?;

    Ok(DocumentSet {
        dir: dir.to_path_buf(),
        base,
        overrides,
        skipped: discovery.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let err = load_documents(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_unrelated_files_only() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "random.txt", "hello");
        let err = load_documents(temp.path()).unwrap_err();
        assert!(matches!(err, LoadError::NoValidDocuments { .. }));
    }

    #[test]
    fn test_loads_base_and_overrides() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "defaults.yaml", "db:\n  host: localhost\n");
        write(temp.path(), "dev.yaml", "db:\n  port: 5433\n");
        write(temp.path(), "production.toml", "[db]\nhost = \"db.internal\"\n");
        write(temp.path(), "notes.md", "ignored");

        let set = load_documents(temp.path()).unwrap();
        assert_eq!(set.count(), 3);
        assert_eq!(set.base.name, "defaults.yaml");
        assert!(set.override_for(Role::Dev).is_some());
        assert!(set.override_for(Role::Production).is_some());
        assert!(set.override_for(Role::Test).is_none());
    }

    #[test]
    fn test_comment_only_override_is_empty_mapping() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "defaults.yaml", "name: svc\n");
        write(temp.path(), "test.yaml", "# auto generated\n");

        let set = load_documents(temp.path()).unwrap();
        let test_doc = set.override_for(Role::Test).unwrap();
        assert_eq!(test_doc.root, ConfigNode::empty_mapping());
    }

    #[test]
    fn test_yaml_merge_keys_applied() {
        let node = parse_document(
            "base: &base\n  host: localhost\n  port: 5432\nreplica:\n  <<: *base\n  host: replica\n",
            DocumentFormat::Yaml,
        )
        .unwrap();

        let replica = node.get("replica").unwrap();
        assert_eq!(replica.get("host").and_then(ConfigNode::as_str), Some("replica"));
        assert_eq!(replica.get("port"), Some(&ConfigNode::integer(5432)));
        assert!(replica.get("<<").is_none());
    }

    #[test]
    fn test_invalid_merge_key_rejected() {
        let err = parse_document("a:\n  <<: 3\n", DocumentFormat::Yaml).unwrap_err();
        assert!(err.contains("merge"));
    }

    #[test]
    fn test_json_null_document_rejected() {
        let err = parse_document("null", DocumentFormat::Json).unwrap_err();
        assert!(err.contains("mapping"));
        assert_eq!(
            parse_document("~\n", DocumentFormat::Yaml).unwrap(),
            ConfigNode::empty_mapping()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("locked");
        std::fs::create_dir(&dir).unwrap();
        write(&dir, "defaults.yaml", "a: 1\n");
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory
        let listable = std::fs::read_dir(&dir).is_ok();
        let result = load_documents(&dir);
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();

        if !listable {
            assert!(matches!(result, Err(LoadError::Unreadable { .. })));
        }
    }

    #[test]
    fn test_scalar_document_rejected() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "defaults.yaml", "just a string\n");
        let err = load_documents(temp.path()).unwrap_err();
        match err {
            LoadError::Parse { message, .. } => assert!(message.contains("mapping")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_document() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "defaults.yaml", "a: [1, 2\n");
        let err = load_documents(temp.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_missing_base() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "dev.yaml", "a: 1\n");
        let err = load_documents(temp.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingBase { .. }));
    }

    #[test]
    fn test_duplicate_role() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "defaults.yaml", "a: 1\n");
        write(temp.path(), "dev.yaml", "a: 2\n");
        write(temp.path(), "dev.local.yml", "a: 3\n");
        let err = load_documents(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::DuplicateRole {
                role: DocumentRole::Override(Role::Dev),
                ..
            }
        ));
    }

    #[test]
    fn test_unsupported_extension_is_skipped() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "defaults.yaml", "a: 1\n");
        write(temp.path(), "dev.ini", "a=2\n");

        let set = load_documents(temp.path()).unwrap();
        assert_eq!(set.count(), 1);
        assert_eq!(set.skipped.len(), 1);
    }

    #[test]
    fn test_subdirectories_ignored() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "defaults.yaml", "a: 1\n");
        std::fs::create_dir(temp.path().join("dev")).unwrap();
        write(&temp.path().join("dev"), "dev.yaml", "a: 2\n");

        let set = load_documents(temp.path()).unwrap();
        assert!(set.overrides.is_empty());
    }
}
