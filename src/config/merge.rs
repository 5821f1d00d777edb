// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Deep merge of a base document with a role override.
//!
//! - Mappings merge recursively: base key order is kept, override-only keys
//!   are appended in override order.
//! - Scalars and sequences are atomic; the override value replaces the base
//!   value, including an explicit null.
//! - When the two sides differ in kind the override wins wholesale and the
//!   path is recorded as a [`KindConflict`].

use serde::Serialize;

use super::node::{join_path, ConfigNode, Mapping, NodeKind};

/// A key where base and override disagree on node kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindConflict {
    /// Dotted path of the key.
    pub path: String,
    pub base: NodeKind,
    pub overlay: NodeKind,
}

/// Merge `overlay` over `base`, returning a new tree.
pub fn merge(base: &ConfigNode, overlay: Option<&ConfigNode>) -> ConfigNode {
    Merger::default().merge(base, overlay)
}

/// Merge engine that keeps track of structural conflicts.
#[derive(Debug, Default)]
pub struct Merger {
    conflicts: Vec<KindConflict>,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `overlay` over `base`. Neither input is modified.
    pub fn merge(&mut self, base: &ConfigNode, overlay: Option<&ConfigNode>) -> ConfigNode {
        match overlay {
            None => base.clone(),
            Some(overlay) => self.merge_at("", base, overlay),
        }
    }

    /// Conflicts recorded so far, in the order they were found.
    pub fn conflicts(&self) -> &[KindConflict] {
        &self.conflicts
    }

    pub fn into_conflicts(self) -> Vec<KindConflict> {
        self.conflicts
    }

    fn merge_at(&mut self, path: &str, base: &ConfigNode, overlay: &ConfigNode) -> ConfigNode {
        match (base, overlay) {
            (ConfigNode::Mapping(base_map), ConfigNode::Mapping(overlay_map)) => {
                ConfigNode::Mapping(self.merge_mappings(path, base_map, overlay_map))
            }
            (base, overlay) => {
                if base.kind() != overlay.kind() {
                    tracing::warn!(
                        "'{}' is a {} in the base document but a {} in the override; override wins",
                        display_path(path),
                        base.kind(),
                        overlay.kind()
                    );
                    self.conflicts.push(KindConflict {
                        path: path.to_string(),
                        base: base.kind(),
                        overlay: overlay.kind(),
                    });
                }
                overlay.clone()
            }
        }
    }

    fn merge_mappings(&mut self, path: &str, base: &Mapping, overlay: &Mapping) -> Mapping {
        let mut merged = Mapping::new();

        for (key, base_value) in base.iter() {
            let value = match overlay.get(key) {
                Some(overlay_value) => self.merge_at(&join_path(path, key), base_value, overlay_value),
                None => base_value.clone(),
            };
            merged.insert(key, value);
        }

        for (key, overlay_value) in overlay.iter() {
            if !base.contains_key(key) {
                merged.insert(key, overlay_value.clone());
            }
        }

        merged
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::node::convert;

    fn yaml(text: &str) -> ConfigNode {
        convert::from_yaml(serde_yaml::from_str(text).unwrap()).unwrap()
    }

    fn keys(node: &ConfigNode) -> Vec<&str> {
        node.as_mapping().unwrap().keys().collect()
    }

    #[test]
    fn test_absent_override_is_identity() {
        let base = yaml("name: svc\nnested:\n  a: [1, 2]\n");
        assert_eq!(merge(&base, None), base);
    }

    #[test]
    fn test_empty_override_is_identity() {
        let base = yaml("name: svc\nnested:\n  a: 1\n");
        assert_eq!(merge(&base, Some(&ConfigNode::empty_mapping())), base);
    }

    #[test]
    fn test_nested_override() {
        let base = yaml("db:\n  host: localhost\n  port: 5432\n");
        let overlay = yaml("db:\n  port: 5433\n");
        let expected = yaml("db:\n  host: localhost\n  port: 5433\n");
        assert_eq!(merge(&base, Some(&overlay)), expected);
    }

    #[test]
    fn test_key_order_base_then_override_only() {
        let base = yaml("b: 1\na: 2\n");
        let overlay = yaml("z: 9\na: 3\ny: 8\n");
        let merged = merge(&base, Some(&overlay));
        assert_eq!(keys(&merged), vec!["b", "a", "z", "y"]);
        assert_eq!(merged.get("a"), Some(&ConfigNode::integer(3)));
        assert_eq!(merged.get("z"), Some(&ConfigNode::integer(9)));
    }

    #[test]
    fn test_recursive_merge_matches_subtree_merge() {
        let base = yaml("k:\n  x: 1\n  inner:\n    p: a\nother: true\n");
        let overlay = yaml("k:\n  inner:\n    q: b\n  y: 2\n");
        let merged = merge(&base, Some(&overlay));
        let sub = merge(base.get("k").unwrap(), overlay.get("k"));
        assert_eq!(merged.get("k"), Some(&sub));
    }

    #[test]
    fn test_sequences_replace_atomically() {
        let base = yaml("flag: true\ntags: [a, b]\n");
        let overlay = yaml("tags: [c]\n");
        let merged = merge(&base, Some(&overlay));
        assert_eq!(
            merged.get("tags"),
            Some(&ConfigNode::Sequence(vec![ConfigNode::string("c")]))
        );
        assert_eq!(merged.get("flag"), Some(&ConfigNode::boolean(true)));
    }

    #[test]
    fn test_kind_mismatch_override_wins() {
        let base = yaml("db:\n  host: h\n");
        let overlay = yaml("db: sqlite\n");
        let mut merger = Merger::new();
        let merged = merger.merge(&base, Some(&overlay));

        assert_eq!(merged.get("db"), overlay.get("db"));
        assert_eq!(
            merger.conflicts(),
            &[KindConflict {
                path: "db".to_string(),
                base: NodeKind::Mapping,
                overlay: NodeKind::Scalar,
            }]
        );
    }

    #[test]
    fn test_null_override_replaces_scalar() {
        let base = yaml("password: secret\n");
        let overlay = yaml("password: ~\n");
        let merged = merge(&base, Some(&overlay));
        assert_eq!(merged.get("password"), Some(&ConfigNode::null()));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let base = yaml("a:\n  b: 1\n");
        let overlay = yaml("a:\n  c: 2\n");
        let base_before = base.clone();
        let overlay_before = overlay.clone();
        let _ = merge(&base, Some(&overlay));
        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn test_same_kind_scalars_record_no_conflict() {
        let mut merger = Merger::new();
        merger.merge(&yaml("a: 1\n"), Some(&yaml("a: two\n")));
        assert!(merger.conflicts().is_empty());
    }
}
