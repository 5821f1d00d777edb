// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The frozen result of merging a document set for one role.

use super::merge::{KindConflict, Merger};
use super::loader::DocumentSet;
use super::node::ConfigNode;
use super::role::Role;

/// The merged configuration for the active role.
///
/// Built once and never mutated. Typed access goes through the generated
/// accessor structs; [`ResolvedConfig::lookup`] is the dynamic fallback for
/// callers that only know a dotted path at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    role: Role,
    root: ConfigNode,
    override_name: Option<String>,
    conflicts: Vec<KindConflict>,
}

impl ResolvedConfig {
    /// Merge the base document with the override for `role`, if one exists.
    ///
    /// Documents for other roles are ignored.
    pub fn from_documents(documents: &DocumentSet, role: Role) -> Self {
        let overlay = documents.override_for(role);
        match overlay {
            Some(doc) => tracing::debug!("Merging {} over {}", doc.name, documents.base.name),
            None => tracing::debug!("No {} override, using {} as is", role, documents.base.name),
        }

        let mut merger = Merger::new();
        let root = merger.merge(&documents.base.root, overlay.map(|doc| &doc.root));

        Self {
            role,
            root,
            override_name: overlay.map(|doc| doc.name.clone()),
            conflicts: merger.into_conflicts(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    /// File name of the override document that was merged, if any.
    pub fn override_name(&self) -> Option<&str> {
        self.override_name.as_deref()
    }

    /// Kind conflicts found while merging.
    pub fn conflicts(&self) -> &[KindConflict] {
        &self.conflicts
    }

    /// Look up a node by dotted path (`db.pool.size`).
    ///
    /// Keys that themselves contain a dot cannot be reached this way. An empty
    /// path returns the root.
    pub fn lookup(&self, path: &str) -> Option<&ConfigNode> {
        if path.is_empty() {
            return Some(&self.root);
        }
        path.split('.')
            .try_fold(&self.root, |node, segment| node.get(segment))
    }

    /// Dotted paths of every leaf in the resolved tree.
    pub fn leaf_paths(&self) -> Vec<String> {
        self.root.leaf_paths()
    }
}
