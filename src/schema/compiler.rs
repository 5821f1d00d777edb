// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Compiles a resolved configuration tree into an accessor schema.

use crate::config::node::join_path;
use crate::config::{ConfigNode, Mapping, ResolvedConfig, ScalarValue};
use crate::error::SchemaError;
use std::collections::{HashMap, HashSet};

use super::ident::{is_valid_identifier, nested_type_name, sanitize_key};
use super::types::{AccessorGroup, AccessorSchema, Member, PropertyDescriptor, PropertyType};

/// Names the generated source refers to; a struct with one of these names
/// would shadow it.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "String",
    "Vec",
    "Option",
    "Box",
    "Result",
    "Deserialize",
    "serde",
    "serde_json",
    "bool",
    "i64",
    "f64",
    "str",
];

/// Compile a resolved configuration.
pub fn compile(resolved: &ResolvedConfig, root_type: &str) -> Result<AccessorSchema, SchemaError> {
    compile_node(resolved.root(), root_type)
}

/// Compile any mapping node.
pub fn compile_node(root: &ConfigNode, root_type: &str) -> Result<AccessorSchema, SchemaError> {
    let ConfigNode::Mapping(mapping) = root else {
        return Err(SchemaError::NotAMapping { found: root.kind() });
    };
    if !is_valid_identifier(root_type) || RESERVED_TYPE_NAMES.contains(&root_type) {
        return Err(SchemaError::InvalidRootType {
            name: root_type.to_string(),
        });
    }

    let mut compiler = SchemaCompiler::default();
    compiler.type_names.insert(root_type.to_string());
    let root = compiler.compile_group("", "", "", root_type.to_string(), mapping)?;

    let schema = AccessorSchema { root };
    tracing::debug!(
        groups = schema.groups().len(),
        properties = schema.properties().len(),
        "Compiled accessor schema"
    );
    Ok(schema)
}

/// Infer the property type of a leaf node.
pub fn infer_type(node: &ConfigNode) -> PropertyType {
    match node {
        ConfigNode::Scalar(ScalarValue::Null) => PropertyType::Unknown,
        ConfigNode::Scalar(ScalarValue::Bool(_)) => PropertyType::Boolean,
        ConfigNode::Scalar(ScalarValue::Integer(_)) => PropertyType::Integer,
        ConfigNode::Scalar(ScalarValue::Float(_)) => PropertyType::Float,
        ConfigNode::Scalar(ScalarValue::String(_)) => PropertyType::String,
        ConfigNode::Sequence(items) => PropertyType::List(Box::new(element_type(items))),
        ConfigNode::Mapping(_) => PropertyType::Untyped,
    }
}

/// Common type of sequence elements; empty or mixed sequences are untyped.
fn element_type(items: &[ConfigNode]) -> PropertyType {
    items
        .iter()
        .map(|item| match infer_type(item) {
            PropertyType::Unknown => PropertyType::Untyped,
            ty => ty,
        })
        .reduce(PropertyType::unify)
        .unwrap_or(PropertyType::Untyped)
}

#[derive(Debug, Default)]
struct SchemaCompiler {
    type_names: HashSet<String>,
}

impl SchemaCompiler {
    fn compile_group(
        &mut self,
        key: &str,
        ident: &str,
        path: &str,
        type_name: String,
        mapping: &Mapping,
    ) -> Result<AccessorGroup, SchemaError> {
        let mut members = Vec::with_capacity(mapping.len());
        let mut seen: HashMap<String, &str> = HashMap::new();

        for (child_key, child) in mapping.iter() {
            let child_ident =
                sanitize_key(child_key).map_err(|reason| unrepresentable(path, child_key, reason))?;

            if let Some(previous) = seen.insert(child_ident.clone(), child_key) {
                return Err(unrepresentable(
                    path,
                    child_key,
                    format!("collides with sibling key '{}' as '{}'", previous, child_ident),
                ));
            }

            let child_path = join_path(path, child_key);
            let member = match child {
                ConfigNode::Mapping(child_mapping) => {
                    let child_type = self.unique_type_name(nested_type_name(&type_name, &child_ident));
                    Member::Group(self.compile_group(
                        child_key,
                        &child_ident,
                        &child_path,
                        child_type,
                        child_mapping,
                    )?)
                }
                leaf => {
                    let ty = infer_type(leaf);
                    if ty.is_unknown() {
                        tracing::warn!(
                            "'{}' is null; its accessor is typed as unknown",
                            child_path
                        );
                    }
                    Member::Property(PropertyDescriptor {
                        key: child_key.to_string(),
                        ident: child_ident,
                        path: child_path,
                        ty,
                    })
                }
            };
            members.push(member);
        }

        Ok(AccessorGroup {
            key: key.to_string(),
            ident: ident.to_string(),
            path: path.to_string(),
            type_name,
            members,
        })
    }

    /// Reserve a type name, appending a counter when it is already taken.
    fn unique_type_name(&mut self, candidate: String) -> String {
        if self.type_names.insert(candidate.clone()) {
            return candidate;
        }
        let mut counter = 2;
        loop {
            let name = format!("{}{}", candidate, counter);
            if self.type_names.insert(name.clone()) {
                return name;
            }
            counter += 1;
        }
    }
}

fn unrepresentable(path: &str, key: &str, reason: String) -> SchemaError {
    SchemaError::UnrepresentableKey {
        path: if path.is_empty() {
            "<root>".to_string()
        } else {
            path.to_string()
        },
        key: key.to_string(),
        reason,
    }
}
