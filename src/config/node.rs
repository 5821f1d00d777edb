// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! In-memory configuration tree.
//!
//! Every parsed document becomes a [`ConfigNode`]. Mappings keep their keys in
//! document order, which the merge engine and the schema compiler both rely on.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    /// Whether this scalar is null.
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "null"),
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Float(x) => write!(f, "{}", x),
            ScalarValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// The structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Scalar => write!(f, "scalar"),
            NodeKind::Sequence => write!(f, "sequence"),
            NodeKind::Mapping => write!(f, "mapping"),
        }
    }
}

/// An ordered mapping with unique string keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(String, ConfigNode)>,
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, replacing the value in place if the key already exists.
    ///
    /// Returns the previous value for the key, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigNode) -> Option<ConfigNode> {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ConfigNode)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, ConfigNode)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

/// A node of a parsed configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    Scalar(ScalarValue),
    Sequence(Vec<ConfigNode>),
    Mapping(Mapping),
}

impl ConfigNode {
    /// An empty mapping node.
    pub fn empty_mapping() -> Self {
        ConfigNode::Mapping(Mapping::new())
    }

    /// Shorthand for a string scalar.
    pub fn string(value: impl Into<String>) -> Self {
        ConfigNode::Scalar(ScalarValue::String(value.into()))
    }

    /// Shorthand for an integer scalar.
    pub fn integer(value: i64) -> Self {
        ConfigNode::Scalar(ScalarValue::Integer(value))
    }

    /// Shorthand for a boolean scalar.
    pub fn boolean(value: bool) -> Self {
        ConfigNode::Scalar(ScalarValue::Bool(value))
    }

    /// Shorthand for a null scalar.
    pub fn null() -> Self {
        ConfigNode::Scalar(ScalarValue::Null)
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            ConfigNode::Scalar(_) => NodeKind::Scalar,
            ConfigNode::Sequence(_) => NodeKind::Sequence,
            ConfigNode::Mapping(_) => NodeKind::Mapping,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ConfigNode::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigNode::Scalar(ScalarValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a direct child of a mapping node.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Dotted paths of every leaf (scalar or sequence) under this node.
    ///
    /// Empty mappings contribute no leaves.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaf_paths(self, "", &mut paths);
        paths
    }
}

fn collect_leaf_paths(node: &ConfigNode, prefix: &str, out: &mut Vec<String>) {
    match node {
        ConfigNode::Mapping(mapping) => {
            for (key, child) in mapping.iter() {
                collect_leaf_paths(child, &join_path(prefix, key), out);
            }
        }
        _ => out.push(prefix.to_string()),
    }
}

/// Join a dotted path prefix with a key.
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

impl From<ScalarValue> for ConfigNode {
    fn from(value: ScalarValue) -> Self {
        ConfigNode::Scalar(value)
    }
}

impl From<Mapping> for ConfigNode {
    fn from(value: Mapping) -> Self {
        ConfigNode::Mapping(value)
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for ScalarValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScalarValue::Null => serializer.serialize_unit(),
            ScalarValue::Bool(b) => serializer.serialize_bool(*b),
            ScalarValue::Integer(i) => serializer.serialize_i64(*i),
            ScalarValue::Float(x) => serializer.serialize_f64(*x),
            ScalarValue::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for ConfigNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigNode::Scalar(value) => value.serialize(serializer),
            ConfigNode::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ConfigNode::Mapping(mapping) => mapping.serialize(serializer),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Conversion from the value types of the supported document formats.
pub mod convert {
    use super::{ConfigNode, Mapping, ScalarValue};

    /// Convert a YAML value. Errors name the offending key.
    pub fn from_yaml(value: serde_yaml::Value) -> Result<ConfigNode, String> {
        use serde_yaml::Value;

        Ok(match value {
            Value::Null => ConfigNode::null(),
            Value::Bool(b) => ConfigNode::boolean(b),
            Value::Number(n) => ConfigNode::Scalar(yaml_number(&n)),
            Value::String(s) => ConfigNode::string(s),
            Value::Sequence(items) => ConfigNode::Sequence(
                items
                    .into_iter()
                    .map(from_yaml)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Mapping(map) => {
                let mut mapping = Mapping::new();
                for (key, child) in map {
                    let key = yaml_key(key)?;
                    if mapping.contains_key(&key) {
                        return Err(format!("duplicate key '{}'", key));
                    }
                    let child = from_yaml(child)?;
                    mapping.insert(key, child);
                }
                ConfigNode::Mapping(mapping)
            }
            Value::Tagged(tagged) => from_yaml(tagged.value)?,
        })
    }

    fn yaml_number(n: &serde_yaml::Number) -> ScalarValue {
        if let Some(i) = n.as_i64() {
            ScalarValue::Integer(i)
        } else {
            ScalarValue::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }

    fn yaml_key(key: serde_yaml::Value) -> Result<String, String> {
        use serde_yaml::Value;

        match key {
            Value::String(s) => Ok(s),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Null => Ok("null".to_string()),
            Value::Tagged(tagged) => yaml_key(tagged.value),
            other => Err(format!("unsupported mapping key {:?}", other)),
        }
    }

    /// Convert a TOML value.
    pub fn from_toml(value: toml::Value) -> ConfigNode {
        use toml::Value;

        match value {
            Value::String(s) => ConfigNode::string(s),
            Value::Integer(i) => ConfigNode::integer(i),
            Value::Float(x) => ConfigNode::Scalar(ScalarValue::Float(x)),
            Value::Boolean(b) => ConfigNode::boolean(b),
            Value::Datetime(dt) => ConfigNode::string(dt.to_string()),
            Value::Array(items) => ConfigNode::Sequence(items.into_iter().map(from_toml).collect()),
            Value::Table(table) => ConfigNode::Mapping(
                table
                    .into_iter()
                    .map(|(k, v)| (k, from_toml(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a JSON value.
    pub fn from_json(value: serde_json::Value) -> ConfigNode {
        use serde_json::Value;

        match value {
            Value::Null => ConfigNode::null(),
            Value::Bool(b) => ConfigNode::boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigNode::integer(i),
                None => ConfigNode::Scalar(ScalarValue::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => ConfigNode::string(s),
            Value::Array(items) => ConfigNode::Sequence(items.into_iter().map(from_json).collect()),
            Value::Object(map) => ConfigNode::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, from_json(v)))
                    .collect(),
            ),
        }
    }
}
