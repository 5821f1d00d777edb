// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Accessor schema types.

use serde::{Serialize, Serializer};
use std::fmt;

/// Inferred type of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Integer,
    Float,
    Boolean,
    /// The value was null when the schema was compiled.
    Unknown,
    /// Elements of differing or unrepresentable types.
    Untyped,
    List(Box<PropertyType>),
}

impl PropertyType {
    /// The Rust type used for this property in generated source.
    pub fn rust_type(&self) -> String {
        match self {
            PropertyType::String => "String".to_string(),
            PropertyType::Integer => "i64".to_string(),
            PropertyType::Float => "f64".to_string(),
            PropertyType::Boolean => "bool".to_string(),
            PropertyType::Unknown => "Option<serde_json::Value>".to_string(),
            PropertyType::Untyped => "serde_json::Value".to_string(),
            PropertyType::List(element) => format!("Vec<{}>", element.rust_type()),
        }
    }

    /// Whether the value was null and the type could not be inferred.
    pub fn is_unknown(&self) -> bool {
        matches!(self, PropertyType::Unknown)
    }

    /// Combine the types of two sequence elements.
    pub fn unify(self, other: PropertyType) -> PropertyType {
        use PropertyType::*;

        match (self, other) {
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            (List(a), List(b)) => List(Box::new(a.unify(*b))),
            _ => Untyped,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::String => write!(f, "string"),
            PropertyType::Integer => write!(f, "integer"),
            PropertyType::Float => write!(f, "float"),
            PropertyType::Boolean => write!(f, "boolean"),
            PropertyType::Unknown => write!(f, "unknown"),
            PropertyType::Untyped => write!(f, "any"),
            PropertyType::List(element) => write!(f, "list<{}>", element),
        }
    }
}

impl Serialize for PropertyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A typed leaf property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    /// The original mapping key.
    pub key: String,
    /// The field identifier derived from the key.
    pub ident: String,
    /// Dotted path from the root.
    pub path: String,
    #[serde(rename = "type")]
    pub ty: PropertyType,
}

/// A nested accessor group, one per mapping in the resolved tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorGroup {
    /// The original mapping key (empty for the root).
    pub key: String,
    /// The field identifier in the parent group (empty for the root).
    pub ident: String,
    /// Dotted path from the root (empty for the root).
    pub path: String,
    /// Name of the generated type.
    pub type_name: String,
    pub members: Vec<Member>,
}

/// A member of an accessor group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Member {
    Property(PropertyDescriptor),
    Group(AccessorGroup),
}

impl Member {
    pub fn key(&self) -> &str {
        match self {
            Member::Property(p) => &p.key,
            Member::Group(g) => &g.key,
        }
    }

    pub fn ident(&self) -> &str {
        match self {
            Member::Property(p) => &p.ident,
            Member::Group(g) => &g.ident,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Member::Property(p) => &p.path,
            Member::Group(g) => &g.path,
        }
    }

    /// Whether the identifier differs from the key and needs a serde rename.
    pub fn needs_rename(&self) -> bool {
        self.key() != self.ident()
    }
}

/// The typed accessor description of a resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorSchema {
    pub root: AccessorGroup,
}

impl AccessorSchema {
    /// Every group, root first, in depth-first order.
    pub fn groups(&self) -> Vec<&AccessorGroup> {
        let mut groups = Vec::new();
        collect_groups(&self.root, &mut groups);
        groups
    }

    /// Every property in depth-first order.
    pub fn properties(&self) -> Vec<&PropertyDescriptor> {
        let mut properties = Vec::new();
        collect_properties(&self.root, &mut properties);
        properties
    }

    /// Dotted paths of every property.
    pub fn leaf_paths(&self) -> Vec<String> {
        self.properties().into_iter().map(|p| p.path.clone()).collect()
    }

    /// Properties whose type could not be inferred because the value was null.
    pub fn unknown_properties(&self) -> Vec<&PropertyDescriptor> {
        self.properties()
            .into_iter()
            .filter(|p| p.ty.is_unknown())
            .collect()
    }

    /// Find a property by dotted path.
    pub fn property(&self, path: &str) -> Option<&PropertyDescriptor> {
        self.properties().into_iter().find(|p| p.path == path)
    }
}

fn collect_groups<'a>(group: &'a AccessorGroup, out: &mut Vec<&'a AccessorGroup>) {
    out.push(group);
    for member in &group.members {
        if let Member::Group(child) = member {
            collect_groups(child, out);
        }
    }
}

fn collect_properties<'a>(group: &'a AccessorGroup, out: &mut Vec<&'a PropertyDescriptor>) {
    for member in &group.members {
        match member {
            Member::Property(p) => out.push(p),
            Member::Group(child) => collect_properties(child, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_types() {
        assert_eq!(PropertyType::String.rust_type(), "String");
        assert_eq!(PropertyType::Unknown.rust_type(), "Option<serde_json::Value>");
        assert_eq!(
            PropertyType::List(Box::new(PropertyType::List(Box::new(PropertyType::Integer))))
                .rust_type(),
            "Vec<Vec<i64>>"
        );
    }

    #[test]
    fn test_unify() {
        use PropertyType::*;
        assert_eq!(String.unify(String), String);
        assert_eq!(Integer.unify(Float), Float);
        assert_eq!(String.unify(Integer), Untyped);
        assert_eq!(
            List(Box::new(Integer)).unify(List(Box::new(Float))),
            List(Box::new(Float))
        );
        assert_eq!(Untyped.unify(String), Untyped);
    }

    #[test]
    fn test_display() {
        let ty = PropertyType::List(Box::new(PropertyType::Boolean));
        assert_eq!(ty.to_string(), "list<boolean>");
    }
}
