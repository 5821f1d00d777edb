// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Renders an accessor schema as Rust source.
//!
//! Each accessor group becomes a `Deserialize` struct, so host code can load
//! the resolved configuration straight into the generated types.

use crate::config::Role;
use crate::error::OutputError;
use crate::schema::{AccessorGroup, AccessorSchema, Member};
use handlebars::Handlebars;
use serde::Serialize;

/// Template for the generated file. Every block tag shares a line with
/// content so the output does not depend on standalone-line trimming.
const ACCESSOR_TEMPLATE: &str = r#"// @generated by cfglayer {{version}}. Do not edit by hand.
// Resolved for role: {{role}}. Regenerate with `cfglayer build`.

use serde::Deserialize;

/// Every leaf path in the resolved configuration.
pub const LEAF_PATHS: &[&str] = &[
{{#each leaf_paths}}    {{{this}}},
{{/each}}];{{#each structs}}

/// {{{doc}}}
#[derive(Debug, Clone, Deserialize)]
{{#if allow_non_snake}}#[allow(non_snake_case)]
{{/if}}pub struct {{type_name}} {
{{#each fields}}{{#each docs}}    /// {{{this}}}
{{/each}}{{#if rename}}    #[serde(rename = {{{rename}}})]
{{/if}}    pub {{ident}}: {{{ty}}},
{{/each}}}{{/each}}
"#;

#[derive(Debug, Serialize)]
struct TemplateContext {
    version: &'static str,
    role: String,
    leaf_paths: Vec<String>,
    structs: Vec<StructContext>,
}

#[derive(Debug, Serialize)]
struct StructContext {
    doc: String,
    type_name: String,
    allow_non_snake: bool,
    fields: Vec<FieldContext>,
}

#[derive(Debug, Serialize)]
struct FieldContext {
    docs: Vec<String>,
    rename: Option<String>,
    ident: String,
    ty: String,
}

/// Render the accessor source for a schema.
pub fn render(schema: &AccessorSchema, role: Role) -> Result<String, OutputError> {
    let context = TemplateContext {
        version: env!("CARGO_PKG_VERSION"),
        role: role.to_string(),
        leaf_paths: schema
            .leaf_paths()
            .iter()
            .map(|path| string_literal(path))
            .collect(),
        structs: schema.groups().into_iter().map(struct_context).collect(),
    };

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .render_template(ACCESSOR_TEMPLATE, &context)
        .map_err(|e| OutputError::RenderError {
            message: e.to_string(),
        })
}

fn struct_context(group: &AccessorGroup) -> StructContext {
    let doc = if group.path.is_empty() {
        "Root of the resolved configuration.".to_string()
    } else {
        format!("Accessor group for `{}`.", doc_text(&group.path))
    };

    StructContext {
        doc,
        type_name: group.type_name.clone(),
        allow_non_snake: group
            .members
            .iter()
            .any(|m| m.ident().chars().any(|c| c.is_ascii_uppercase())),
        fields: group.members.iter().map(field_context).collect(),
    }
}

fn field_context(member: &Member) -> FieldContext {
    let mut docs = vec![format!("`{}`", doc_text(member.path()))];

    let ty = match member {
        Member::Property(property) => {
            if property.ty.is_unknown() {
                docs.push("Type unknown: the value was null when this file was generated.".to_string());
            }
            property.ty.rust_type()
        }
        Member::Group(group) => group.type_name.clone(),
    };

    FieldContext {
        docs,
        rename: member
            .needs_rename()
            .then(|| string_literal(member.key())),
        ident: member.ident().to_string(),
        ty,
    }
}

/// A Rust string literal for arbitrary text.
fn string_literal(text: &str) -> String {
    format!("{:?}", text)
}

/// Text safe to place on a single doc-comment line.
fn doc_text(text: &str) -> String {
    text.escape_debug().to_string()
}
