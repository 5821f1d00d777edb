// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Accessor schema compilation.
//!
//! Walks a resolved configuration and describes every dotted path as a typed
//! property, with nested mappings becoming nested accessor groups.

mod compiler;
pub mod ident;
mod types;

pub use compiler::{compile, compile_node, infer_type};
pub use types::{AccessorGroup, AccessorSchema, Member, PropertyDescriptor, PropertyType};
