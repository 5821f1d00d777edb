// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration documents and their layering.
//!
//! This module loads the base and override documents from a directory,
//! resolves the active role, and merges the two into a [`ResolvedConfig`].

pub mod loader;
mod merge;
pub mod node;
mod resolved;
pub mod role;
pub mod settings;

pub use loader::{load_documents, ConfigDocument, DocumentFormat, DocumentSet};
pub use merge::{merge, KindConflict, Merger};
pub use node::{ConfigNode, Mapping, NodeKind, ScalarValue};
pub use resolved::ResolvedConfig;
pub use role::{DocumentRole, Role, RoleResolution, RoleResolver, RoleSource, ROLE_ENV_VAR};
pub use settings::Settings;
