// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Inputs and progress markers for a build.

use crate::config::settings::{BuildSettings, DEFAULT_ROOT_TYPE, GENERATED_FILE_NAME};
use crate::config::Role;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Everything a build needs, fixed before the pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub role: Role,
    pub source_dir: PathBuf,
    pub output_path: PathBuf,
    pub root_type: String,
}

impl BuildContext {
    /// A context with the conventional output location and root type.
    pub fn new(source_dir: impl Into<PathBuf>, role: Role) -> Self {
        let source_dir = source_dir.into();
        Self {
            role,
            output_path: source_dir.join(GENERATED_FILE_NAME),
            source_dir,
            root_type: DEFAULT_ROOT_TYPE.to_string(),
        }
    }

    /// A context taking its defaults from tool settings.
    pub fn from_settings(settings: &BuildSettings, source_dir: &Path, role: Role) -> Self {
        Self {
            role,
            source_dir: source_dir.to_path_buf(),
            output_path: settings.output_for(source_dir),
            root_type: settings.root_type.clone(),
        }
    }

    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_root_type(mut self, root_type: impl Into<String>) -> Self {
        self.root_type = root_type.into();
        self
    }
}

/// The last point a build reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildState {
    Start,
    DocumentsLoaded,
    RoleResolved,
    Merged,
    SchemaCompiled,
    Written,
}

impl BuildState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildState::Start => "start",
            BuildState::DocumentsLoaded => "documents-loaded",
            BuildState::RoleResolved => "role-resolved",
            BuildState::Merged => "merged",
            BuildState::SchemaCompiled => "schema-compiled",
            BuildState::Written => "written",
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The step a build is attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildStep {
    Load,
    SelectRole,
    Merge,
    Compile,
    Render,
    Write,
}

impl BuildStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStep::Load => "load",
            BuildStep::SelectRole => "select-role",
            BuildStep::Merge => "merge",
            BuildStep::Compile => "compile",
            BuildStep::Render => "render",
            BuildStep::Write => "write",
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
