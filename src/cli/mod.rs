// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command-line interface for cfglayer.
//!
//! Parses arguments, applies them over the tool settings and dispatches to
//! the build, inspection and scaffolding commands.

pub mod args;
mod dispatch;

pub use args::{Cli, Commands, OutputFormat};
pub use dispatch::run;
