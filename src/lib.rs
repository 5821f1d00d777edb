// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! cfglayer - Layered configuration with generated typed accessors
//!
//! A configuration directory holds a base document (`defaults.yaml`) and
//! optional overrides per server role (`dev.yaml`, `test.yaml`,
//! `production.yaml`). cfglayer merges the override for the active role over
//! the base and generates Rust structs mirroring the merged tree.
//!
//! # Features
//!
//! - **Document Loader**: YAML, TOML and JSON documents tagged by file name
//! - **Environment Resolver**: Active role from `CFGLAYER_SERVER_ROLE`
//! - **Merge Engine**: Order-preserving deep merge, override wins
//! - **Schema Compiler**: Typed accessor groups with sanitized field names
//! - **Output Writer**: Deterministic generated source, written atomically
//!
//! # Example
//!
//! ```no_run
//! use cfglayer::build::{self, BuildContext};
//! use cfglayer::config::RoleResolver;
//!
//! let role = RoleResolver::from_env().role;
//! let resolution = build::resolve(&BuildContext::new("config", role)).unwrap();
//!
//! if let Some(port) = resolution.config.lookup("db.port") {
//!     println!("db.port = {:?}", port);
//! }
//! ```

// Module declarations
pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scaffold;
pub mod schema;

// Re-exports for convenience
pub use build::{BuildContext, BuildReport};
pub use config::{ConfigNode, ResolvedConfig, Role, RoleResolver};
pub use error::{BuildError, CfgError, Result};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of cfglayer.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = option_env!("VERGEN_GIT_COMMIT_DATE");

    /// Get a formatted version string.
    pub fn version_string() -> String {
        let short_sha = GIT_SHA.map(|sha| &sha[..7.min(sha.len())]);
        match (short_sha, GIT_COMMIT_DATE) {
            (Some(sha), Some(date)) => format!("{} ({} {})", VERSION, sha, date),
            (Some(sha), None) => format!("{} ({})", VERSION, sha),
            _ => VERSION.to_string(),
        }
    }
}
