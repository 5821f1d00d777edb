// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The build pipeline.
//!
//! A build loads the documents in a directory, merges the override for the
//! selected role over the base, compiles the merged tree into an accessor
//! schema, renders it and writes the result. Every failure is tagged with the
//! step that failed and the last state reached.

mod context;
mod report;

pub use context::{BuildContext, BuildState, BuildStep};
pub use report::BuildReport;

use crate::config::{load_documents, DocumentSet, ResolvedConfig};
use crate::error::{BuildError, StageError};
use crate::output::{render, write_accessor};
use crate::schema::{compile, AccessorSchema};

/// Documents and the configuration merged from them.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub documents: DocumentSet,
    pub config: ResolvedConfig,
}

/// A resolution plus its compiled schema and rendered source.
#[derive(Debug, Clone)]
pub struct Generated {
    pub resolution: Resolution,
    pub schema: AccessorSchema,
    pub source: String,
}

/// Tracks the last state reached so failures can report it.
struct Pipeline {
    reached: BuildState,
}

impl Pipeline {
    fn new() -> Self {
        Self {
            reached: BuildState::Start,
        }
    }

    fn attempt<T, E>(
        &mut self,
        step: BuildStep,
        next: BuildState,
        result: Result<T, E>,
    ) -> Result<T, BuildError>
    where
        E: Into<StageError>,
    {
        match result {
            Ok(value) => {
                self.advance(step, next);
                Ok(value)
            }
            Err(e) => {
                tracing::debug!("{} failed after reaching {}", step, self.reached);
                Err(BuildError::new(step, self.reached, e))
            }
        }
    }

    fn advance(&mut self, step: BuildStep, next: BuildState) {
        tracing::debug!("{}: {} -> {}", step, self.reached, next);
        self.reached = next;
    }
}

/// Load and merge, stopping once the configuration is resolved.
pub fn resolve(ctx: &BuildContext) -> Result<Resolution, BuildError> {
    let mut pipeline = Pipeline::new();
    resolve_with(&mut pipeline, ctx)
}

fn resolve_with(pipeline: &mut Pipeline, ctx: &BuildContext) -> Result<Resolution, BuildError> {
    let documents = pipeline.attempt(
        BuildStep::Load,
        BuildState::DocumentsLoaded,
        load_documents(&ctx.source_dir),
    )?;

    pipeline.advance(BuildStep::SelectRole, BuildState::RoleResolved);

    let config = ResolvedConfig::from_documents(&documents, ctx.role);
    pipeline.advance(BuildStep::Merge, BuildState::Merged);

    Ok(Resolution { documents, config })
}

/// Resolve, compile and render without touching the filesystem.
pub fn generate(ctx: &BuildContext) -> Result<Generated, BuildError> {
    let mut pipeline = Pipeline::new();
    generate_with(&mut pipeline, ctx)
}

fn generate_with(pipeline: &mut Pipeline, ctx: &BuildContext) -> Result<Generated, BuildError> {
    let resolution = resolve_with(pipeline, ctx)?;

    let schema = pipeline.attempt(
        BuildStep::Compile,
        BuildState::SchemaCompiled,
        compile(&resolution.config, &ctx.root_type),
    )?;

    // Rendering has no state of its own; a failure still reports SchemaCompiled.
    let source = match render(&schema, ctx.role) {
        Ok(source) => source,
        Err(e) => return Err(BuildError::new(BuildStep::Render, pipeline.reached, e)),
    };

    Ok(Generated {
        resolution,
        schema,
        source,
    })
}

/// Run the whole pipeline and write the accessor file.
pub fn run(ctx: &BuildContext) -> Result<BuildReport, BuildError> {
    tracing::info!(
        role = %ctx.role,
        "Building accessor from {}",
        ctx.source_dir.display()
    );

    let mut pipeline = Pipeline::new();
    let generated = generate_with(&mut pipeline, ctx)?;

    pipeline.attempt(
        BuildStep::Write,
        BuildState::Written,
        write_accessor(&ctx.output_path, &generated.source),
    )?;

    Ok(report(ctx, &generated))
}

fn report(ctx: &BuildContext, generated: &Generated) -> BuildReport {
    let Generated {
        resolution, schema, ..
    } = generated;

    BuildReport {
        role: ctx.role,
        documents: resolution
            .documents
            .documents()
            .map(|doc| doc.name.clone())
            .collect(),
        skipped: resolution.documents.skipped.clone(),
        override_name: resolution.config.override_name().map(str::to_string),
        conflicts: resolution.config.conflicts().to_vec(),
        groups: schema.groups().len(),
        properties: schema.properties().len(),
        unknown: schema
            .unknown_properties()
            .iter()
            .map(|p| p.path.clone())
            .collect(),
        output: ctx.output_path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigNode, Role};
    use crate::error::{LoadError, OutputError, SchemaError};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "defaults.yaml",
            "db:\n  host: localhost\n  port: 5432\nlog_level: info\n",
        );
        write(temp.path(), "dev.yaml", "db:\n  host: dev-db\n");
        write(temp.path(), "production.yaml", "db:\n  host: prod-db\n  port: 6432\n");
        temp
    }

    #[test]
    fn test_resolve_merges_role_override() {
        let temp = fixture();
        let resolution = resolve(&BuildContext::new(temp.path(), Role::Production)).unwrap();

        let config = &resolution.config;
        assert_eq!(config.lookup("db.host").and_then(ConfigNode::as_str), Some("prod-db"));
        assert_eq!(config.lookup("db.port"), Some(&ConfigNode::integer(6432)));
        assert_eq!(config.lookup("log_level").and_then(ConfigNode::as_str), Some("info"));
        assert_eq!(config.override_name(), Some("production.yaml"));
        assert_eq!(resolution.documents.count(), 3);
    }

    #[test]
    fn test_missing_override_uses_base() {
        let temp = fixture();
        let resolution = resolve(&BuildContext::new(temp.path(), Role::Test)).unwrap();
        assert_eq!(
            resolution.config.lookup("db.host").and_then(ConfigNode::as_str),
            Some("localhost")
        );
        assert_eq!(resolution.config.override_name(), None);
    }

    #[test]
    fn test_run_writes_accessor() {
        let temp = fixture();
        let ctx = BuildContext::new(temp.path(), Role::Dev);
        let report = run(&ctx).unwrap();

        let source = fs::read_to_string(&ctx.output_path).unwrap();
        assert!(source.contains("pub struct Config {"));
        assert!(source.contains("pub struct ConfigDb {"));
        assert!(source.contains("\"db.host\""));
        assert_eq!(
            report.documents,
            vec!["defaults.yaml", "dev.yaml", "production.yaml"]
        );
        assert_eq!(report.override_name.as_deref(), Some("dev.yaml"));
        assert_eq!(report.groups, 2);
        assert_eq!(report.properties, 3);
    }

    #[test]
    fn test_regeneration_is_byte_identical() {
        let temp = fixture();
        let ctx = BuildContext::new(temp.path(), Role::Dev);

        run(&ctx).unwrap();
        let first = fs::read(&ctx.output_path).unwrap();
        run(&ctx).unwrap();
        let second = fs::read(&ctx.output_path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_generated_file_is_not_a_document() {
        let temp = fixture();
        let ctx = BuildContext::new(temp.path(), Role::Dev);
        run(&ctx).unwrap();

        let resolution = resolve(&ctx).unwrap();
        assert_eq!(resolution.documents.count(), 3);
    }

    #[test]
    fn test_generate_does_not_write() {
        let temp = fixture();
        let ctx = BuildContext::new(temp.path(), Role::Dev);
        let generated = generate(&ctx).unwrap();

        assert!(generated.source.contains("Resolved for role: dev"));
        assert!(!ctx.output_path.exists());
    }

    #[test]
    fn test_unknown_paths_reported() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "defaults.yaml", "db:\n  password: ~\n");
        let report = run(&BuildContext::new(temp.path(), Role::Dev)).unwrap();
        assert_eq!(report.unknown, vec!["db.password"]);
    }

    #[test]
    fn test_empty_directory_fails_at_load() {
        let temp = TempDir::new().unwrap();
        let err = run(&BuildContext::new(temp.path(), Role::Dev)).unwrap_err();

        assert_eq!(err.step, BuildStep::Load);
        assert_eq!(err.reached, BuildState::Start);
        assert!(matches!(
            err.source,
            StageError::Load(LoadError::NoValidDocuments { .. })
        ));
        assert!(err.to_string().starts_with("load stage failed"));
    }

    #[test]
    fn test_bad_key_fails_at_compile() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "defaults.yaml", "'%%': 1\n");
        let err = run(&BuildContext::new(temp.path(), Role::Dev)).unwrap_err();

        assert_eq!(err.step, BuildStep::Compile);
        assert_eq!(err.reached, BuildState::Merged);
        assert!(matches!(
            err.source,
            StageError::Schema(SchemaError::UnrepresentableKey { .. })
        ));
    }

    #[test]
    fn test_unwritable_output_fails_at_write() {
        let temp = fixture();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();

        let ctx = BuildContext::new(temp.path(), Role::Dev).with_output(blocker.join("out.rs"));
        let err = run(&ctx).unwrap_err();

        assert_eq!(err.step, BuildStep::Write);
        assert_eq!(err.reached, BuildState::SchemaCompiled);
        assert!(matches!(
            err.source,
            StageError::Output(OutputError::WriteError { .. })
        ));
    }

    #[test]
    fn test_custom_root_type() {
        let temp = fixture();
        let ctx = BuildContext::new(temp.path(), Role::Dev).with_root_type("AppConfig");
        let generated = generate(&ctx).unwrap();
        assert!(generated.source.contains("pub struct AppConfig {"));
        assert!(generated.source.contains("pub struct AppConfigDb {"));
    }
}
