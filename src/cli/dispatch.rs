// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use crate::build::{self, BuildContext, Resolution};
use crate::config::{ConfigNode, Role, RoleResolver, Settings};
use crate::error::{CfgError, Result, ResultExt};
use crate::scaffold::{self, ScaffoldWizard};
use console::style;
use std::path::{Path, PathBuf};

use super::args::{BuildArgs, Cli, Commands, GetArgs, OutputFormat, ScaffoldArgs, ShowArgs};

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
    // Load tool settings
    let settings = if let Some(settings_path) = &cli.config {
        Settings::load_from(settings_path)?
    } else {
        Settings::load()?
    };

    if !settings.ui.color {
        console::set_colors_enabled(false);
    }

    // Dispatch to the appropriate command handler
    match cli.effective_command() {
        Commands::Build(args) => run_build(&cli, &settings, args),
        Commands::Show(args) => run_show(&cli, &settings, args),
        Commands::Get(args) => run_get(&cli, &settings, args),
        Commands::Scaffold(args) => run_scaffold(&cli, args),
        Commands::Version => run_version(),
    }
}

/// Pick the role: the flag if given, otherwise the environment.
fn select_role(explicit: Option<Role>) -> Role {
    let resolution = RoleResolver::resolve(explicit);
    tracing::debug!(
        source = ?resolution.source,
        "Resolved server role: {}",
        resolution.role
    );
    resolution.role
}

/// Build a context from settings, letting command-line values win.
fn build_context(settings: &Settings, dir: Option<PathBuf>, role: Option<Role>) -> BuildContext {
    let source_dir = dir.unwrap_or_else(|| settings.build.source_dir());
    BuildContext::from_settings(&settings.build, &source_dir, select_role(role))
}

/// Run the build command.
fn run_build(cli: &Cli, settings: &Settings, args: BuildArgs) -> Result<()> {
    tracing::debug!("Running build command with args: {:?}", args);

    let mut ctx = build_context(settings, args.dir, args.role);
    if let Some(out) = args.out {
        ctx = ctx.with_output(out);
    }
    if let Some(root_type) = args.root_type {
        ctx = ctx.with_root_type(root_type);
    }

    if cli.dry_run {
        let generated = build::generate(&ctx)?;
        print!("{}", generated.source);
        return Ok(());
    }

    let report = build::run(&ctx)?;
    report.print(cli.format);
    tracing::info!("{}", report.summary());

    Ok(())
}

fn resolve_for(settings: &Settings, dir: Option<PathBuf>, role: Option<Role>) -> Result<Resolution> {
    let ctx = build_context(settings, dir, role);
    Ok(build::resolve(&ctx)?)
}

/// Run the show command.
fn run_show(cli: &Cli, settings: &Settings, args: ShowArgs) -> Result<()> {
    tracing::debug!("Running show command with args: {:?}", args);

    let resolution = resolve_for(settings, args.dir, args.role)?;
    print_node(resolution.config.root(), cli.format)
}

/// Run the get command.
fn run_get(cli: &Cli, settings: &Settings, args: GetArgs) -> Result<()> {
    tracing::debug!("Running get command with args: {:?}", args);

    let resolution = resolve_for(settings, args.dir, args.role)?;
    let node = resolution
        .config
        .lookup(&args.path)
        .ok_or_else(|| CfgError::WithContext {
            context: "get".to_string(),
            message: format!(
                "No value at '{}' for role {}",
                args.path,
                resolution.config.role()
            ),
        })?;

    match (node, cli.format) {
        (ConfigNode::Scalar(value), Some(OutputFormat::Text) | None) => {
            println!("{}", value);
            Ok(())
        }
        (node, format) => print_node(node, format),
    }
}

fn print_node(node: &ConfigNode, format: Option<OutputFormat>) -> Result<()> {
    match format {
        Some(OutputFormat::Json) => {
            let json = serde_json::to_string_pretty(node).context("Failed to serialize JSON")?;
            println!("{}", json);
        }
        _ => {
            let yaml = serde_yaml::to_string(node).context("Failed to serialize YAML")?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

/// Run the scaffold command.
fn run_scaffold(cli: &Cli, args: ScaffoldArgs) -> Result<()> {
    tracing::debug!("Running scaffold command with args: {:?}", args);

    let (dir, flavors) = if cli.is_interactive() {
        let plan = ScaffoldWizard::new()
            .with_dir(args.dir)
            .with_create(args.create)
            .with_dry_run(cli.dry_run)
            .with_flavors(args.flavors)
            .run()?;
        (plan.dir, plan.flavors)
    } else {
        let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
        if !cli.dry_run {
            scaffold::prepare_dir(&dir, args.create)?;
        }
        (dir, args.flavors)
    };

    if cli.dry_run {
        let defaults = scaffold::render_defaults(&flavors)?;
        println!(
            "{} Would write {} under {}:\n",
            style("[dry-run]").yellow(),
            scaffold::starter_files().join(", "),
            dir.display()
        );
        print!("{}", defaults);
        return Ok(());
    }

    let scaffolded = scaffold::write_starter_files(&dir, &flavors)?;

    if cli.format == Some(OutputFormat::Json) {
        let json = serde_json::json!({
            "dir": scaffolded.dir,
            "files": scaffolded.files,
            "flavors": flavors,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "{} Generated the following files under {}:",
        style("✓").green().bold(),
        dir.display()
    );
    for file in &scaffolded.files {
        println!("  {}", file_name(file));
    }
    println!("\nContent in {}:", scaffold::BASE_FILE);
    print!("{}", scaffolded.defaults);

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run the version command.
fn run_version() -> Result<()> {
    println!("cfglayer {}", crate::version::version_string());

    if let Some(sha) = crate::version::GIT_SHA {
        println!("git commit: {}", sha);
    }
    if let Some(date) = crate::version::GIT_COMMIT_DATE {
        println!("commit date: {}", date);
    }

    Ok(())
}
