// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Summary of a completed build.

use crate::cli::args::OutputFormat;
use crate::config::{KindConflict, Role};
use console::style;
use std::path::PathBuf;

/// What a build found, merged and wrote.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub role: Role,
    /// File names of the documents found, base first.
    pub documents: Vec<String>,
    /// Files skipped for an unsupported extension.
    pub skipped: Vec<PathBuf>,
    pub override_name: Option<String>,
    pub conflicts: Vec<KindConflict>,
    pub groups: usize,
    pub properties: usize,
    /// Paths whose type could not be inferred.
    pub unknown: Vec<String>,
    pub output: PathBuf,
}

impl BuildReport {
    /// Print the report in the requested format.
    pub fn print(&self, format: Option<OutputFormat>) {
        match format {
            Some(OutputFormat::Json) => self.print_json(),
            _ => self.print_text(),
        }
    }

    fn print_text(&self) {
        for name in &self.documents {
            println!("found {}", name);
        }
        println!("{} files found in total", self.documents.len());

        for path in &self.skipped {
            println!(
                "  {} skipped {} (unsupported format)",
                style("!").yellow().bold(),
                path.display()
            );
        }

        match &self.override_name {
            Some(name) => println!("Role {} (merged {})", style(self.role).cyan(), name),
            None => println!("Role {} (no override, base only)", style(self.role).cyan()),
        }

        for conflict in &self.conflicts {
            println!(
                "  {} {}: {} replaced by {}",
                style("!").yellow().bold(),
                conflict.path,
                conflict.base,
                conflict.overlay
            );
        }

        for path in &self.unknown {
            println!(
                "  {} {} is null; its type is unknown",
                style("!").yellow().bold(),
                path
            );
        }

        println!(
            "{} Wrote {} ({} groups, {} properties)",
            style("✓").green().bold(),
            style(self.output.display()).cyan(),
            self.groups,
            self.properties
        );
    }

    fn print_json(&self) {
        let json = serde_json::json!({
            "role": self.role,
            "documents": self.documents,
            "skipped": self.skipped,
            "override": self.override_name,
            "conflicts": self.conflicts,
            "groups": self.groups,
            "properties": self.properties,
            "unknown": self.unknown,
            "output": self.output,
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_default()
        );
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} documents, {} groups, {} properties",
            self.documents.len(),
            self.groups,
            self.properties
        )
    }
}
