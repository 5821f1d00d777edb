// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Interactive prompts for `cfglayer scaffold`.

use super::{check_clean_dir, prepare_dir, Flavor};
use crate::error::{CfgError, Result, ScaffoldError};
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use std::path::{Path, PathBuf};

/// Collects a target directory and flavors, prompting for whatever is missing.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldWizard {
    dir: Option<PathBuf>,
    create: bool,
    dry_run: bool,
    flavors: Vec<Flavor>,
}

/// A clean, existing directory and the flavors to write into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    pub dir: PathBuf,
    pub flavors: Vec<Flavor>,
}

impl ScaffoldWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this directory instead of asking for one.
    pub fn with_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dir = dir;
        self
    }

    /// Create a missing directory without asking.
    pub fn with_create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Never touch the filesystem; a missing directory is left missing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Preselected flavors; the flavor prompt is skipped when any are given.
    pub fn with_flavors(mut self, flavors: Vec<Flavor>) -> Self {
        self.flavors = flavors;
        self
    }

    /// Run the prompts.
    pub fn run(self) -> Result<ScaffoldPlan> {
        let term = Term::stderr();
        let theme = ColorfulTheme::default();

        term.write_line(&format!(
            "{}",
            style("Creating a configuration boilerplate").bold()
        ))?;

        let dir = self.prompt_dir(&term, &theme)?;

        let flavors = if self.flavors.is_empty() {
            prompt_flavors(&theme)?
        } else {
            self.flavors
        };

        Ok(ScaffoldPlan { dir, flavors })
    }

    fn prompt_dir(&self, term: &Term, theme: &ColorfulTheme) -> Result<PathBuf> {
        loop {
            let (dir, prompted) = match &self.dir {
                Some(dir) => (dir.clone(), false),
                None => {
                    let input: String = Input::with_theme(theme)
                        .with_prompt("Where should the configuration files be saved?")
                        .default(".".to_string())
                        .interact_text()?;
                    (PathBuf::from(input.trim()), true)
                }
            };

            if !dir.exists() {
                self.settle_missing_dir(&dir, || {
                    Ok(Confirm::with_theme(theme)
                        .with_prompt(format!("{} does not exist. Create it?", dir.display()))
                        .default(true)
                        .interact()?)
                })?;
                if self.dry_run {
                    return Ok(dir);
                }
            }

            match check_clean_dir(&dir) {
                Ok(()) => return Ok(dir),
                Err(e @ ScaffoldError::DirectoryNotClean { .. }) if prompted => {
                    term.write_line(&format!("  {} {}", style("✗").red(), e))?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Create a missing directory once allowed by `--create` or `confirm`.
    fn settle_missing_dir(
        &self,
        dir: &Path,
        confirm: impl FnOnce() -> Result<bool>,
    ) -> Result<()> {
        if self.dry_run {
            tracing::debug!("Dry run, not creating {:?}", dir);
            return Ok(());
        }
        if !(self.create || confirm()?) {
            return Err(CfgError::Cancelled);
        }
        prepare_dir(dir, true)
    }
}

fn prompt_flavors(theme: &ColorfulTheme) -> Result<Vec<Flavor>> {
    let items: Vec<String> = Flavor::all()
        .iter()
        .map(|f| format!("{:10} - {}", f.as_str(), f.description()))
        .collect();

    let selection = MultiSelect::with_theme(theme)
        .with_prompt("Which flavors do you want? (space to select)")
        .items(&items)
        .interact()?;

    if selection.is_empty() {
        return Err(ScaffoldError::NoFlavors.into());
    }

    Ok(selection.into_iter().map(|i| Flavor::all()[i]).collect())
}
