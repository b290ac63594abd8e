//! Fetching the template repository.

use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::command::{self, ProcessResult};

/// Produces a template working tree at a given location.
///
/// The generator only talks to this trait, so tests can hand it a tree
/// without a network or a git binary.
pub trait TemplateSource {
    /// Materialize the template from `url` into `dest`, which must not exist yet.
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;

    /// Bring nested repositories of a fetched tree up to date.
    fn update_submodules(&self, dir: &Path) -> Result<()>;
}

/// Uses the `git` executable on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct GitTemplateSource;

impl TemplateSource for GitTemplateSource {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        clone_repo(url, dest)
    }

    fn update_submodules(&self, dir: &Path) -> Result<()> {
        update_submodules(dir)
    }
}

/// Clone a git repository to a target directory.
pub fn clone_repo(url: &str, target_dir: &Path) -> Result<()> {
    let target = target_dir.to_string_lossy();
    run_git(&["clone", url, &target], None, "git clone")
}

/// Initialize and update all submodules, recursively.
pub fn update_submodules(repo_dir: &Path) -> Result<()> {
    run_git(
        &["submodule", "update", "--init", "--recursive"],
        Some(repo_dir),
        "git submodule update",
    )
}

fn run_git(args: &[&str], dir: Option<&Path>, label: &str) -> Result<()> {
    log_status!("git", "{}", label);

    let result = command::run_captured("git", args, dir).map_err(|e| {
        Error::git_command_failed(label, None, e.summary())
    })?;

    check(result, label)
}

fn check(result: ProcessResult, label: &str) -> Result<()> {
    if result.success {
        return Ok(());
    }
    Err(Error::git_command_failed(
        label,
        result.exit_code,
        result.error_text(),
    ))
}
