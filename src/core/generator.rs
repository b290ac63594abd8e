//! Project generation: fetch the template into a scratch directory, rename it,
//! then move the result to `<output>/<name>`.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::AppSettings;
use crate::error::{Error, Result};
use crate::git::TemplateSource;
use crate::output::GenerateOutput;
use crate::refactor::{FaultPolicy, RenameContext, TreeRenamer};
use crate::utils::{io, validation};

// ============================================================================
// Working tree
// ============================================================================

/// Exclusively owned scratch location for one run.
///
/// Removed on drop unless it was persisted to its destination.
#[derive(Debug)]
pub struct WorkingTree {
    path: PathBuf,
    armed: bool,
}

impl WorkingTree {
    /// Reserve `claritygen-<uuid>` under `parent`. The directory itself is
    /// created by whoever fills it.
    pub fn allocate(parent: &Path) -> Result<Self> {
        io::ensure_dir(parent, &format!("create {}", parent.display()))?;
        Ok(Self {
            path: parent.join(format!("claritygen-{}", Uuid::new_v4())),
            armed: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the tree to `dest`. After this the tree is no longer cleaned up.
    pub fn persist_to(mut self, dest: &Path) -> Result<()> {
        io::move_dir(&self.path, dest)?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for WorkingTree {
    fn drop(&mut self) {
        if !self.armed || !self.path.exists() {
            return;
        }
        if let Err(err) = io::remove_dir_all(&self.path, "remove working tree") {
            log_status!("generate", "Could not remove {}: {}", self.path.display(), err.summary());
        }
    }
}

// ============================================================================
// Generator
// ============================================================================

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub project_name: String,
    pub output_dir: PathBuf,
    /// Replace an existing `<output>/<name>` once the new tree is ready.
    pub force: bool,
}

pub struct ProjectGenerator<S: TemplateSource> {
    settings: AppSettings,
    source: S,
    work_parent: PathBuf,
    policy: FaultPolicy,
}

impl<S: TemplateSource> ProjectGenerator<S> {
    pub fn new(settings: AppSettings, source: S) -> Self {
        Self {
            settings,
            source,
            work_parent: std::env::temp_dir(),
            policy: FaultPolicy::default(),
        }
    }

    /// Directory under which working trees are allocated.
    pub fn with_work_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.work_parent = parent.into();
        self
    }

    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerateOutput> {
        self.settings.validate()?;

        let project_name = request.project_name.trim();
        validation::require_identifier(project_name, "name").map_err(|_| {
            Error::validation_invalid_argument(
                "name",
                "Project name must be an identifier such as 'Acme' or 'Acme.Shop'",
                Some(project_name.to_string()),
                None,
            )
        })?;

        let template = &self.settings.template;
        let context = RenameContext::new(
            &template.template_name,
            project_name,
            &self.settings.rename.protected_suffix,
        )?;
        let renamer = TreeRenamer::new(context, &self.settings.rename)?.with_policy(self.policy);

        let destination = request.output_dir.join(project_name);
        if destination.exists() && !request.force {
            return Err(Error::destination_exists(destination.display().to_string()));
        }

        let tree = WorkingTree::allocate(&self.work_parent)?;

        log_status!("generate", "Cloning template repository...");
        self.source.fetch(&template.git_repo_url, tree.path())?;

        log_status!("generate", "Renaming project files and contents...");
        let report = renamer.run(tree.path())?;

        log_status!("generate", "Updating submodules...");
        self.source.update_submodules(tree.path())?;

        log_status!("generate", "Finalizing project...");
        if destination.exists() {
            // Checked again here: the destination may have appeared while fetching.
            if !request.force {
                return Err(Error::destination_exists(destination.display().to_string()));
            }
            io::remove_dir_all(&destination, &format!("replace {}", destination.display()))?;
        }
        tree.persist_to(&destination)?;

        log_status!("generate", "Project '{}' created at {}", project_name, destination.display());

        Ok(GenerateOutput {
            project_name: project_name.to_string(),
            template_name: template.template_name.clone(),
            location: destination.display().to_string(),
            report,
        })
    }
}
