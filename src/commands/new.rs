use clap::Args;
use std::path::PathBuf;

use claritygen::config::SettingsOverrides;
use claritygen::git::GitTemplateSource;
use claritygen::refactor::FaultPolicy;
use claritygen::{paths, Error, GenerateOutput, GenerateRequest, ProjectGenerator};

use super::{CmdResult, GlobalArgs};
use crate::tty;

#[derive(Args)]
pub struct NewArgs {
    /// Name of the project to create (prompted for in a terminal when omitted)
    pub name: Option<String>,

    /// Directory the project folder is created in (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<String>,

    /// Template repository URL (overrides Template.GitRepoUrl)
    #[arg(long, value_name = "URL")]
    pub template_url: Option<String>,

    /// Name used throughout the template (overrides Template.TemplateName)
    #[arg(long, value_name = "NAME")]
    pub template_name: Option<String>,

    /// Replace an existing project directory once the new one is ready
    #[arg(long)]
    pub force: bool,

    /// Stop at the first entry that cannot be rewritten or moved
    #[arg(long)]
    pub fail_fast: bool,
}

pub fn run(args: NewArgs, global: &GlobalArgs) -> CmdResult<GenerateOutput> {
    let (project_name, output_dir) = resolve_target(&args)?;

    let mut settings = global.load_settings()?.settings;
    settings.apply_overrides(&SettingsOverrides {
        git_repo_url: args.template_url,
        template_name: args.template_name,
    });

    let generator = ProjectGenerator::new(settings, GitTemplateSource)
        .with_fault_policy(FaultPolicy::from_fail_fast(args.fail_fast));

    let output = generator.generate(&GenerateRequest {
        project_name,
        output_dir,
        force: args.force,
    })?;

    let exit_code = output.report.exit_code();
    Ok((output, exit_code))
}

/// Project name and output directory, prompting for what is missing when
/// running interactively.
fn resolve_target(args: &NewArgs) -> claritygen::Result<(String, PathBuf)> {
    let mut output = args.output.clone();

    let name = match &args.name {
        Some(name) => name.trim().to_string(),
        None if tty::require_tty_for_interactive() => {
            let name = tty::prompt("Project name: ")?;
            if output.is_none() {
                let dir = tty::prompt("Output directory (empty for current): ")?;
                if !dir.is_empty() {
                    output = Some(dir);
                }
            }
            name
        }
        None => String::new(),
    };

    if name.is_empty() {
        return Err(Error::validation_missing_argument(vec!["name".to_string()]));
    }

    let output_dir = match output {
        Some(raw) => paths::expand(&raw),
        None => std::env::current_dir().map_err(|e| {
            Error::internal_io(e.to_string(), Some("resolve current directory".to_string()))
        })?,
    };

    Ok((name, output_dir))
}
