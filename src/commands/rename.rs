use clap::Args;
use serde::Serialize;

use claritygen::refactor::{FaultPolicy, RenameContext, TreeRenamer};
use claritygen::{paths, RenameReport};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct RenameArgs {
    /// Directory to rename in place
    #[arg(long, value_name = "DIR")]
    pub path: String,

    /// Name to replace
    #[arg(long)]
    pub from: String,

    /// Replacement name
    #[arg(long)]
    pub to: String,

    /// Stop at the first entry that cannot be rewritten or moved
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutput {
    command: &'static str,
    path: String,
    from: String,
    to: String,
    report: RenameReport,
}

pub fn run(args: RenameArgs, global: &GlobalArgs) -> CmdResult<RenameOutput> {
    let settings = global.load_settings()?.settings;
    settings.rename.validate()?;

    let root = paths::expand(&args.path);
    let context = RenameContext::new(&args.from, &args.to, &settings.rename.protected_suffix)?;
    let renamer = TreeRenamer::new(context, &settings.rename)?
        .with_policy(FaultPolicy::from_fail_fast(args.fail_fast));

    let report = renamer.run(&root)?;
    let exit_code = report.exit_code();

    Ok((
        RenameOutput {
            command: "rename",
            path: root.display().to_string(),
            from: args.from,
            to: args.to,
            report,
        },
        exit_code,
    ))
}
