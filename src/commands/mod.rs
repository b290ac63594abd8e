use std::path::PathBuf;

use claritygen::config::LoadedSettings;

pub type CmdResult<T> = claritygen::Result<(T, i32)>;

/// Options shared by every subcommand.
pub(crate) struct GlobalArgs {
    /// Settings file given with `--config`, already expanded.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    pub(crate) fn load_settings(&self) -> claritygen::Result<LoadedSettings> {
        claritygen::config::load(self.config.as_deref())
    }
}

pub mod config;
pub mod new;
pub mod rename;

macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (claritygen::Result<serde_json::Value>, i32) {
    crate::tty::status("claritygen is working...");

    match command {
        crate::Commands::New(args) => dispatch!(args, global, new),
        crate::Commands::Rename(args) => dispatch!(args, global, rename),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
