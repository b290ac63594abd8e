use clap::{Args, Subcommand};
use serde::Serialize;

use claritygen::config::LoadedSettings;
use claritygen::paths;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display effective settings (embedded defaults + settings file)
    Show,
    /// Show the path of the settings file
    Path,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum ConfigOutput {
    #[serde(rename = "config.show")]
    Show {
        #[serde(flatten)]
        loaded: LoadedSettings,
    },
    #[serde(rename = "config.path")]
    Path { path: String, exists: bool },
}

pub fn run(args: ConfigArgs, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show => Ok((
            ConfigOutput::Show {
                loaded: global.load_settings()?,
            },
            0,
        )),
        ConfigCommand::Path => {
            let path = match &global.config {
                Some(path) => path.clone(),
                None => paths::appsettings_json()?,
            };
            Ok((
                ConfigOutput::Path {
                    exists: path.is_file(),
                    path: path.display().to_string(),
                },
                0,
            ))
        }
    }
}
