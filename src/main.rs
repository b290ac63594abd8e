use clap::{Parser, Subcommand};

mod commands;
mod output;
mod tty;

use commands::{config, new, rename, GlobalArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "claritygen")]
#[command(version = VERSION)]
#[command(about = "Generate a new project from a template repository")]
struct Cli {
    /// Settings file to use instead of the user appsettings.json
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project from the template
    New(new::NewArgs),
    /// Rename a name across an existing directory tree, in place
    Rename(rename::RenameArgs),
    /// Inspect generator settings
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        config: cli.config.as_deref().map(claritygen::paths::expand),
    };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("{}", err.summary());
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
