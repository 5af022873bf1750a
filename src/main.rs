mod cli;
mod commands;
mod libs;
mod logger;
mod schemas;

use clap::Parser;
use cli::args::Cli;
use cli::settings::InstallSettings;
use colored::Colorize;
use commands::install;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = InstallSettings::from_cli(cli);
    logger::init(settings.debug);

    if let Err(e) = libs::interrupt::install_handlers() {
        log_warn!("Could not install signal handlers: {:#}", e);
    }

    ExitCode::from(install::run(&settings))
}
