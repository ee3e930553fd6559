use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use crate::cli::App;

mod auth;
mod cli;
mod config;
mod exit;
mod logging;
mod ui;

fn main() -> ExitCode {
    let app = App::parse();
    if let Err(e) = logging::init(app.global.verbose, app.global.log_format) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli::run(app)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit::code_for(&e))
        }
    }
}
