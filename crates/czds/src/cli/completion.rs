use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{Shell, generate};

use crate::cli::App;

#[derive(Args, Clone, Debug)]
#[command(long_about = "Print a completion script for SHELL.\n\n\
    Bash, for the current session:\n\n    . <(czds completion bash)")]
pub struct CompletionArg {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(arg: &CompletionArg) -> Result<()> {
    let mut command = App::command();
    let name = command.get_name().to_string();
    generate(arg.shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
