use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::auth;
use crate::config::Settings;
use crate::logging::LogFormat;

pub mod completion;
pub mod fetch;
pub mod ls;
pub mod save;
pub mod tlds;

#[derive(Debug, Parser)]
#[command(
    name = "czds",
    version = env!("CARGO_PKG_VERSION"),
    about = "Download ICANN CZDS zone files",
    long_about = "Use the ICANN CZDS REST API to list and download authorized TLD zone files.\n\
                  Without a subcommand, only authenticates.",
    propagate_version = true
)]
pub struct App {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Config file [default: /etc/czds.toml, then ./czds.toml]
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Token file previously created with `save`
    #[arg(short = 'A', long, global = true, value_name = "FILE")]
    pub auth_file: Option<PathBuf>,
    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Persist an access token for later reuse with --auth-file
    Save(save::SaveArg),
    /// List available zone URLs
    #[command(visible_alias = "list")]
    Ls(ls::LsArg),
    /// Download zone files
    Fetch(fetch::FetchArg),
    /// List TLD metadata
    Tlds(tlds::TldsArg),
    /// Print a shell completion script
    Completion(completion::CompletionArg),
}

/// Execute the parsed command line.
pub async fn run(app: App) -> Result<()> {
    let App { global, cmd } = app;
    if let Some(Commands::Completion(arg)) = &cmd {
        return completion::run(arg);
    }

    let settings = Settings::load(global.config.as_deref())?;
    match cmd {
        Some(Commands::Save(arg)) => save::run(arg, &settings).await,
        Some(Commands::Ls(arg)) => ls::run(arg, &settings, &global).await,
        Some(Commands::Fetch(arg)) => fetch::run(arg, &settings, &global).await,
        Some(Commands::Tlds(arg)) => tlds::run(arg, &settings, &global).await,
        Some(Commands::Completion(_)) => Ok(()),
        None => {
            auth::authenticate(&settings, global.auth_file.as_deref()).await?;
            info!("request is authorized");
            Ok(())
        }
    }
}
