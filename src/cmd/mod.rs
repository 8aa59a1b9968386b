//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`init`], [`validate`], or [`health`].
//! Each handler lives in its own submodule.

pub mod health;
pub mod init;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::BlogError;

pub async fn dispatch(cli: Cli) -> Result<(), BlogError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  bitbyte v{version} \u{2014} server-rendered personal blog\n\n  \
         No command provided. To get started:\n\n    \
         bitbyte init                  Generate a starter site config\n    \
         bitbyte run                   Serve the blog (auto-detects ./bitbyte.yaml)\n    \
         bitbyte run -c site.yaml      Start with a specific site config\n    \
         bitbyte health                Query a running instance's metrics listener\n    \
         bitbyte --help                See all commands and options\n"
    );
}
