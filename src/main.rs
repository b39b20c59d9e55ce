use std::process::ExitCode;

use clap::Parser;
use uniclipboard_sync::cli::RootCommand;

#[tokio::main]
async fn main() -> ExitCode {
    let command = RootCommand::parse();

    match command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
