use clap::Parser;
use wallfetch_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible.
    if cli.log_stderr || logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match cli.command.run().await {
        // Exit without waiting on the blocking pool: in-flight downloads are abandoned.
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("wallfetch error: {:#}", err);
            std::process::exit(1);
        }
    }
}
