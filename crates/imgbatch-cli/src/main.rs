use imgbatch_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Pick up Z_AI_API_KEY / OUTPUT_DIRECTORY from a local .env if present.
    dotenv::dotenv().ok();

    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    match Cli::run_from_args().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("imgbatch error: {:#}", err);
            std::process::exit(1);
        }
    }
}
