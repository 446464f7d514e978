//! Process entry point.
//!
//! All lifecycle logic lives in [`portico::lifecycle`]; this binary only
//! supplies the real process arguments and environment, prints fatal errors,
//! and maps the result to an exit code.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    match portico::run(args, |name| std::env::var(name).ok()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
