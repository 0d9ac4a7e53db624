use std::io;
use std::process::ExitCode;

use coinwatch::{Menu, TrackerBuilder};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("coinwatch=warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let tracker = match TrackerBuilder::from_env().and_then(TrackerBuilder::build) {
        Ok(tracker) => tracker,
        Err(e) => {
            eprintln!("Failed to start coinwatch: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("{tracker}");

    let stdin = io::stdin();
    let mut menu = Menu::new(tracker, stdin.lock(), io::stdout());
    match menu.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("coinwatch: {e}");
            ExitCode::FAILURE
        }
    }
}
