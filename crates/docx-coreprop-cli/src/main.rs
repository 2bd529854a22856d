use std::io::IsTerminal;
use std::process;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .init();

    match docx_coreprop_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("docx-coreprop-writer error: {err:#}");
            process::exit(1);
        }
    }
}
