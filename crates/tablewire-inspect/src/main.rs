//! tablewire-inspect
//!
//! Usage: `tablewire-inspect [config.yaml]` (default `tablewire.yaml`).
//! Set `RUST_LOG=tablewire_core=trace` to see every decoded frame.
//! Exits non-zero when a frame fails to decode or is not canonically encoded.

use std::io;
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use tablewire_inspect::{config, finish, run};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "tablewire.yaml".into());
    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(&cfg, &mut out).await {
        Ok(report) => match finish(&report, &mut out) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                tracing::error!(error = %e, "writing report failed");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "inspect failed");
            ExitCode::FAILURE
        }
    }
}
