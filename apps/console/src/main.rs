//! # Kasir Console Entry Point
//!
//! Loads configuration, connects to the admin backend and reports whether
//! the register is ready to sell.
//!
//! ```text
//! kasir-console [CONFIG_PATH]
//! ```
//! Without `CONFIG_PATH` the platform config directory is used.

use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    match kasir_console::run(config_path).await {
        Ok(console) => {
            let ready = console.session.with_session(|s| s.cash_session_open());
            if ready {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Console failed to start");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
