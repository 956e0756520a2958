//! # Kasir Console Library
//!
//! The cashier session of the Kasir POS page: cart, product search,
//! customer selection with credit checks, the payment dialog and sale
//! submission to the admin backend.
//!
//! ## Module Organization
//! ```text
//! kasir_console/
//! ├── lib.rs          ◄─── You are here (startup & tracing)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── PosSession + SessionState (Arc<Mutex>)
//! │   └── config.rs   ◄─── ConsoleConfig (file + env)
//! ├── commands/
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── product.rs  ◄─── Product search
//! │   ├── customer.rs ◄─── Customer selection
//! │   ├── payment.rs  ◄─── Payment dialog
//! │   ├── session.rs  ◄─── Cash session
//! │   └── sale.rs     ◄─── Sale submission
//! └── error.rs        ◄─── ConsoleError for commands
//! ```
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ConsoleConfig::load()                                                  │
//! │       │                                                                 │
//! │       ├──► HttpBackend::new(config.backend_config())  ─► Arc<dyn PosBackend>
//! │       │                                                                 │
//! │       └──► SessionState::new(PosSession::new(tax_rate, currency))       │
//! │                                                                         │
//! │  commands::*(&session, backend.as_ref(), …)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use kasir_api::{HttpBackend, PosBackend};

use error::ConsoleResult;
use state::{ConsoleConfig, PosSession, SessionState};

/// A ready-to-use cashier console.
#[derive(Clone)]
pub struct Console {
    pub config: ConsoleConfig,
    pub session: SessionState,
    pub backend: Arc<dyn PosBackend>,
}

impl Console {
    /// Builds a console over any backend.
    pub fn new(config: ConsoleConfig, backend: Arc<dyn PosBackend>) -> Self {
        let session = SessionState::new(PosSession::new(
            config.tax_rate(),
            config.currency.clone(),
        ));
        Console {
            config,
            session,
            backend,
        }
    }

    /// Builds a console talking to the configured HTTP backend.
    pub fn connect(config: ConsoleConfig) -> ConsoleResult<Self> {
        let backend = HttpBackend::new(&config.backend_config())?;
        info!(url = %backend.base_url(), "Backend configured");
        Ok(Console::new(config, Arc::new(backend)))
    }
}

/// Runs the console startup sequence.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging                                                  │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: info,kasir=debug; override with RUST_LOG                 │
/// │                                                                         │
/// │  2. Load Configuration                                                  │
/// │     • defaults → console.toml → KASIR_* env → validate                  │
/// │                                                                         │
/// │  3. Connect                                                             │
/// │     • HttpBackend with base URL, token and timeout                      │
/// │                                                                         │
/// │  4. Check the Register                                                  │
/// │     • cash session state (submission stays disabled while closed)       │
/// │     • active payment methods                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> ConsoleResult<Console> {
    init_tracing();

    info!("Starting Kasir POS console");

    let config = ConsoleConfig::load(config_path)?;
    info!(
        tax_rate_bps = config.tax_rate_bps,
        currency = %config.currency.symbol,
        "Configuration loaded"
    );

    let console = Console::connect(config)?;

    match commands::session::refresh_cash_session(&console.session, console.backend.as_ref())
        .await
    {
        Ok(state) if state.is_open => info!(opened_at = ?state.opened_at, "Cash session open"),
        Ok(_) => warn!("No open cash session; sales are disabled until the register is opened"),
        Err(e) => warn!(error = %e, "Could not check the cash session"),
    }

    match commands::payment::list_payment_methods(console.backend.as_ref()).await {
        Ok(methods) => info!(count = methods.len(), "Payment methods loaded"),
        Err(e) => warn!(error = %e, "Could not load payment methods"),
    }

    Ok(console)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kasir=trace` - Show trace for kasir crates only
/// - Default: INFO, DEBUG for kasir crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kasir=debug"));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
    {
        debug!(error = %e, "Tracing subscriber already installed");
    }
}
