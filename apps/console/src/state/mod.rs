//! # State Module
//!
//! State owned by the console process.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐     ┌──────────────────────────────┐  │
//! │  │        SessionState          │     │        ConsoleConfig         │  │
//! │  │                              │     │                              │  │
//! │  │  Arc<Mutex<PosSession>>      │     │  backend url / token         │  │
//! │  │  cart, search, customer,     │     │  tax rate                    │  │
//! │  │  payment form, register,     │     │  currency format             │  │
//! │  │  in-flight flag              │     │                              │  │
//! │  └──────────────────────────────┘     └──────────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: Arc<Mutex<T>>, never locked across an .await          │
//! │  • ConsoleConfig: read-only after startup                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{BackendSettings, ConfigError, ConsoleConfig};
pub use session::{PosSession, SelectedCustomer, SessionState};
