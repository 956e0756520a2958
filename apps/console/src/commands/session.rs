//! # Cash Session Commands

use tracing::{debug, warn};

use kasir_api::{CashSessionState, PosBackend};

use crate::error::ConsoleResult;
use crate::state::SessionState;

/// Fetches the register state and stores it in the session.
///
/// On failure the previous snapshot is kept.
pub async fn refresh_cash_session(
    session: &SessionState,
    backend: &dyn PosBackend,
) -> ConsoleResult<CashSessionState> {
    debug!("refresh_cash_session command");

    let state = backend.cash_session().await.map_err(|e| {
        warn!(error = %e, "Failed to load cash session");
        e
    })?;

    debug!(status = %state.status, is_open = state.is_open, "Cash session refreshed");
    session.with_session_mut(|s| s.set_cash_session(state.clone()));
    Ok(state)
}
