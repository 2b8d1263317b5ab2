//! Silent reconnection on startup.
//!
//! Never prompts and never notifies: the user did not ask for anything,
//! so every failure is logged and swallowed.

use std::sync::Arc;

use crate::error::SessionError;
use crate::session::manager::{ConnectOrigin, ConnectOutcome, ConnectionManager};

/// What the probe did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    NoProvider,
    NoAuthorizedAccounts,
    Attempted(ConnectOutcome),
    Failed(SessionError),
}

/// Startup check for previously authorized accounts.
#[derive(Debug, Clone)]
pub struct AutoConnectProbe {
    manager: Arc<ConnectionManager>,
}

impl AutoConnectProbe {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }

    pub async fn run(&self) -> ProbeOutcome {
        let Some(provider) = self.manager.provider().cloned() else {
            tracing::debug!("No wallet installed, skipping auto-connect");
            return ProbeOutcome::NoProvider;
        };

        let accounts = match provider.authorized_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(error = %e, "Auto-connect probe failed");
                return ProbeOutcome::Failed(SessionError::from_provider(e));
            }
        };
        if accounts.is_empty() {
            tracing::debug!("No previously authorized accounts");
            return ProbeOutcome::NoAuthorizedAccounts;
        }

        tracing::info!(accounts = accounts.len(), "Found authorized accounts, reconnecting");
        match self.manager.connect_with(ConnectOrigin::AutoConnect).await {
            Ok(outcome) => ProbeOutcome::Attempted(outcome),
            Err(e) => ProbeOutcome::Failed(e),
        }
    }
}
