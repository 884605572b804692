use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::info;

use crate::publish::{Credential, Platform};

/// A social account linked to a platform
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedAccount {
    pub platform: Platform,
    pub account_id: String,
    pub account_name: String,
    #[serde(skip)]
    pub credential: Option<Credential>,
    pub connected: bool,
}

impl ConnectedAccount {
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}

/// Platform-keyed store of connected accounts
///
/// Connecting is simulated: no OAuth handshake happens, the account
/// identifier is fabricated and the record is marked connected.
#[derive(Default)]
pub struct AccountStore {
    accounts: RwLock<BTreeMap<Platform, ConnectedAccount>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect (or reconnect) `platform`, replacing any previous record
    pub async fn connect(&self, platform: Platform, credential: Option<Credential>) -> ConnectedAccount {
        let account = ConnectedAccount {
            platform,
            account_id: format!("acc_{}_{}", platform, Utc::now().timestamp_millis()),
            account_name: format!("{} Account", platform),
            credential,
            connected: true,
        };
        info!(
            "Connected {} account {} (credential: {})",
            platform,
            account.account_id,
            account.has_credential()
        );
        self.accounts.write().await.insert(platform, account.clone());
        account
    }

    pub async fn get(&self, platform: Platform) -> Option<ConnectedAccount> {
        self.accounts.read().await.get(&platform).cloned()
    }

    /// Stored credential for `platform`, if the account was connected with one
    pub async fn credential(&self, platform: Platform) -> Option<Credential> {
        self.accounts
            .read()
            .await
            .get(&platform)
            .and_then(|account| account.credential.clone())
    }

    pub async fn list(&self) -> Vec<ConnectedAccount> {
        self.accounts.read().await.values().cloned().collect()
    }
}
