pub mod auth;
pub mod config;
pub mod profile;
pub mod quest;
pub mod stats;
pub mod timer;
pub mod xp;

use questkeep_core::{ApiClient, Config, KeyringTokenStore, TokenStore};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

/// Client for commands that cannot work without a login.
pub fn authenticated_client(config: &Config) -> Result<ApiClient, Box<dyn std::error::Error>> {
    let client = ApiClient::from_config(&config.api, &KeyringTokenStore::default())?;
    if !client.has_token() {
        return Err("not logged in; run `questkeep auth login <token>` first".into());
    }
    Ok(client)
}

/// Client for optional syncing. Keyring trouble only disables syncing.
pub fn optional_client(config: &Config) -> Option<ApiClient> {
    let store = KeyringTokenStore::default();
    match store.get() {
        Ok(Some(_)) => match ApiClient::from_config(&config.api, &store) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "backend sync disabled");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "token store unavailable, backend sync disabled");
            None
        }
    }
}
