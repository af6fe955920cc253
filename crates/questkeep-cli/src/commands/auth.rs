use clap::Subcommand;
use questkeep_core::{KeyringTokenStore, TokenStore};

use super::CliResult;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the backend token in the OS keyring
    Login {
        token: String,
    },
    /// Remove the stored token
    Logout,
    /// Check whether a token is stored
    Status,
}

pub fn run(action: AuthAction) -> CliResult {
    let store = KeyringTokenStore::default();
    match action {
        AuthAction::Login { token } => {
            let token = token.trim();
            if token.is_empty() {
                return Err("token must not be empty".into());
            }
            store.set(token)?;
            println!("logged in");
        }
        AuthAction::Logout => {
            store.clear()?;
            println!("logged out");
        }
        AuthAction::Status => {
            let status = if store.get()?.is_some() {
                "authenticated"
            } else {
                "not authenticated"
            };
            println!("{status}");
        }
    }
    Ok(())
}
