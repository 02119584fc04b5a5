//! Construction of the shared remote client.

use api::{AppConfig, RemoteClient};

/// Build a client from the environment.
///
/// Returns `None` when the backend URL or key is missing, which leaves
/// the app rendering empty views instead of panicking at startup.
pub fn make_client() -> Option<RemoteClient> {
    match AppConfig::from_env() {
        Ok(config) => Some(RemoteClient::new(config)),
        Err(reason) => {
            tracing::error!("backend not configured: {reason}");
            None
        }
    }
}
