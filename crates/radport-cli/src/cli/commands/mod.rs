pub mod cases;
pub mod diagnose;
pub mod dispatch;
pub mod login;
pub mod output;
pub mod prediagnostic;
pub mod upload;

pub use dispatch::dispatch;

use anyhow::Result;
use radport_client::{PortalClient, PortalConfig, Session};

use super::args::ConnectionArgs;

/// Build the client from environment defaults overlaid with flags.
pub(crate) fn build_client(conn: &ConnectionArgs) -> Result<PortalClient> {
    let mut config = PortalConfig::from_env();
    if let Some(url) = &conn.url {
        config = config.with_url(url.clone());
    }
    if let Some(timeout) = conn.timeout {
        config = config.with_timeout_secs(timeout);
    }
    // The token travels in the session, not the config.
    config.token = None;
    Ok(PortalClient::new(config)?)
}

/// Session from `--cookie`, falling back to `--token` / `--role`.
pub(crate) fn build_session(conn: &ConnectionArgs) -> Session {
    if let Some(cookie) = &conn.cookie {
        let session = Session::from_cookie_header(cookie);
        if session.is_authenticated() {
            return session;
        }
    }
    Session::new(conn.token.clone(), conn.role)
}
