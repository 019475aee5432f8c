//! Backend entry-point: loads settings, derives the session key, and runs
//! the HTTP server.

use std::env;
use std::path::Path;

use actix_web::cookie::Key;
use actix_web::web;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hostel_backend::inbound::http::health::HealthState;
use hostel_backend::server::{ServerConfig, Settings, create_server};
use ortho_config::OrthoConfig;

/// Read the session key material, falling back to an ephemeral key in
/// development builds.
fn load_session_key(key_path: &Path) -> std::io::Result<Key> {
    match std::fs::read(key_path) {
        Ok(bytes) => {
            let digest = Sha256::digest(&bytes);
            let fingerprint = hex::encode(digest.get(..4).unwrap_or(&digest));
            info!(path = %key_path.display(), %fingerprint, "session key loaded");
            Ok(Key::derive_from(&bytes))
        }
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(
                    path = %key_path.display(),
                    error = %e,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {e}",
                    key_path.display()
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load().map_err(std::io::Error::other)?;
    let key = load_session_key(&settings.session_key_file())?;

    let config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        settings.same_site(),
        settings.bind_addr(),
        settings.upload_root(),
    )
    .with_terminal_policy(settings.terminal_policy());

    info!(bind_addr = %config.bind_addr(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
