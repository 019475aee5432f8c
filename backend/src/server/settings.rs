//! Deployment settings loaded via OrthoConfig.
//!
//! Values layer CLI arguments over `HOSTEL_`-prefixed environment variables
//! over configuration-file entries. Secrets (the session key) are not part
//! of this struct; `main` reads them from the key file directly.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::SameSite;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::domain::TerminalTransitionPolicy;

const DEFAULT_UPLOAD_ROOT: &str = "uploads";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Configuration values controlling server binding and workflow policy.
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "HOSTEL")]
pub struct Settings {
    /// Socket address to bind, e.g. `0.0.0.0:8080`.
    pub bind_addr: Option<SocketAddr>,
    /// Directory the attachment store writes under.
    pub upload_root: Option<PathBuf>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Set the session cookie's `Secure` flag; on unless disabled.
    #[ortho_config(cli_default_as_absent)]
    pub cookie_secure: Option<bool>,
    /// `SameSite` attribute for the session cookie: `strict`, `lax`, or
    /// `none`.
    pub cookie_same_site: Option<String>,
    /// Permit admins to reopen approved or rejected renewal forms.
    #[ortho_config(cli_default_as_absent)]
    pub allow_reopen: Option<bool>,
}

impl Settings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or_else(default_bind_addr)
    }

    /// Return the configured upload root, falling back to the default.
    pub fn upload_root(&self) -> PathBuf {
        self.upload_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_ROOT))
    }

    /// Return the session key file path, falling back to the default.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Return whether the session cookie carries `Secure`, defaulting to on.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Return the cookie `SameSite` attribute, defaulting to `Lax`.
    ///
    /// Unrecognised values fall back to `Lax` rather than failing startup.
    pub fn same_site(&self) -> SameSite {
        match self.cookie_same_site.as_deref() {
            Some("strict") => SameSite::Strict,
            Some("none") => SameSite::None,
            _ => SameSite::Lax,
        }
    }

    /// Return the renewal-workflow terminal-transition policy.
    pub fn terminal_policy(&self) -> TerminalTransitionPolicy {
        if self.allow_reopen.unwrap_or(false) {
            TerminalTransitionPolicy::Allow
        } else {
            TerminalTransitionPolicy::Reject
        }
    }
}
