//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};

use crate::domain::TerminalTransitionPolicy;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upload_root: PathBuf,
    pub(crate) terminal_policy: TerminalTransitionPolicy,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        upload_root: PathBuf,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            upload_root,
            terminal_policy: TerminalTransitionPolicy::default(),
        }
    }

    /// Override the terminal-transition policy for the renewal workflow.
    #[must_use]
    pub fn with_terminal_policy(mut self, policy: TerminalTransitionPolicy) -> Self {
        self.terminal_policy = policy;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the directory the attachment store writes under.
    #[must_use]
    pub fn upload_root(&self) -> &PathBuf {
        &self.upload_root
    }
}
