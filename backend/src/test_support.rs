//! Shared fixtures for handler unit tests and integration tests.
//!
//! Compiled into the library only for tests or when the `test-support`
//! feature is enabled, so integration tests under `tests/` can wire the
//! same state the unit tests use.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use mockable::DefaultClock;

use crate::domain::ports::AttachmentBlobStore;
use crate::domain::{
    AccountService, AttachmentService, ComplaintService, MessMenuService, PaymentService,
    RenewalWorkflowService, RoomDirectoryService, TerminalTransitionPolicy,
};
use crate::inbound::http::health::HealthState;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{MemoryDocumentStore, MemoryRecordStore};
use crate::outbound::security::Argon2PasswordHasher;
use crate::outbound::storage::{FsBlobStore, MemoryBlobStore};
use crate::server::AppDependencies;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build handler state wired to fresh in-memory adapters.
pub fn test_http_state() -> web::Data<HttpState> {
    test_http_state_with_policy(TerminalTransitionPolicy::Reject)
}

/// Build handler state with an explicit terminal-transition policy.
pub fn test_http_state_with_policy(policy: TerminalTransitionPolicy) -> web::Data<HttpState> {
    build_state(Arc::new(MemoryBlobStore::new()), policy)
}

/// Build handler state whose blob store writes under a temporary directory.
///
/// The returned guard removes the directory on drop; keep it alive for the
/// test's duration.
pub fn test_http_state_with_fs_blobs() -> std::io::Result<(web::Data<HttpState>, tempfile::TempDir)>
{
    let dir = tempfile::tempdir()?;
    let blobs = Arc::new(FsBlobStore::open(dir.path())?);
    Ok((
        build_state(blobs, TerminalTransitionPolicy::Reject),
        dir,
    ))
}

/// Build full application dependencies around the given handler state.
pub fn test_app_dependencies(http_state: web::Data<HttpState>) -> AppDependencies {
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state,
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

fn build_state(
    blobs: Arc<dyn AttachmentBlobStore>,
    policy: TerminalTransitionPolicy,
) -> web::Data<HttpState> {
    let documents = MemoryDocumentStore::new();
    let account_repo = Arc::new(documents.account_repository());
    let room_repo = Arc::new(documents.room_repository());
    let form_repo = Arc::new(documents.renewal_form_repository());
    let clock = Arc::new(DefaultClock);

    let rooms = Arc::new(RoomDirectoryService::new(
        room_repo.clone(),
        account_repo.clone(),
        clock.clone(),
    ));
    let accounts = Arc::new(AccountService::new(
        account_repo.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        rooms.clone(),
        clock.clone(),
    ));
    let renewals = Arc::new(RenewalWorkflowService::new(
        form_repo,
        account_repo.clone(),
        blobs.clone(),
        clock.clone(),
        policy,
    ));
    let attachments = Arc::new(AttachmentService::new(blobs, clock.clone()));
    let complaints = Arc::new(ComplaintService::new(
        Arc::new(MemoryRecordStore::new()),
        account_repo.clone(),
        clock.clone(),
    ));
    let payments = Arc::new(PaymentService::new(
        Arc::new(MemoryRecordStore::new()),
        account_repo,
        clock.clone(),
    ));
    let mess_menu = Arc::new(MessMenuService::new(Arc::new(MemoryRecordStore::new()), clock));

    web::Data::new(HttpState {
        accounts,
        rooms,
        renewals,
        attachments,
        complaints,
        payments,
        mess_menu,
    })
}
