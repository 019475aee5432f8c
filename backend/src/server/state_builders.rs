//! Helpers that assemble handler state from configuration.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use crate::domain::{
    AccountService, AttachmentService, ComplaintService, MessMenuService, PaymentService,
    RenewalWorkflowService, RoomDirectoryService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{MemoryDocumentStore, MemoryRecordStore};
use crate::outbound::security::Argon2PasswordHasher;
use crate::outbound::storage::FsBlobStore;

use super::ServerConfig;

/// Build the shared handler state from server configuration.
///
/// Documents and records live in process memory; attachment blobs persist
/// under the configured upload root.
///
/// # Errors
/// Returns [`std::io::Error`] when the upload root cannot be created or
/// opened.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let documents = MemoryDocumentStore::new();
    let account_repo = Arc::new(documents.account_repository());
    let room_repo = Arc::new(documents.room_repository());
    let form_repo = Arc::new(documents.renewal_form_repository());
    let blobs = Arc::new(FsBlobStore::open(&config.upload_root)?);
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
        config.terminal_policy,
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

    Ok(web::Data::new(HttpState {
        accounts,
        rooms,
        renewals,
        attachments,
        complaints,
        payments,
        mess_menu,
    }))
}
