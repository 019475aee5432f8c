//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::{
    AccountService, AttachmentService, ComplaintService, MessMenuService, PaymentService,
    RenewalWorkflowService, RoomDirectoryService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<AccountService>,
    pub rooms: Arc<RoomDirectoryService>,
    pub renewals: Arc<RenewalWorkflowService>,
    pub attachments: Arc<AttachmentService>,
    pub complaints: Arc<ComplaintService>,
    pub payments: Arc<PaymentService>,
    pub mess_menu: Arc<MessMenuService>,
}
