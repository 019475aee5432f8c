//! Domain entities, services, and capability ports.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! adapters, plus the services implementing the authorization and
//! state-transition rules. Types document their invariants and serde
//! contracts in Rustdoc; services depend only on the traits in [`ports`].

pub mod account;
pub mod account_service;
pub mod attachment;
pub mod attachment_service;
pub mod auth;
pub mod error;
pub mod identity;
pub mod ports;
pub mod records;
pub mod records_service;
pub mod renewal;
pub mod renewal_service;
pub mod role;
pub mod room;
pub mod room_service;

pub use self::account::{Account, AccountId, AccountValidationError, DisplayName, Email};
pub use self::account_service::AccountService;
pub use self::attachment::{
    AttachmentRecord, MAX_ATTACHMENT_BYTES, normalized_extension, validate_size,
};
pub use self::attachment_service::AttachmentService;
pub use self::auth::{LoginCredentials, LoginValidationError, RegistrationDetails};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::identity::Identity;
pub use self::records_service::{
    ComplaintService, MessMenuService, NewComplaint, NewPayment, PaymentService,
};
pub use self::renewal::{
    AttachmentSlot, FormId, FormStatus, RenewalForm, ReviewUpdate, TerminalTransitionPolicy,
};
pub use self::renewal_service::RenewalWorkflowService;
pub use self::role::Role;
pub use self::room::{Room, RoomNumber, RoomStatus, RoomValidationError};
pub use self::room_service::{OccupiedRoom, RoomDirectoryService, RoommateInfo};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
