//! Hostel administration backend library.
//!
//! Role-based residence management: accounts, room assignment, complaint and
//! fee-payment tracking, mess-menu publishing, and the renewal-form workflow
//! with file attachments. The crate follows a hexagonal layout: `domain`
//! holds entities, services, and capability ports; `inbound` adapts HTTP;
//! `outbound` adapts storage and security capabilities.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::trace::Trace;
